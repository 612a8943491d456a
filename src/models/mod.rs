pub mod region;
pub mod vacancy;
