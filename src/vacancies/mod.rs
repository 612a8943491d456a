pub mod fetcher;
pub mod presenter;
