use env_logger::Builder;
use log::LevelFilter;

pub struct Logger;

impl Logger {
    pub fn init(verbosity: LevelFilter) {
        Self::builder(verbosity).init();
    }

    fn builder(verbosity: LevelFilter) -> Builder {
        let mut builder = colog::default_builder();
        builder
            .filter_level(verbosity)
            // transport internals are noisy at debug
            .filter_module("reqwest", LevelFilter::Warn)
            .filter_module("hyper_util", LevelFilter::Warn);
        builder
    }
}
