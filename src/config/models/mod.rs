//! Configuration models

pub mod logging;

pub use logging::LoggingConfig;
