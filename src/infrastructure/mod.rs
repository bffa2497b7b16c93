pub mod logging;

pub use logging::{LogLevel, Logger, LoggerTrait};
