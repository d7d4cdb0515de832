pub mod logging;
pub mod selector;

pub use logging::LoggingConfig;
pub use selector::SelectorConfig;
