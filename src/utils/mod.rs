pub mod constants;
pub mod logging;
pub mod numbers;
pub mod progress;

pub use constants::*;
pub use logging::{init_logging, LogConfig};
pub use numbers::{non_empty, parse_decimal};
pub use progress::ProgressReporter;
