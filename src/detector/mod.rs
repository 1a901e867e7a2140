pub mod classifier;

pub use classifier::{drawdown_alert, test_alert, Alert};
