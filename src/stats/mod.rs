pub mod distributions;
pub mod drawdown;
pub mod independence;
pub mod proportion;

pub use drawdown::{drawdown_check, DrawdownResult};
pub use independence::{independence_test, ContingencyTable};
pub use proportion::proportion_test;
