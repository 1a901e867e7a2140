pub mod checks;
pub mod orchestrator;
pub mod summary;

pub use orchestrator::{run_checks, RunReport};
