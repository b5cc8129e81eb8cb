pub mod batch;
pub mod logging;
pub mod replay;
pub mod runner;

pub use batch::run_batch;
pub use runner::{run_logged, run_logged_with_rng};

pub fn module_ready() -> bool {
    true
}
