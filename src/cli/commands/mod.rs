//! Command implementations.

mod config;
mod doctor;
mod process;
mod rules;

pub use config::run_config;
pub use doctor::run_doctor;
pub use process::run_process;
pub use rules::run_rules;
