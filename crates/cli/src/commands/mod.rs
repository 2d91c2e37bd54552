pub mod check;
pub mod utils;
pub mod validate;

pub use check::{run_check, CheckArgs};
pub use validate::validate_config;
