pub mod cli;
pub mod common;
pub mod shutdown;
pub mod workers;

pub use cli::{parse_args, Cli};
