pub mod checks;
pub mod cli;
pub mod config;
pub mod runner;
pub mod sftp;
pub mod ssh;
pub mod testfile;
pub mod ui;
pub mod utils;

pub use cli::Cli;
pub use config::Config;
pub use runner::{run, RunReport};
