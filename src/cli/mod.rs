mod args;

pub use args::{main_args, CliArgs};
