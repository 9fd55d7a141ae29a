mod args;
mod runner;

pub(crate) use args::{Cli, Commands, MatchArgs};
pub(crate) use runner::run;
