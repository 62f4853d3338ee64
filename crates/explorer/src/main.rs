use std::process;

use clap::Parser;
use cli::{Args, Command};
use error::ExplorerResult;

mod cli;
mod commands;
mod error;
mod prelude;
mod utils;

fn init_logger(args: &cli::GlobalArgs) {
    let env = env_logger::Env::default().default_filter_or(args.log_level());
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .init();
}

fn run(args: Args) -> ExplorerResult<()> {
    let Args { global, cmd } = args;
    init_logger(&global);

    match cmd {
        Command::Completions(cmd) => cmd.execute(),
        Command::Config(cmd) => cmd.execute(),
        Command::Download(cmd) => cmd.execute(&global),
        Command::Export(cmd) => cmd.execute(&global),
        Command::Generate(cmd) => cmd.execute(&global),
        Command::Interactive(cmd) => cmd.execute(&global),
        Command::Journal(cmd) => cmd.execute(&global),
        Command::Plot(cmd) => cmd.execute(&global),
        Command::Report(cmd) => cmd.execute(&global),
        Command::Search(cmd) => cmd.execute(&global),
        Command::Stats(cmd) => cmd.execute(&global),
        Command::Titles(cmd) => cmd.execute(&global),
    }
}

fn main() {
    let args = Args::parse();

    match run(args) {
        Ok(()) => process::exit(0),
        Err(e) if e.is_broken_pipe() => process::exit(0),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}
