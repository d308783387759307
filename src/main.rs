mod bundle;
mod commands;
mod fetch;
mod guess;
mod judge;
mod log;
mod model;
mod prompt;
mod reconcile;
mod scaffold;
mod store;
mod tools;

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use judge::Judge;

/// A CLI tool to set up and submit competitive programming contests with online-judge-tools.
#[derive(Parser, Debug)]
struct Args {
    /// Config file to use instead of the one in the user config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print debug logs, including the output of the external tools.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a directory for a contest, with one subdirectory per problem.
    CreateDir {
        /// Directory to create the contest directory in.
        #[arg(default_value = ".")]
        target: PathBuf,
        /// The online judge hosting the contest. Asked for when omitted.
        #[arg(short, long, value_enum)]
        judge: Option<Judge>,
        /// The contest id, e.g. abc001. Asked for when omitted.
        #[arg(short, long)]
        contest: Option<String>,
    },

    /// Create a directory for a single problem.
    AddProblem {
        /// Directory to create the problem directory in.
        #[arg(default_value = ".")]
        target: PathBuf,
        /// The URL of the problem. Asked for when omitted.
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Refresh a contest directory, adding problems that appeared since it was created.
    Update {
        /// The contest directory.
        #[arg(default_value = ".")]
        target: PathBuf,
    },

    /// Submit a solution.
    Submit {
        file: PathBuf,
        /// The URL of the problem. Asked for when omitted.
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Bundle a C++ solution and its local headers into a single file.
    Bundle {
        file: PathBuf,
        /// Write the result here instead of standard output.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Log in to an online judge with `oj login`.
    Login {
        #[arg(short, long, value_enum)]
        judge: Option<Judge>,
    },

    /// Check that the external tools are installed.
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    log::init(args.verbose);

    let result = run(args).await;
    std::io::stdout().flush()?;
    std::io::stderr().flush()?;
    if let Err(err) = result {
        error!("{:#}", err);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = store::load_config(args.config.as_deref())?;

    match args.command {
        Commands::CreateDir {
            target,
            judge,
            contest,
        } => commands::create_dir::main(&config, &target, judge, contest).await,
        Commands::AddProblem { target, url } => {
            commands::add_problem::main(&config, &target, url).await
        }
        Commands::Update { target } => commands::update::main(&config, &target).await,
        Commands::Submit { file, url } => commands::submit::main(&config, &file, url).await,
        Commands::Bundle { file, output } => {
            commands::bundle::main(&config, &file, output.as_deref()).await
        }
        Commands::Login { judge } => commands::login::main(judge).await,
        Commands::Check => commands::check::main().await,
    }
}
