//! Prompt optimizer CLI entry point.

use clap::Parser;

use prompt_optimizer::cli::{commands, handle_error, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let options = cli.global_options();

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(args, options.json).await,
        Commands::Optimize(args) => commands::optimize::execute(args, &options).await,
        Commands::Assess(args) => commands::assess::execute(args, &options).await,
    };

    if let Err(err) = result {
        handle_error(err, options.json);
    }
}
