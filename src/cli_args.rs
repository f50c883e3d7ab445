use clap::{ArgAction, Parser, Subcommand};

/// CLI options
#[derive(Parser, Debug)]
#[command(
    name = "propr",
    version,
    about = "Generate your PRs from the command line with AI"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a PR description and print it
    Generate {
        /// Branch to compare your changes against (defaults to the remote's default branch)
        #[arg(short, long)]
        branch: Option<String>,

        /// Model to use (e.g. gpt-4o, claude-3-5-haiku-latest, deepseek-chat)
        #[arg(short, long)]
        model: Option<String>,

        /// Print the description without any formatting
        #[arg(long)]
        plain: bool,
    },

    /// Generate a description and open a pull request on GitHub with it
    Create {
        /// Branch to merge into (defaults to the remote's default branch)
        #[arg(short, long)]
        branch: Option<String>,

        /// Model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Pull request title; asked for interactively when omitted
        #[arg(short, long)]
        title: Option<String>,

        /// Open the pull request as a draft
        #[arg(long)]
        draft: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List the supported models and the API key each one needs
    Models,

    /// Inspect or initialise the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the resolved configuration
    Ls,
    /// Write a default configuration file if none exists
    Init,
    /// Print where the configuration file lives
    Path,
}
