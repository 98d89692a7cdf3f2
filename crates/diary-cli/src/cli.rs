use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use diary_core::VERSION;

/// Dear Diary - journal entries sealed with your wallet signature
#[derive(Parser)]
#[command(name = "diary")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(long, global = true, env = "DIARY_CONFIG")]
    pub config: Option<String>,

    /// Wallet address entries are registered under
    #[arg(short, long, global = true, env = "DIARY_ADDRESS")]
    pub address: Option<String>,

    /// Signature over the unlock message (see `diary message`)
    #[arg(long, global = true, env = "DIARY_SIGNATURE", hide_env_values = true)]
    pub signature: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging to stderr (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Directory holding stored envelopes
    #[arg(long)]
    pub store_dir: Option<String>,

    /// Registry file path
    #[arg(long)]
    pub registry: Option<String>,

    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Entry title
    #[arg(long)]
    pub title: Option<String>,

    /// Entry body (overrides stdin)
    #[arg(long)]
    pub body: Option<String>,

    /// Add tags to the entry
    #[arg(short, long, value_name = "TAG")]
    pub tag: Vec<String>,

    /// Set custom date/time (ISO-8601 or YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Filter by tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Limit number of results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Do not request a signature; sealed entries stay locked
    #[arg(long)]
    pub no_key: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Content identifier (full or unique prefix)
    #[arg(value_name = "CID")]
    pub id: String,

    /// Do not request a signature; sealed entries stay locked
    #[arg(long)]
    pub no_key: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a config file for a wallet address
    Init(InitArgs),

    /// Print the message your wallet must sign to unlock entries
    Message,

    /// Seal a new entry and register it
    Add(AddArgs),

    /// List entries, newest first
    List(ListArgs),

    /// Show a specific entry by content identifier
    Show(ShowArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
