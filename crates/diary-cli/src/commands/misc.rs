use clap::CommandFactory;
use clap_complete::generate;

use diary_core::SIGNING_MESSAGE;

use crate::cli::{Cli, CompletionsArgs};

/// Print the exact message a wallet must sign.
pub fn handle_message() -> anyhow::Result<()> {
    println!("{}", SIGNING_MESSAGE);
    Ok(())
}

pub fn handle_completions(args: &CompletionsArgs) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "diary", &mut std::io::stdout());
    Ok(())
}
