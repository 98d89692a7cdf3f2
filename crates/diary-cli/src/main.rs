//! Dear Diary CLI - journal entries sealed with a wallet signature
//!
//! This is the command-line interface for Dear Diary. Entries are sealed
//! with a key derived from the user's signature before they reach the
//! content store.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod logging;
mod output;
mod ui;

use clap::Parser;
use diary_core::VERSION;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{add, init, list, misc, show};
use crate::errors::exit_code_for;
use crate::ui::print_error;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let ctx = AppContext::new(&cli);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {}", e);
            std::process::exit(constants::exit_codes::FAILURE);
        }
    };

    if let Err(e) = runtime.block_on(run(&ctx, &cli)) {
        let ui_ctx = ctx.ui_context(false, None);

        let error_msg = format!("{}", e);
        let hint = extract_error_hint(&error_msg);
        let message = match error_msg.find('\n') {
            Some(idx) if hint.is_some() => &error_msg[..idx],
            _ => error_msg.as_str(),
        };

        print_error(&ui_ctx, message, hint.as_deref());
        std::process::exit(exit_code_for(&e));
    }
}

/// Extract a hint from an error message if it contains "Hint:",
/// or provide contextual hints for common error types.
fn extract_error_hint(error: &str) -> Option<String> {
    if let Some(idx) = error.find("\nHint:") {
        return Some(error[idx + 1..].to_string());
    }

    let error_lower = error.to_lowercase();

    if error_lower.contains("registry") && error_lower.contains("corrupt") {
        return Some(
            "Hint: Restore the registry file from a backup; blobs in the store are untouched."
                .to_string(),
        );
    }

    if error_lower.contains("failed to store blob") || error_lower.contains("failed to write") {
        return Some(
            "Hint: Check that the store directory is writable, then retry; nothing was registered."
                .to_string(),
        );
    }

    if error_lower.contains("title cannot be empty") || error_lower.contains("content cannot be empty")
    {
        return Some("Hint: Pass --title and --body, or pipe the body on stdin.".to_string());
    }

    None
}

async fn run(ctx: &AppContext<'_>, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => init::handle_init(ctx, args)?,
        Some(Commands::Message) => misc::handle_message()?,
        Some(Commands::Add(args)) => add::handle_add(ctx, args).await?,
        Some(Commands::List(args)) => list::handle_list(ctx, args).await?,
        Some(Commands::Show(args)) => show::handle_show(ctx, args).await?,
        Some(Commands::Completions(args)) => misc::handle_completions(args)?,
        None => {
            println!("Dear Diary v{}", VERSION);
            println!("\nQuickstart:");
            println!("  diary init --address 0xYourWallet");
            println!("  diary message            # sign this with your wallet");
            println!("  diary add --title \"Hello\" --body \"First entry\"");
            println!("  diary list");
            println!("  diary show <cid>");
            println!("\nRun `diary --help` for full usage.");
        }
    }

    Ok(())
}
