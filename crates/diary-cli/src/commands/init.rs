use std::path::PathBuf;

use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use tracing::info;

use diary_core::{VERSION, SIGNING_MESSAGE};

use crate::app::AppContext;
use crate::cli::InitArgs;
use crate::config::{default_registry_path, default_store_dir, write_config, DiaryConfig};
use crate::errors::CliError;
use crate::helpers::is_interactive;
use crate::ui::theme::{styled, styles};
use crate::ui::{hint, receipt, UiContext};

/// Print a step indicator for the wizard flow.
fn print_step(ctx: &UiContext, step: usize, total: usize, title: &str) {
    if !ctx.mode.is_pretty() {
        return;
    }
    let progress = styled(&format!("{}/{}", step, total), styles::dim(), ctx.color);
    println!("{}  {}", progress, styled(title, styles::bold(), ctx.color));
}

fn resolve_address(ctx: &AppContext, interactive: bool) -> anyhow::Result<String> {
    if let Some(address) = ctx.cli().address.as_deref() {
        if !address.trim().is_empty() {
            return Ok(address.trim().to_string());
        }
    }
    if !interactive {
        return Err(CliError::invalid_input(
            "No wallet address provided.\nHint: Pass --address or set DIARY_ADDRESS.",
        )
        .into());
    }
    let address: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Wallet address")
        .validate_with(|input: &String| {
            if input.trim().is_empty() {
                Err("Address cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map_err(|e| anyhow::anyhow!("Failed to read address: {}", e))?;
    Ok(address.trim().to_string())
}

fn resolve_path(value: Option<&str>, default: PathBuf) -> PathBuf {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => PathBuf::from(v),
        _ => default,
    }
}

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(false, None);
    let interactive = is_interactive(args.no_input);
    let config_path = ctx.config_path()?;

    if config_path.exists() && !args.force {
        let overwrite = interactive
            && Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(format!(
                    "Config already exists at {}. Overwrite?",
                    config_path.display()
                ))
                .default(false)
                .interact()
                .map_err(|e| anyhow::anyhow!("Failed to read answer: {}", e))?;
        if !overwrite {
            return Err(CliError::invalid_input(format!(
                "Config already exists at {}\nHint: Re-run with --force to overwrite.",
                config_path.display()
            ))
            .into());
        }
    }

    if ui.mode.is_pretty() && !ctx.quiet() {
        println!(
            "{}\n",
            styled(&format!("Dear Diary v{}", VERSION), styles::bold(), ui.color)
        );
    }

    print_step(&ui, 1, 2, "Wallet");
    let address = resolve_address(ctx, interactive)?;

    print_step(&ui, 2, 2, "Storage");
    let store_dir = resolve_path(args.store_dir.as_deref(), default_store_dir()?);
    let registry_path = resolve_path(args.registry.as_deref(), default_registry_path()?);
    std::fs::create_dir_all(&store_dir).map_err(|e| {
        anyhow::anyhow!(
            "Failed to create store directory {}: {}",
            store_dir.display(),
            e
        )
    })?;

    let config = DiaryConfig::new(store_dir.clone(), registry_path.clone(), address.clone());
    write_config(&config_path, &config)?;
    info!(path = %config_path.display(), "wrote config");

    if ctx.quiet() {
        return Ok(());
    }

    let config_display = config_path.display().to_string();
    let store_display = store_dir.display().to_string();
    let registry_display = registry_path.display().to_string();
    println!(
        "{}",
        receipt(
            &ui,
            "Diary initialized",
            &[
                ("Address", address.as_str()),
                ("Config", config_display.as_str()),
                ("Store", store_display.as_str()),
                ("Registry", registry_display.as_str()),
            ],
        )
    );
    println!(
        "{}",
        hint(
            &ui,
            &format!(
                "Sign \"{}\" with your wallet, then run `diary add`.",
                SIGNING_MESSAGE
            )
        )
    );
    Ok(())
}
