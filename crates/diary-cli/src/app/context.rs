//! Application context for the Dear Diary CLI.
//!
//! Bundles the parsed CLI arguments with a lazily loaded config so
//! handlers don't thread paths and addresses around.

use std::path::PathBuf;

use once_cell::unsync::OnceCell;

use diary_core::storage::{LocalContentStore, LocalRegistry};
use diary_core::{DiaryError, Session};

use crate::cli::Cli;
use crate::config::{read_config, DiaryConfig};
use crate::errors::CliError;
use crate::ui::UiContext;

use super::resolver::{missing_config_message, resolve_config_path, MISSING_CONFIG_HINT};
use super::signature::PromptWallet;

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<DiaryConfig>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn config_path(&self) -> anyhow::Result<PathBuf> {
        resolve_config_path(self.cli)
    }

    /// Load the config on first use.
    pub fn config(&self) -> anyhow::Result<&DiaryConfig> {
        self.config.get_or_try_init(|| {
            let path = self.config_path()?;
            if !path.exists() {
                return Err(
                    CliError::not_found(missing_config_message(&path), MISSING_CONFIG_HINT).into(),
                );
            }
            read_config(&path)
        })
    }

    pub fn store(&self) -> anyhow::Result<LocalContentStore> {
        Ok(LocalContentStore::new(&self.config()?.storage.store_dir))
    }

    pub fn registry(&self) -> anyhow::Result<LocalRegistry> {
        Ok(LocalRegistry::new(&self.config()?.storage.registry_path))
    }

    /// `--address` / `DIARY_ADDRESS`, else the configured wallet.
    pub fn address(&self) -> anyhow::Result<String> {
        if let Some(address) = self.cli.address.as_deref() {
            if !address.trim().is_empty() {
                return Ok(address.trim().to_string());
            }
        }
        Ok(self.config()?.wallet.address.clone())
    }

    /// Open a session for the configured address.
    ///
    /// With `no_key` the session is read-only and no signature is asked
    /// for. Otherwise a declined signature is an auth failure.
    pub async fn session(&self, no_key: bool, no_input: bool) -> anyhow::Result<Session> {
        let address = self.address()?;
        if no_key {
            return Ok(Session::read_only(address)?);
        }

        let wallet = PromptWallet::new(address, self.cli.signature.clone(), no_input);
        match Session::authorize(&wallet).await {
            Ok(session) => Ok(session),
            Err(DiaryError::Declined(reason)) => Err(CliError::auth_failed_with_hint(
                format!("Signature declined: {}", reason),
                "Hint: Pass --signature, set DIARY_SIGNATURE, or use --no-key to browse without unlocking.",
            )
            .into()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn ui_context(&self, json: bool, format: Option<&str>) -> UiContext {
        UiContext::from_env(json, format, self.cli.no_color, self.cli.ascii)
    }
}
