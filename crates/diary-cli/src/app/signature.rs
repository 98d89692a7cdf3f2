//! A wallet that gets its signature from the user.
//!
//! The signature comes from `--signature` / `DIARY_SIGNATURE` when set,
//! otherwise from a hidden prompt. The user signs [`SIGNING_MESSAGE`] with
//! their wallet and pastes the result.
//!
//! [`SIGNING_MESSAGE`]: diary_core::SIGNING_MESSAGE

use async_trait::async_trait;
use dialoguer::Password;
use tracing::debug;

use diary_core::storage::Wallet;
use diary_core::{DiaryError, Result, Signature};

use crate::helpers::is_interactive;

pub struct PromptWallet {
    address: String,
    provided: Option<String>,
    no_input: bool,
}

impl PromptWallet {
    pub fn new(address: impl Into<String>, provided: Option<String>, no_input: bool) -> Self {
        Self {
            address: address.into(),
            provided,
            no_input,
        }
    }
}

#[async_trait]
impl Wallet for PromptWallet {
    fn address(&self) -> &str {
        &self.address
    }

    async fn sign_message(&self, message: &str) -> Result<Signature> {
        if let Some(value) = self.provided.as_deref() {
            debug!("using provided signature");
            return Ok(Signature::new(value.trim()));
        }

        if !is_interactive(self.no_input) {
            return Err(DiaryError::Declined(
                "no signature provided and prompts are disabled".to_string(),
            ));
        }

        eprintln!("Sign this message with wallet {}:\n", self.address);
        eprintln!("  {}\n", message);
        let value = Password::new()
            .with_prompt("Signature")
            .allow_empty_password(true)
            .interact()
            .map_err(|e| DiaryError::Declined(format!("signature prompt failed: {}", e)))?;

        if value.trim().is_empty() {
            return Err(DiaryError::Declined("empty signature".to_string()));
        }
        Ok(Signature::new(value.trim()))
    }
}
