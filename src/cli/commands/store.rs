//! `store <name>` — read a value twice (hidden) and save it.

use regex::Regex;
use zeroize::Zeroizing;

use super::{capture_name, keyword_pattern, Command, Outcome};
use crate::cli::input::Prompter;
use crate::errors::{LockboxError, Result};
use crate::vault::SecretStore;

pub struct StoreCommand {
    pattern: Regex,
}

impl StoreCommand {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: keyword_pattern("store")?,
        })
    }

    /// Ask for the content, then for it again; both must match.
    fn read_content_with_confirmation(prompter: &mut dyn Prompter) -> Result<Zeroizing<String>> {
        let content = prompter.read_hidden("And now content please")?;
        let confirmed = prompter.read_hidden("Once again")?;

        if content.as_str() == confirmed.as_str() {
            Ok(content)
        } else {
            Err(LockboxError::ContentMismatch)
        }
    }
}

impl Command for StoreCommand {
    fn priority(&self) -> i32 {
        0
    }

    fn execute(
        &self,
        store: &dyn SecretStore,
        prompter: &mut dyn Prompter,
        passphrase: &[u8],
        input: &str,
    ) -> Option<Result<Outcome>> {
        let name = capture_name(&self.pattern, input)?;

        let result = Self::read_content_with_confirmation(prompter)
            .and_then(|content| store.put(passphrase, &name, content.as_bytes()))
            .map(|()| Outcome::Stored { name });
        Some(result)
    }
}
