//! `show <name>` — decrypt and print a stored value.

use regex::Regex;

use super::{capture_name, keyword_pattern, Command, Outcome};
use crate::cli::input::Prompter;
use crate::errors::Result;
use crate::vault::SecretStore;

pub struct ShowCommand {
    pattern: Regex,
}

impl ShowCommand {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: keyword_pattern("show")?,
        })
    }
}

impl Command for ShowCommand {
    fn priority(&self) -> i32 {
        0
    }

    fn execute(
        &self,
        store: &dyn SecretStore,
        _prompter: &mut dyn Prompter,
        passphrase: &[u8],
        input: &str,
    ) -> Option<Result<Outcome>> {
        let name = capture_name(&self.pattern, input)?;

        let result = store
            .get(passphrase, &name)
            .map(|content| Outcome::Shown { name, content });
        Some(result)
    }
}
