//! Shell commands.
//!
//! Each command looks at an input line and either declines it (`None`)
//! or handles it. The shell tries commands in ascending priority order
//! and stops at the first one that accepts.

pub mod show;
pub mod store;

use zeroize::Zeroizing;

use crate::cli::input::Prompter;
use crate::errors::{LockboxError, Result};
use crate::vault::SecretStore;

pub use show::ShowCommand;
pub use store::StoreCommand;

/// What a command did, for the shell to report.
pub enum Outcome {
    /// An entry was written.
    Stored { name: String },
    /// An entry was read.
    Shown {
        name: String,
        content: Zeroizing<Vec<u8>>,
    },
}

/// One line-oriented shell command.
pub trait Command {
    /// Lower runs first.
    fn priority(&self) -> i32;

    /// Handle `input` if it belongs to this command.
    ///
    /// Returns `None` to let the next command try.
    fn execute(
        &self,
        store: &dyn SecretStore,
        prompter: &mut dyn Prompter,
        passphrase: &[u8],
        input: &str,
    ) -> Option<Result<Outcome>>;
}

/// The built-in commands, sorted by priority.
pub fn default_commands() -> Result<Vec<Box<dyn Command>>> {
    let mut commands: Vec<Box<dyn Command>> =
        vec![Box::new(StoreCommand::new()?), Box::new(ShowCommand::new()?)];
    commands.sort_by_key(|c| c.priority());
    Ok(commands)
}

/// Compile a `<keyword> <name>` pattern, case-insensitive on the keyword.
pub(crate) fn keyword_pattern(keyword: &str) -> Result<regex::Regex> {
    regex::Regex::new(&format!(r"(?i)^{keyword} (\S+)$"))
        .map_err(|e| LockboxError::CommandFailed(format!("bad command pattern: {e}")))
}

/// Match `input` (trimmed) against `pattern` and return the captured name.
pub(crate) fn capture_name(pattern: &regex::Regex, input: &str) -> Option<String> {
    pattern
        .captures(input.trim())
        .and_then(|groups| groups.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_is_case_insensitive() {
        let pattern = keyword_pattern("show").unwrap();
        assert_eq!(capture_name(&pattern, "SHOW bank").as_deref(), Some("bank"));
        assert_eq!(capture_name(&pattern, "  show bank  ").as_deref(), Some("bank"));
    }

    #[test]
    fn pattern_needs_exactly_one_name() {
        let pattern = keyword_pattern("show").unwrap();
        assert_eq!(capture_name(&pattern, "show"), None);
        assert_eq!(capture_name(&pattern, "show a b"), None);
        assert_eq!(capture_name(&pattern, "showbank"), None);
        assert_eq!(capture_name(&pattern, "store bank"), None);
    }

    #[test]
    fn default_commands_are_sorted() {
        let commands = default_commands().unwrap();
        assert_eq!(commands.len(), 2);
        assert!(commands
            .windows(2)
            .all(|w| w[0].priority() <= w[1].priority()));
    }
}
