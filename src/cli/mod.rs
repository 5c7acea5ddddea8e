//! CLI module — Clap argument parser, input sources, the interactive
//! shell, and its commands.

pub mod commands;
pub mod input;
pub mod output;
pub mod shell;

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::Parser;
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{LockboxError, Result};
use crate::storage::FileSystemStorage;
use crate::vault::VaultStore;

use input::{Prompter, ScriptedPrompter, TerminalPrompter};
use shell::Shell;

/// Environment variable that supplies the passphrase non-interactively.
pub const PASSPHRASE_ENV: &str = "LOCKBOX_PASSPHRASE";

/// Lockbox CLI: a single-user encrypted credential vault.
#[derive(Parser)]
#[command(
    name = "lockbox",
    about = "Single-user encrypted credential vault",
    long_about = "Single-user encrypted credential vault.\n\n\
                  After the passphrase prompt, type `store <name>` to save a \
                  value or `show <name>` to print one.",
    version
)]
pub struct Cli {
    /// Directory holding the vault files
    #[arg(long, env = "LOCKBOX_DIR", default_value = ".lockbox")]
    pub vault_dir: PathBuf,

    /// Enable debug logging (overridden by LOCKBOX_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Wire storage, vault and shell together and run a session.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = Settings::load(&cli.vault_dir)?;
    let storage = FileSystemStorage::new(&cli.vault_dir)?;
    debug!(vault_dir = %storage.base_dir().display(), "opening vault");
    let mut store = VaultStore::with_params(storage, settings.argon2_params());

    let mut prompter: Box<dyn Prompter> = if io::stdin().is_terminal() {
        Box::new(TerminalPrompter::new())
    } else {
        Box::new(ScriptedPrompter::new(io::stdin().lock()))
    };

    let passphrase = obtain_passphrase(prompter.as_mut())?;

    Shell::new(&mut store, prompter.as_mut(), commands::default_commands()?)
        .run(passphrase.as_bytes())
}

/// Get the vault passphrase, trying in order:
/// 1. `LOCKBOX_PASSPHRASE` env var (scripts)
/// 2. Hidden prompt
///
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory on drop.
pub fn obtain_passphrase(prompter: &mut dyn Prompter) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSPHRASE_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    output::prompt("Who are you?");
    let pw = prompter.read_hidden("Passphrase")?;
    if pw.is_empty() {
        return Err(LockboxError::CommandFailed(
            "passphrase cannot be empty".into(),
        ));
    }
    Ok(pw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn vault_dir_defaults_to_dot_lockbox() {
        let cli = Cli::try_parse_from(["lockbox"]).unwrap();
        // LOCKBOX_DIR may be set in the environment running the tests.
        if std::env::var_os("LOCKBOX_DIR").is_none() {
            assert_eq!(cli.vault_dir, PathBuf::from(".lockbox"));
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn vault_dir_flag_overrides_default() {
        let cli = Cli::try_parse_from(["lockbox", "--vault-dir", "/tmp/v", "-v"]).unwrap();
        assert_eq!(cli.vault_dir, PathBuf::from("/tmp/v"));
        assert!(cli.verbose);
    }
}
