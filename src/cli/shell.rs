//! The interactive loop: read a line, hand it to the first command that
//! accepts it, report the result, repeat until input ends.

use tracing::debug;

use super::commands::{Command, Outcome};
use super::input::Prompter;
use super::output;
use crate::errors::Result;
use crate::vault::SecretStore;

pub struct Shell<'a> {
    store: &'a mut dyn SecretStore,
    prompter: &'a mut dyn Prompter,
    commands: Vec<Box<dyn Command>>,
}

impl<'a> Shell<'a> {
    pub fn new(
        store: &'a mut dyn SecretStore,
        prompter: &'a mut dyn Prompter,
        mut commands: Vec<Box<dyn Command>>,
    ) -> Self {
        commands.sort_by_key(|c| c.priority());
        Self {
            store,
            prompter,
            commands,
        }
    }

    /// Initialize the vault with `passphrase`, then serve commands.
    ///
    /// Returns `Ok` at end of input. Recoverable command errors are
    /// printed and the loop continues; fatal ones end the session.
    pub fn run(&mut self, passphrase: &[u8]) -> Result<()> {
        self.store.initialize(passphrase)?;

        loop {
            output::prompt("What do you want?");
            let line = match self.prompter.read_line()? {
                Some(line) => line,
                None => return Ok(()),
            };

            match self.dispatch(passphrase, &line) {
                None => output::warning("Dunno :("),
                Some(Ok(outcome)) => report(&outcome),
                Some(Err(e)) if e.is_fatal() => return Err(e),
                Some(Err(e)) => output::error(&e.to_string()),
            }
        }
    }

    /// Offer `line` to each command in order until one accepts it.
    fn dispatch(&mut self, passphrase: &[u8], line: &str) -> Option<Result<Outcome>> {
        let store: &dyn SecretStore = &*self.store;
        for command in &self.commands {
            if let Some(result) = command.execute(store, &mut *self.prompter, passphrase, line) {
                return Some(result);
            }
        }
        debug!("no command accepted the input");
        None
    }
}

fn report(outcome: &Outcome) {
    match outcome {
        Outcome::Stored { name } => output::success(&format!("Store {name}... done!")),
        Outcome::Shown { name, content } => {
            output::content(content);
            output::success(&format!("Show {name}... done!"));
        }
    }
}
