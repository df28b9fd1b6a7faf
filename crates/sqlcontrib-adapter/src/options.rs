//! Per-call insert options.

use sqlcontrib_core::Command;
use std::time::Duration;

/// Transaction and timeout applied to every statement of one insert.
///
/// Both are forwarded to the executor untouched. Dialects that need a second
/// round trip for the generated key issue it with the same options.
#[derive(Debug)]
pub struct InsertOptions<'a, Tx> {
    transaction: Option<&'a Tx>,
    command_timeout: Option<Duration>,
}

impl<'a, Tx> InsertOptions<'a, Tx> {
    /// No transaction, backend default timeout.
    pub fn new() -> Self {
        Self {
            transaction: None,
            command_timeout: None,
        }
    }

    /// Run inside the caller's open transaction.
    pub fn transaction(mut self, transaction: &'a Tx) -> Self {
        self.transaction = Some(transaction);
        self
    }

    /// Command timeout for each statement.
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }

    pub fn get_transaction(&self) -> Option<&'a Tx> {
        self.transaction
    }

    pub fn get_command_timeout(&self) -> Option<Duration> {
        self.command_timeout
    }

    /// Apply these options to a command.
    pub(crate) fn apply<'c>(&self, command: Command<'c, Tx>) -> Command<'c, Tx>
    where
        'a: 'c,
    {
        command
            .transaction(self.transaction)
            .timeout(self.command_timeout)
    }
}

impl<Tx> Default for InsertOptions<'_, Tx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Tx> Clone for InsertOptions<'_, Tx> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Tx> Copy for InsertOptions<'_, Tx> {}
