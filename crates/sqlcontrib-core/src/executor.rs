//! The SQL execution boundary.
//!
//! sqlcontrib does not talk to databases itself. Everything it runs goes
//! through an [`Executor`], a deliberately small capability:
//!
//! - [`execute`](Executor::execute) - run a statement, get the affected-row count
//! - [`query`](Executor::query) - run a statement, get its rows
//! - [`query_multiple`](Executor::query_multiple) - run a batch, get one row
//!   set per result-producing statement
//!
//! Every call receives a [`Command`] bundling the SQL, the named parameters,
//! the caller's transaction (if any) and the command timeout. Executors must
//! run a command inside the transaction it names and forward the timeout
//! verbatim; sqlcontrib never starts, commits or rolls back transactions.
//!
//! All operations integrate with asupersync's structured concurrency via the
//! `Cx` context.

use crate::error::Error;
use crate::row::Row;
use crate::value::Value;
use asupersync::{Cx, Outcome};
use std::future::Future;
use std::time::Duration;

/// One statement to run, with everything the executor needs to run it.
#[derive(Debug)]
pub struct Command<'a, Tx> {
    /// SQL text, parameters written as `@name` markers
    pub sql: &'a str,
    /// Named parameter values
    pub params: &'a [(&'static str, Value)],
    /// Transaction the statement must run in
    pub transaction: Option<&'a Tx>,
    /// Timeout to hand to the backend, untouched
    pub timeout: Option<Duration>,
}

impl<'a, Tx> Command<'a, Tx> {
    /// A command with no parameters, no transaction and no timeout.
    pub fn new(sql: &'a str) -> Self {
        Self {
            sql,
            params: &[],
            transaction: None,
            timeout: None,
        }
    }

    /// Bind named parameters.
    pub fn params(mut self, params: &'a [(&'static str, Value)]) -> Self {
        self.params = params;
        self
    }

    /// Run inside the given transaction, when there is one.
    pub fn transaction(mut self, transaction: Option<&'a Tx>) -> Self {
        self.transaction = transaction;
        self
    }

    /// Forward a command timeout.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Look up a bound parameter by name.
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params
            .iter()
            .find(|(param, _)| *param == name)
            .map(|(_, value)| value)
    }
}

impl<Tx> Clone for Command<'_, Tx> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Tx> Copy for Command<'_, Tx> {}

/// A connection-like object capable of running SQL.
///
/// Implementations must be `Send + Sync` for use across async boundaries.
/// Errors are reported as [`Error`] values and are propagated by sqlcontrib
/// exactly as returned.
///
/// # Example
///
/// ```rust,ignore
/// let cmd = Command::new("select @@IDENTITY id").transaction(Some(&tx));
/// let rows = executor.query(&cx, &cmd).await;
/// ```
pub trait Executor: Send + Sync {
    /// Handle identifying an open transaction on this executor.
    type Transaction: Send + Sync;

    /// Execute a statement (INSERT, UPDATE, DELETE) and return rows affected.
    fn execute(
        &self,
        cx: &Cx,
        command: &Command<'_, Self::Transaction>,
    ) -> impl Future<Output = Outcome<u64, Error>> + Send;

    /// Execute a query and return all rows.
    fn query(
        &self,
        cx: &Cx,
        command: &Command<'_, Self::Transaction>,
    ) -> impl Future<Output = Outcome<Vec<Row>, Error>> + Send;

    /// Execute a batch and return the rows of each result set in order.
    ///
    /// Statements that produce no result set (plain INSERTs) contribute no
    /// entry.
    fn query_multiple(
        &self,
        cx: &Cx,
        command: &Command<'_, Self::Transaction>,
    ) -> impl Future<Output = Outcome<Vec<Vec<Row>>, Error>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder() {
        let params = [("name", Value::Text("Alice".to_string()))];
        let tx = 7_u32;
        let cmd = Command::new("insert into heroes (name) values (@name)")
            .params(&params)
            .transaction(Some(&tx))
            .timeout(Some(Duration::from_secs(5)));

        assert_eq!(cmd.sql, "insert into heroes (name) values (@name)");
        assert_eq!(cmd.param("name"), Some(&Value::Text("Alice".to_string())));
        assert_eq!(cmd.param("age"), None);
        assert_eq!(cmd.transaction, Some(&7));
        assert_eq!(cmd.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_command_defaults() {
        let cmd: Command<'_, ()> = Command::new("select 1");
        assert!(cmd.params.is_empty());
        assert!(cmd.transaction.is_none());
        assert!(cmd.timeout.is_none());
    }
}
