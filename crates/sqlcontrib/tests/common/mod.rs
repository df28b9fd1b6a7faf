//! Shared fixtures for integration tests: a recording mock executor.

#![allow(dead_code)]

use asupersync::runtime::RuntimeBuilder;
use sqlcontrib::{Command, Cx, Error, Executor, Outcome, Row, Value};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Transaction handle understood by [`MockExecutor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockTx(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Execute,
    Query,
    QueryMultiple,
}

/// One command as the executor saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub sql: String,
    pub params: Vec<(&'static str, Value)>,
    pub transaction: Option<MockTx>,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Default)]
struct State {
    recorded: Vec<Recorded>,
    rows: VecDeque<Vec<Row>>,
    sets: VecDeque<Vec<Vec<Row>>>,
    failures: VecDeque<Error>,
    query_failures: VecDeque<Error>,
}

/// Executor that records every command and replays scripted results.
///
/// `query` pops from the row queue, `query_multiple` from the result-set
/// queue; both default to empty. A queued failure is returned by the next
/// call of any kind.
#[derive(Debug, Clone, Default)]
pub struct MockExecutor {
    state: Arc<Mutex<State>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_rows(&self, rows: Vec<Row>) -> &Self {
        self.state.lock().expect("lock poisoned").rows.push_back(rows);
        self
    }

    pub fn push_sets(&self, sets: Vec<Vec<Row>>) -> &Self {
        self.state.lock().expect("lock poisoned").sets.push_back(sets);
        self
    }

    pub fn fail_next(&self, error: Error) -> &Self {
        self.state
            .lock()
            .expect("lock poisoned")
            .failures
            .push_back(error);
        self
    }

    /// Fail the next `query` call only.
    pub fn fail_next_query(&self, error: Error) -> &Self {
        self.state
            .lock()
            .expect("lock poisoned")
            .query_failures
            .push_back(error);
        self
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.state.lock().expect("lock poisoned").recorded.clone()
    }

    fn record(&self, method: Method, command: &Command<'_, MockTx>) -> Option<Error> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.recorded.push(Recorded {
            method,
            sql: command.sql.to_string(),
            params: command.params.to_vec(),
            transaction: command.transaction.copied(),
            timeout: command.timeout,
        });
        state.failures.pop_front()
    }
}

impl Executor for MockExecutor {
    type Transaction = MockTx;

    fn execute(
        &self,
        _cx: &Cx,
        command: &Command<'_, MockTx>,
    ) -> impl Future<Output = Outcome<u64, Error>> + Send {
        let failure = self.record(Method::Execute, command);
        async move {
            match failure {
                Some(e) => Outcome::Err(e),
                None => Outcome::Ok(1),
            }
        }
    }

    fn query(
        &self,
        _cx: &Cx,
        command: &Command<'_, MockTx>,
    ) -> impl Future<Output = Outcome<Vec<Row>, Error>> + Send {
        let failure = self.record(Method::Query, command);
        let mut state = self.state.lock().expect("lock poisoned");
        let failure = failure.or_else(|| state.query_failures.pop_front());
        let rows = state.rows.pop_front().unwrap_or_default();
        drop(state);
        async move {
            match failure {
                Some(e) => Outcome::Err(e),
                None => Outcome::Ok(rows),
            }
        }
    }

    fn query_multiple(
        &self,
        _cx: &Cx,
        command: &Command<'_, MockTx>,
    ) -> impl Future<Output = Outcome<Vec<Vec<Row>>, Error>> + Send {
        let failure = self.record(Method::QueryMultiple, command);
        let sets = self
            .state
            .lock()
            .expect("lock poisoned")
            .sets
            .pop_front()
            .unwrap_or_default();
        async move {
            match failure {
                Some(e) => Outcome::Err(e),
                None => Outcome::Ok(sets),
            }
        }
    }
}

/// A single-column row.
pub fn row(column: &str, value: impl Into<Value>) -> Row {
    Row::new(vec![column.to_string()], vec![value.into()])
}

/// Drive a future to completion on a fresh current-thread runtime.
pub fn block_on<F: Future>(future: F) -> F::Output {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    rt.block_on(future)
}

pub fn unwrap_outcome<T>(outcome: Outcome<T, Error>) -> T {
    match outcome {
        Outcome::Ok(v) => v,
        Outcome::Err(e) => panic!("unexpected error: {e}"),
        Outcome::Cancelled(r) => panic!("cancelled: {r:?}"),
        Outcome::Panicked(p) => panic!("panicked: {p:?}"),
    }
}

pub fn unwrap_err<T>(outcome: Outcome<T, Error>) -> Error {
    match outcome {
        Outcome::Ok(_) => panic!("expected an error"),
        Outcome::Err(e) => e,
        Outcome::Cancelled(r) => panic!("cancelled: {r:?}"),
        Outcome::Panicked(p) => panic!("panicked: {p:?}"),
    }
}
