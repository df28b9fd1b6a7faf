//! Dialect-aware INSERT adapters for sqlcontrib.
//!
//! A [`Dialect`] knows how one backend quotes column names and how it hands
//! back the key of a freshly inserted row. [`Dialect::insert`] runs the insert
//! through any [`Executor`](sqlcontrib_core::Executor), writes the generated
//! key(s) back onto the entity and returns the first key's value.
//!
//! # Example
//!
//! ```ignore
//! use sqlcontrib::prelude::*;
//!
//! let keys = KeyColumnSet::of::<Hero>();
//! let statement = InsertStatement::new("heroes", "[name], [age]", "@name, @age").keys(keys);
//! let options = InsertOptions::new().transaction(&tx);
//! let id = Dialect::SqlServer
//!     .insert(&cx, &conn, &options, &statement, &mut hero)
//!     .await;
//! ```

pub mod dialect;
pub mod insert;
pub mod keys;
pub mod options;

pub use dialect::{Dialect, ParseDialectError};
pub use insert::InsertStatement;
pub use keys::{KeyColumn, KeyColumnSet};
pub use options::InsertOptions;
