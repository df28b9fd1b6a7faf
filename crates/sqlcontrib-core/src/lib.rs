//! Core types and traits for sqlcontrib.
//!
//! This crate provides the foundations the proxy and insert layers share:
//!
//! - `Value` and `Row` for parameters and results
//! - `Entity`, `Accessor` and `PropertyAccess` for generic property access
//! - `PropertyInfo` for key/write/computed metadata
//! - `Executor` and `Command`, the boundary to the SQL execution layer
//! - `Outcome` re-export from asupersync for cancel-correct operations
//! - `Cx` context for structured concurrency

// Re-export asupersync primitives for structured concurrency
pub use asupersync::{Cx, Outcome};

pub mod entity;
pub mod error;
pub mod executor;
pub mod identifiers;
pub mod property;
pub mod row;
pub mod value;

pub use entity::{Accessor, Entity, Getter, PropertyAccess, Setter};
pub use error::{
    ConnectionError, ConnectionErrorKind, Error, KeyError, KeyErrorKind, QueryError,
    QueryErrorKind, Result, ShapeError, ShapeErrorKind, TypeError,
};
pub use executor::{Command, Executor};
pub use identifiers::{quote_ident, quote_ident_bracket, quote_ident_mysql};
pub use property::PropertyInfo;
pub use row::{FromValue, Row};
pub use value::Value;
