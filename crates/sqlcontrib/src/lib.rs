//! sqlcontrib - change-tracking entities and dialect-aware inserts.
//!
//! Two pieces that sit on top of any SQL execution layer:
//!
//! - **Proxies**: wrap an entity in a [`Proxy`] that reads like the entity and
//!   remembers whether it was modified ([`ChangeTracking`]). Proxy types are
//!   synthesized once per entity type and cached process-wide.
//! - **Insert adapters**: a [`Dialect`] per backend (SQL Server, SQL Server
//!   Compact, MySQL, PostgreSQL, SQLite, Firebird) that quotes columns, runs
//!   an INSERT through your [`Executor`] and writes the generated key back.
//!
//! # Quick Start
//!
//! ```ignore
//! use sqlcontrib::prelude::*;
//!
//! #[derive(Entity, Default, Clone, Debug)]
//! #[contrib(table = "heroes")]
//! struct Hero {
//!     #[contrib(key)]
//!     id: Option<i64>,
//!     name: String,
//!     age: Option<i32>,
//! }
//!
//! async fn save(cx: &Cx, conn: &impl Executor<Transaction = Tx>, tx: &Tx) -> Outcome<i64, Error> {
//!     let mut hero = ProxyFactory::global().create::<Hero>().expect("valid entity");
//!     hero.set("name", "Deadpond").expect("known property");
//!
//!     let dialect = Dialect::SqlServer;
//!     let statement = InsertStatement::new("heroes", "[name], [age]", "@name, @age")
//!         .keys(KeyColumnSet::of::<Hero>());
//!     let options = InsertOptions::new().transaction(tx);
//!     dialect.insert(cx, conn, &options, &statement, &mut hero).await
//! }
//! ```

// Re-export all public types from sub-crates
pub use sqlcontrib_core::{
    Accessor, Command, ConnectionError, ConnectionErrorKind, Cx, Entity, Error,
    Executor, FromValue, Getter, KeyError, KeyErrorKind, Outcome, PropertyAccess, PropertyInfo,
    QueryError, QueryErrorKind, Result, Row, Setter, ShapeError, ShapeErrorKind, TypeError, Value,
    quote_ident, quote_ident_bracket, quote_ident_mysql,
};

pub use sqlcontrib_macros::Entity;

pub use sqlcontrib_proxy::{
    ChangeTracking, InterfaceShape, Proxy, ProxyFactory, ProxyType, ProxyTypeCache,
};

pub use sqlcontrib_adapter::{
    Dialect, InsertOptions, InsertStatement, KeyColumn, KeyColumnSet, ParseDialectError,
};

/// Everything an application typically needs, in one import.
pub mod prelude {
    pub use crate::{
        // Proxies
        ChangeTracking,
        Cx,
        // Insert adapters
        Dialect,
        // Core traits and types (Entity is both the trait and the derive)
        Entity,
        Error,
        Executor,
        InsertOptions,
        InsertStatement,
        KeyColumnSet,
        Outcome,
        PropertyAccess,
        Proxy,
        ProxyFactory,
        Result,
        Row,
        Value,
    };
}
