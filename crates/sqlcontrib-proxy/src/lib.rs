//! Change-tracking proxies for sqlcontrib entities.
//!
//! `sqlcontrib-proxy` wraps any [`Entity`](sqlcontrib_core::Entity) in a
//! [`Proxy`] that behaves like the entity for reads and remembers whether it
//! was written to since the last save.
//!
//! - [`InterfaceShape`] describes an entity type (properties and key metadata)
//! - [`ProxyType`] is the validated, per-type proxy, synthesized once
//! - [`ProxyTypeCache`] stores proxy types, process-wide or per caller
//! - [`ProxyFactory`] hands out fresh or wrapping proxies
//! - [`ChangeTracking`] is the dirty-flag capability
//!
//! # Example
//!
//! ```ignore
//! use sqlcontrib::prelude::*;
//!
//! let mut hero = ProxyFactory::global().create::<Hero>()?;
//! assert!(!hero.is_dirty());
//! hero.set("name", "Deadpond")?;
//! assert!(hero.is_dirty());
//! ```

pub mod cache;
pub mod proxy;
pub mod shape;
pub mod tracking;

pub use cache::ProxyTypeCache;
pub use proxy::{Proxy, ProxyFactory, ProxyType};
pub use shape::InterfaceShape;
pub use tracking::ChangeTracking;
