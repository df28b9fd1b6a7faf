//! Entity trait and the property-accessor table.
//!
//! An entity is a plain struct whose fields are its properties. Instead of
//! emitting a proxy type at runtime, every entity hands out a table of
//! accessors (one getter/setter pair per property, in declaration order).
//! The proxy layer wraps any entity generically through that table.
//!
//! The table is normally generated by `#[derive(Entity)]` from
//! `sqlcontrib-macros`, but can be written by hand for explicit registration.

use crate::Result;
use crate::property::PropertyInfo;
use crate::value::Value;

/// Reads one property as a dynamic value.
pub type Getter<T> = fn(&T) -> Value;

/// Stores a dynamic value into one property.
pub type Setter<T> = fn(&mut T, Value) -> Result<()>;

/// A getter/setter pair plus the metadata of the property it serves.
pub struct Accessor<T> {
    info: PropertyInfo,
    get: Getter<T>,
    set: Option<Setter<T>>,
}

impl<T> Accessor<T> {
    /// A read/write accessor.
    pub const fn new(info: PropertyInfo, get: Getter<T>, set: Setter<T>) -> Self {
        Self {
            info,
            get,
            set: Some(set),
        }
    }

    /// An accessor without a setter.
    ///
    /// Proxies refuse shapes containing these; the constructor exists so hand
    /// registrations can describe what they have and get a precise error.
    pub const fn read_only(info: PropertyInfo, get: Getter<T>) -> Self {
        Self {
            info,
            get,
            set: None,
        }
    }

    pub const fn info(&self) -> &PropertyInfo {
        &self.info
    }

    pub fn getter(&self) -> Getter<T> {
        self.get
    }

    pub fn setter(&self) -> Option<Setter<T>> {
        self.set
    }
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Accessor<T> {}

impl<T> std::fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accessor")
            .field("info", &self.info)
            .field("has_setter", &self.set.is_some())
            .finish()
    }
}

/// A data-shape type that can be wrapped in a change-tracking proxy.
///
/// # Example
///
/// ```ignore
/// use sqlcontrib::Entity;
///
/// #[derive(Entity, Default)]
/// #[contrib(table = "heroes")]
/// struct Hero {
///     #[contrib(key)]
///     id: Option<i64>,
///     name: String,
/// }
/// ```
pub trait Entity: Default + Send + Sync + 'static {
    /// The table this entity maps to.
    const TABLE_NAME: &'static str;

    /// One accessor per property, in declaration order.
    fn accessors() -> Vec<Accessor<Self>>;
}

/// Name-based property access used by the insert adapters.
///
/// Implemented for every derived entity and for tracked proxies, so an
/// adapter can bind parameters from, and write generated keys back into,
/// either one.
pub trait PropertyAccess {
    /// Read a property by name.
    #[allow(clippy::result_large_err)]
    fn get_value(&self, property: &str) -> Result<Value>;

    /// Write a property by name.
    #[allow(clippy::result_large_err)]
    fn set_value(&mut self, property: &str, value: Value) -> Result<()>;

    /// All properties as `(name, value)` pairs, bound to `@name` markers.
    fn parameters(&self) -> Vec<(&'static str, Value)>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::FromValue;

    #[derive(Default)]
    struct Point {
        x: i32,
    }

    #[test]
    fn test_accessor_round_trip() {
        let accessor = Accessor::<Point>::new(
            PropertyInfo::new("x", "i32"),
            |p: &Point| Value::from(p.x),
            |p: &mut Point, v: Value| {
                p.x = i32::from_value(&v)?;
                Ok(())
            },
        );

        let mut point = Point::default();
        let set = accessor.setter().expect("read/write accessor");
        set(&mut point, Value::BigInt(12)).unwrap();
        assert_eq!((accessor.getter())(&point), Value::Int(12));
        assert_eq!(accessor.info().name, "x");
    }

    #[test]
    fn test_read_only_has_no_setter() {
        let accessor =
            Accessor::<Point>::read_only(PropertyInfo::new("x", "i32"), |p: &Point| {
                Value::from(p.x)
            });
        assert!(accessor.setter().is_none());
        assert!(format!("{accessor:?}").contains("has_setter: false"));
    }
}
