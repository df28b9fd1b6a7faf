//! Proxy types, proxies and the factory that hands them out.
//!
//! A [`ProxyType`] is the validated, indexed form of an entity's accessor
//! table. A [`Proxy`] pairs one entity value with its proxy type and a dirty
//! flag: reads go straight through, writes go through the setter and then
//! flip the flag.

use crate::cache::ProxyTypeCache;
use crate::shape::InterfaceShape;
use crate::tracking::ChangeTracking;
use sqlcontrib_core::{
    Entity, Getter, PropertyAccess, Result, Setter, ShapeError, ShapeErrorKind, Value,
};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

struct Slot<T> {
    get: Getter<T>,
    set: Setter<T>,
    key: bool,
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slot<T> {}

/// The synthesized proxy for one entity type.
///
/// Created once per type by [`ProxyTypeCache`] and shared by every proxy of
/// that type.
pub struct ProxyType<T> {
    shape: InterfaceShape,
    slots: Vec<Slot<T>>,
    index: HashMap<&'static str, usize>,
}

impl<T: Entity> ProxyType<T> {
    /// Validate `T`'s accessor table and build its proxy type.
    ///
    /// Fails with a [`ShapeError`] when the entity has no properties, a
    /// property is unnamed, two properties share a name or a column, a
    /// property lacks a setter, or a property is both computed and a key.
    #[allow(clippy::result_large_err)]
    #[tracing::instrument(level = "debug", fields(entity = std::any::type_name::<T>()))]
    pub fn synthesize() -> Result<Self> {
        let entity = std::any::type_name::<T>();
        let accessors = T::accessors();
        if accessors.is_empty() {
            return Err(ShapeError::new(
                ShapeErrorKind::Empty,
                entity,
                None,
                format!("entity `{entity}` declares no properties"),
            )
            .into());
        }

        let mut index = HashMap::with_capacity(accessors.len());
        let mut columns = HashSet::with_capacity(accessors.len());
        let mut slots = Vec::with_capacity(accessors.len());

        for (position, accessor) in accessors.iter().enumerate() {
            let info = accessor.info();
            if info.name.is_empty() {
                return Err(ShapeError::new(
                    ShapeErrorKind::UnnamedProperty,
                    entity,
                    None,
                    format!("property #{position} of `{entity}` has an empty name"),
                )
                .into());
            }
            if index.insert(info.name, position).is_some() {
                return Err(ShapeError::new(
                    ShapeErrorKind::DuplicateProperty,
                    entity,
                    Some(info.name),
                    format!("property `{}` is declared twice", info.name),
                )
                .into());
            }
            if !columns.insert(info.column_name) {
                return Err(ShapeError::new(
                    ShapeErrorKind::DuplicateColumn,
                    entity,
                    Some(info.name),
                    format!(
                        "property `{}` maps to column `{}`, which is already mapped",
                        info.name, info.column_name
                    ),
                )
                .into());
            }
            if info.computed && info.is_any_key() {
                return Err(ShapeError::new(
                    ShapeErrorKind::ComputedKey,
                    entity,
                    Some(info.name),
                    format!("property `{}` cannot be both computed and a key", info.name),
                )
                .into());
            }
            let Some(set) = accessor.setter() else {
                return Err(ShapeError::new(
                    ShapeErrorKind::MissingSetter,
                    entity,
                    Some(info.name),
                    format!("property `{}` has a getter but no setter", info.name),
                )
                .into());
            };

            slots.push(Slot {
                get: accessor.getter(),
                set,
                key: info.is_any_key(),
            });
        }

        Ok(Self {
            shape: InterfaceShape::from_accessors::<T>(&accessors),
            slots,
            index,
        })
    }

    pub fn shape(&self) -> &InterfaceShape {
        &self.shape
    }

    #[allow(clippy::result_large_err)]
    fn slot(&self, property: &str) -> Result<&Slot<T>> {
        self.index
            .get(property)
            .map(|&i| &self.slots[i])
            .ok_or_else(|| ShapeError::unknown_property(self.shape.type_name(), property).into())
    }
}

impl<T> fmt::Debug for ProxyType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyType")
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

/// An entity value wrapped with a dirty flag.
///
/// Dereferences to the entity for reads. Writes go through
/// [`set`](Self::set) or [`modify`](Self::modify) so the flag stays honest.
pub struct Proxy<T> {
    value: T,
    proxy_type: Arc<ProxyType<T>>,
    dirty: bool,
}

impl<T: Entity> Proxy<T> {
    fn new(proxy_type: Arc<ProxyType<T>>, value: T) -> Self {
        Self {
            value,
            proxy_type,
            dirty: false,
        }
    }

    pub fn shape(&self) -> &InterfaceShape {
        self.proxy_type.shape()
    }

    pub fn proxy_type(&self) -> &Arc<ProxyType<T>> {
        &self.proxy_type
    }

    /// Do both proxies share one synthesized proxy type?
    pub fn same_type(&self, other: &Proxy<T>) -> bool {
        Arc::ptr_eq(&self.proxy_type, &other.proxy_type)
    }

    /// Read a property.
    #[allow(clippy::result_large_err)]
    pub fn get(&self, property: &str) -> Result<Value> {
        let slot = self.proxy_type.slot(property)?;
        Ok((slot.get)(&self.value))
    }

    /// Write a property and mark the proxy dirty.
    ///
    /// Key properties are stored without touching the flag. If the value
    /// cannot be converted to the property's type, neither the entity nor
    /// the flag changes.
    #[allow(clippy::result_large_err)]
    pub fn set(&mut self, property: &str, value: impl Into<Value>) -> Result<()> {
        let slot = *self.proxy_type.slot(property)?;
        (slot.set)(&mut self.value, value.into())?;
        if !slot.key {
            self.dirty = true;
        }
        tracing::trace!(
            entity = self.proxy_type.shape().type_name(),
            property,
            dirty = self.dirty,
            "Proxy property set"
        );
        Ok(())
    }

    /// Mutate the entity in place and mark the proxy dirty.
    pub fn modify<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = f(&mut self.value);
        self.dirty = true;
        result
    }

    /// Unwrap the entity, dropping the flag.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> Deref for Proxy<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Entity> ChangeTracking for Proxy<T> {
    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }
}

impl<T: Entity> PropertyAccess for Proxy<T> {
    fn get_value(&self, property: &str) -> Result<Value> {
        self.get(property)
    }

    fn set_value(&mut self, property: &str, value: Value) -> Result<()> {
        self.set(property, value)
    }

    fn parameters(&self) -> Vec<(&'static str, Value)> {
        self.shape()
            .properties()
            .iter()
            .zip(&self.proxy_type.slots)
            .map(|(info, slot)| (info.name, (slot.get)(&self.value)))
            .collect()
    }
}

impl<T: Clone> Clone for Proxy<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            proxy_type: Arc::clone(&self.proxy_type),
            dirty: self.dirty,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Proxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("value", &self.value)
            .field("dirty", &self.dirty)
            .finish()
    }
}

/// Hands out proxies backed by a [`ProxyTypeCache`].
#[derive(Debug, Clone, Copy)]
pub struct ProxyFactory<'c> {
    cache: &'c ProxyTypeCache,
}

impl ProxyFactory<'static> {
    /// A factory over the process-wide cache.
    pub fn global() -> Self {
        Self::new(ProxyTypeCache::global())
    }
}

impl Default for ProxyFactory<'static> {
    fn default() -> Self {
        Self::global()
    }
}

impl<'c> ProxyFactory<'c> {
    pub fn new(cache: &'c ProxyTypeCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &'c ProxyTypeCache {
        self.cache
    }

    /// The proxy type for `T`, synthesized on first use.
    #[allow(clippy::result_large_err)]
    pub fn proxy_type<T: Entity>(&self) -> Result<Arc<ProxyType<T>>> {
        self.cache.get_or_create(ProxyType::<T>::synthesize)
    }

    /// The validated shape of `T`.
    #[allow(clippy::result_large_err)]
    pub fn shape<T: Entity>(&self) -> Result<InterfaceShape> {
        Ok(self.proxy_type::<T>()?.shape().clone())
    }

    /// A fresh clean proxy around `T::default()`.
    #[allow(clippy::result_large_err)]
    pub fn create<T: Entity>(&self) -> Result<Proxy<T>> {
        self.wrap(T::default())
    }

    /// A clean proxy around an existing value.
    #[allow(clippy::result_large_err)]
    pub fn wrap<T: Entity>(&self, value: T) -> Result<Proxy<T>> {
        Ok(Proxy::new(self.proxy_type::<T>()?, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlcontrib_core::{Accessor, Error, FromValue, PropertyInfo};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Hero {
        id: Option<i64>,
        name: String,
        age: Option<i32>,
    }

    impl Entity for Hero {
        const TABLE_NAME: &'static str = "heroes";

        fn accessors() -> Vec<Accessor<Self>> {
            vec![
                Accessor::new(
                    PropertyInfo::new("id", "Option<i64>").key(),
                    |e: &Self| Value::from(e.id),
                    |e: &mut Self, v: Value| {
                        e.id = FromValue::from_value(&v)?;
                        Ok(())
                    },
                ),
                Accessor::new(
                    PropertyInfo::new("name", "String"),
                    |e: &Self| Value::from(e.name.clone()),
                    |e: &mut Self, v: Value| {
                        e.name = FromValue::from_value(&v)?;
                        Ok(())
                    },
                ),
                Accessor::new(
                    PropertyInfo::new("age", "Option<i32>"),
                    |e: &Self| Value::from(e.age),
                    |e: &mut Self, v: Value| {
                        e.age = FromValue::from_value(&v)?;
                        Ok(())
                    },
                ),
            ]
        }
    }

    macro_rules! bad_entity {
        ($name:ident, [$($accessor:expr),* $(,)?]) => {
            #[derive(Default)]
            #[allow(dead_code)]
            struct $name {
                a: i64,
            }

            impl Entity for $name {
                const TABLE_NAME: &'static str = "bad";

                fn accessors() -> Vec<Accessor<Self>> {
                    vec![$($accessor),*]
                }
            }
        };
    }

    fn get_a<T>(_: &T) -> Value {
        Value::Null
    }

    fn set_a<T>(_: &mut T, _: Value) -> Result<()> {
        Ok(())
    }

    bad_entity!(Unnamed, [Accessor::new(PropertyInfo::new("", "i64"), get_a, set_a)]);
    bad_entity!(
        DupName,
        [
            Accessor::new(PropertyInfo::new("a", "i64"), get_a, set_a),
            Accessor::new(PropertyInfo::new("a", "i64").column("b"), get_a, set_a),
        ]
    );
    bad_entity!(
        DupColumn,
        [
            Accessor::new(PropertyInfo::new("a", "i64"), get_a, set_a),
            Accessor::new(PropertyInfo::new("b", "i64").column("a"), get_a, set_a),
        ]
    );
    bad_entity!(
        NoSetter,
        [Accessor::read_only(PropertyInfo::new("a", "i64"), |e: &NoSetter| {
            Value::from(e.a)
        })]
    );
    bad_entity!(
        ComputedKey,
        [Accessor::new(PropertyInfo::new("a", "i64").key().computed(), get_a, set_a)]
    );

    fn shape_error_kind<T: Entity>() -> ShapeErrorKind {
        match ProxyType::<T>::synthesize() {
            Err(Error::Shape(e)) => e.kind,
            other => panic!("expected shape error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_malformed_shapes_are_rejected() {
        assert_eq!(shape_error_kind::<Unnamed>(), ShapeErrorKind::UnnamedProperty);
        assert_eq!(shape_error_kind::<DupName>(), ShapeErrorKind::DuplicateProperty);
        assert_eq!(shape_error_kind::<DupColumn>(), ShapeErrorKind::DuplicateColumn);
        assert_eq!(shape_error_kind::<NoSetter>(), ShapeErrorKind::MissingSetter);
        assert_eq!(shape_error_kind::<ComputedKey>(), ShapeErrorKind::ComputedKey);
    }

    #[test]
    fn test_new_proxy_is_clean_and_default() {
        let cache = ProxyTypeCache::new();
        let proxy = ProxyFactory::new(&cache).create::<Hero>().unwrap();

        assert!(!proxy.is_dirty());
        assert_eq!(*proxy, Hero::default());
        assert_eq!(proxy.shape().table_name(), "heroes");
    }

    #[test]
    fn test_set_marks_dirty_and_stores() {
        let cache = ProxyTypeCache::new();
        let mut proxy = ProxyFactory::new(&cache).create::<Hero>().unwrap();

        proxy.set("name", "Deadpond").unwrap();
        assert!(proxy.is_dirty());
        assert_eq!(proxy.name, "Deadpond");
        assert_eq!(proxy.get("name").unwrap(), Value::Text("Deadpond".to_string()));
    }

    #[test]
    fn test_key_setter_keeps_flag() {
        let cache = ProxyTypeCache::new();
        let mut proxy = ProxyFactory::new(&cache).create::<Hero>().unwrap();

        proxy.set("id", 42_i64).unwrap();
        assert_eq!(proxy.id, Some(42));
        assert!(!proxy.is_dirty());
    }

    #[test]
    fn test_mark_clean_then_set_again() {
        let cache = ProxyTypeCache::new();
        let mut proxy = ProxyFactory::new(&cache).create::<Hero>().unwrap();

        proxy.set("age", 30).unwrap();
        proxy.mark_clean();
        assert!(!proxy.is_dirty());
        proxy.set("age", Value::Null).unwrap();
        assert!(proxy.is_dirty());
        assert_eq!(proxy.age, None);
    }

    #[test]
    fn test_set_dirty_directly() {
        let cache = ProxyTypeCache::new();
        let mut proxy = ProxyFactory::new(&cache).create::<Hero>().unwrap();

        proxy.set_dirty(true);
        assert!(proxy.is_dirty());
        assert_eq!(*proxy, Hero::default());
    }

    #[test]
    fn test_mismatched_value_leaves_proxy_unchanged() {
        let cache = ProxyTypeCache::new();
        let mut proxy = ProxyFactory::new(&cache).create::<Hero>().unwrap();

        let err = proxy.set("age", "not a number").unwrap_err();
        assert!(matches!(err, Error::Type(_)));
        assert!(!proxy.is_dirty());
        assert_eq!(proxy.age, None);
    }

    #[test]
    fn test_unknown_property() {
        let cache = ProxyTypeCache::new();
        let mut proxy = ProxyFactory::new(&cache).create::<Hero>().unwrap();

        let err = proxy.set("power", 9000).unwrap_err();
        assert!(matches!(err, Error::Shape(ref e) if e.kind == ShapeErrorKind::UnknownProperty));
        assert!(proxy.get("power").is_err());
        assert!(!proxy.is_dirty());
    }

    #[test]
    fn test_modify_marks_dirty() {
        let cache = ProxyTypeCache::new();
        let mut proxy = ProxyFactory::new(&cache).create::<Hero>().unwrap();

        let len = proxy.modify(|hero| {
            hero.name.push_str("Rusty-Man");
            hero.name.len()
        });
        assert_eq!(len, 9);
        assert!(proxy.is_dirty());
    }

    #[test]
    fn test_proxies_share_type_but_not_state() {
        let cache = ProxyTypeCache::new();
        let factory = ProxyFactory::new(&cache);
        let mut a = factory.create::<Hero>().unwrap();
        let b = factory.create::<Hero>().unwrap();

        a.set("name", "Spider-Boy").unwrap();
        assert!(a.same_type(&b));
        assert!(a.is_dirty());
        assert!(!b.is_dirty());
        assert_eq!(b.name, "");
        assert_eq!(cache.synthesis_count(), 1);
    }

    #[test]
    fn test_wrap_existing_value() {
        let cache = ProxyTypeCache::new();
        let hero = Hero {
            id: Some(1),
            name: "Tarantula".to_string(),
            age: Some(32),
        };
        let proxy = ProxyFactory::new(&cache).wrap(hero.clone()).unwrap();

        assert!(!proxy.is_dirty());
        assert_eq!(proxy.clone().into_inner(), hero);
    }

    #[test]
    fn test_parameters_in_declaration_order() {
        let cache = ProxyTypeCache::new();
        let mut proxy = ProxyFactory::new(&cache).create::<Hero>().unwrap();
        proxy.set("name", "Dormammu").unwrap();

        let params = proxy.parameters();
        assert_eq!(
            params,
            vec![
                ("id", Value::Null),
                ("name", Value::Text("Dormammu".to_string())),
                ("age", Value::Null),
            ]
        );
    }

    #[test]
    fn test_property_access_set_value_tracks() {
        let cache = ProxyTypeCache::new();
        let mut proxy = ProxyFactory::new(&cache).create::<Hero>().unwrap();

        PropertyAccess::set_value(&mut proxy, "name", Value::from("Black Lion")).unwrap();
        assert!(proxy.is_dirty());
        assert_eq!(
            PropertyAccess::get_value(&proxy, "name").unwrap(),
            Value::from("Black Lion")
        );
    }

    #[test]
    fn test_shape_via_factory() {
        let cache = ProxyTypeCache::new();
        let shape = ProxyFactory::new(&cache).shape::<Hero>().unwrap();
        let keys: Vec<_> = shape.key_properties().map(|p| p.name).collect();
        assert_eq!(keys, ["id"]);
        assert!(cache.contains::<Hero>());
    }
}
