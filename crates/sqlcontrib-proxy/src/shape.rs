//! Entity shapes.
//!
//! An [`InterfaceShape`] is the immutable description of one entity type:
//! its identity, its table and its properties in declaration order. Key,
//! write and computed metadata live here, so code that only holds a shape
//! can still answer "is this property a key" without reflecting over the
//! entity.

use sqlcontrib_core::{Accessor, Entity, PropertyInfo};
use std::any::TypeId;

/// The data shape of an entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceShape {
    type_id: TypeId,
    type_name: &'static str,
    table_name: &'static str,
    properties: Vec<PropertyInfo>,
}

impl InterfaceShape {
    /// Derive the shape of `T` from its accessor table.
    pub fn of<T: Entity>() -> Self {
        Self::from_accessors::<T>(&T::accessors())
    }

    /// Build the shape of `T` from an accessor table already in hand.
    pub fn from_accessors<T: Entity>(accessors: &[Accessor<T>]) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            table_name: T::TABLE_NAME,
            properties: accessors.iter().map(|a| *a.info()).collect(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn table_name(&self) -> &'static str {
        self.table_name
    }

    /// All properties, in declaration order.
    pub fn properties(&self) -> &[PropertyInfo] {
        &self.properties
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Is `name` a database-generated key property?
    pub fn is_key(&self, name: &str) -> bool {
        self.property(name).is_some_and(|p| p.key)
    }

    /// Is `name` a key the caller assigns (not generated by the database)?
    pub fn is_explicit_key(&self, name: &str) -> bool {
        self.property(name).is_some_and(|p| p.explicit_key)
    }

    /// Is `name` written to the database? Unknown names are not.
    pub fn is_writable(&self, name: &str) -> bool {
        self.property(name).is_some_and(|p| p.write)
    }

    /// Is `name` a computed column?
    pub fn is_computed(&self, name: &str) -> bool {
        self.property(name).is_some_and(|p| p.computed)
    }

    /// Database-generated key properties, in declaration order.
    pub fn key_properties(&self) -> impl Iterator<Item = &PropertyInfo> {
        self.properties.iter().filter(|p| p.key)
    }

    /// Caller-assigned key properties, in declaration order.
    pub fn explicit_key_properties(&self) -> impl Iterator<Item = &PropertyInfo> {
        self.properties.iter().filter(|p| p.explicit_key)
    }

    /// Properties an INSERT should carry values for.
    pub fn insertable_properties(&self) -> impl Iterator<Item = &PropertyInfo> {
        self.properties.iter().filter(|p| p.is_insertable())
    }
}
