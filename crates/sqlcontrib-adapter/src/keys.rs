//! Key columns of an insert.

use sqlcontrib_core::{Entity, PropertyInfo};

/// One database-generated key: the entity property and the column it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyColumn {
    pub property: &'static str,
    pub column: &'static str,
}

impl KeyColumn {
    /// A key whose column is named after the property.
    pub const fn new(property: &'static str) -> Self {
        Self {
            property,
            column: property,
        }
    }

    /// A key mapped to a differently named column.
    pub const fn mapped(property: &'static str, column: &'static str) -> Self {
        Self { property, column }
    }
}

impl From<&PropertyInfo> for KeyColumn {
    fn from(info: &PropertyInfo) -> Self {
        Self::mapped(info.name, info.column_name)
    }
}

/// The ordered keys an insert should resolve.
///
/// Empty for join tables, one entry in the usual case, several for compound
/// keys. Only [`Dialect::Postgres`](crate::Dialect::Postgres) writes back
/// more than the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyColumnSet {
    columns: Vec<KeyColumn>,
}

impl KeyColumnSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The generated-key properties among `properties`, in order.
    ///
    /// Caller-assigned keys are skipped: their values are part of the
    /// insert itself and need no write-back.
    pub fn from_properties<'p>(properties: impl IntoIterator<Item = &'p PropertyInfo>) -> Self {
        properties
            .into_iter()
            .filter(|p| p.key)
            .map(KeyColumn::from)
            .collect()
    }

    /// The generated keys of entity `T`.
    pub fn of<T: Entity>() -> Self {
        Self::from_properties(T::accessors().iter().map(|a| a.info()))
    }

    /// Append a key.
    pub fn with(mut self, key: KeyColumn) -> Self {
        self.columns.push(key);
        self
    }

    pub fn push(&mut self, key: KeyColumn) {
        self.columns.push(key);
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn first(&self) -> Option<&KeyColumn> {
        self.columns.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeyColumn> {
        self.columns.iter()
    }
}

impl FromIterator<KeyColumn> for KeyColumnSet {
    fn from_iter<I: IntoIterator<Item = KeyColumn>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a KeyColumnSet {
    type Item = &'a KeyColumn;
    type IntoIter = std::slice::Iter<'a, KeyColumn>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
