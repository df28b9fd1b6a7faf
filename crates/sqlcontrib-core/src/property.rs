//! Property metadata.
//!
//! A `PropertyInfo` carries everything the mapping attributes say about one
//! entity property: which column it maps to, whether it is part of the key,
//! whether the key is assigned by the caller instead of the database, and
//! whether the property is written at all.

/// Metadata about an entity property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyInfo {
    /// Rust field name; also the bound parameter name
    pub name: &'static str,
    /// Database column name (may differ from the property name)
    pub column_name: &'static str,
    /// Rust type as written in the declaration, for diagnostics
    pub rust_type: &'static str,
    /// Part of the primary key, generated by the database
    pub key: bool,
    /// Part of the primary key, assigned by the caller
    pub explicit_key: bool,
    /// Written on insert/update (`false` for read-only columns)
    pub write: bool,
    /// Computed by the database, never written
    pub computed: bool,
}

impl PropertyInfo {
    /// Create property metadata with default flags: not a key, writable, stored.
    pub const fn new(name: &'static str, rust_type: &'static str) -> Self {
        Self {
            name,
            column_name: name,
            rust_type,
            key: false,
            explicit_key: false,
            write: true,
            computed: false,
        }
    }

    /// Set the database column name.
    pub const fn column(mut self, name: &'static str) -> Self {
        self.column_name = name;
        self
    }

    /// Mark as a database-generated key.
    pub const fn key(mut self) -> Self {
        self.key = true;
        self
    }

    /// Mark as a caller-assigned key.
    pub const fn explicit_key(mut self) -> Self {
        self.explicit_key = true;
        self
    }

    /// Set whether the property is written.
    pub const fn write(mut self, write: bool) -> Self {
        self.write = write;
        self
    }

    /// Mark as computed.
    pub const fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    /// Is this property part of the key in either flavour?
    pub const fn is_any_key(&self) -> bool {
        self.key || self.explicit_key
    }

    /// Should an INSERT carry a value for this property?
    ///
    /// Generated keys and computed columns are left to the database;
    /// explicit keys are always sent.
    pub const fn is_insertable(&self) -> bool {
        self.write && !self.computed && !self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let info = PropertyInfo::new("name", "String");
        assert_eq!(info.column_name, "name");
        assert!(info.write);
        assert!(!info.key);
        assert!(!info.explicit_key);
        assert!(!info.computed);
        assert!(info.is_insertable());
    }

    #[test]
    fn test_builder_flags() {
        let info = PropertyInfo::new("id", "Option<i64>").column("hero_id").key();
        assert_eq!(info.column_name, "hero_id");
        assert!(info.key);
        assert!(info.is_any_key());
        assert!(!info.is_insertable());

        let explicit = PropertyInfo::new("code", "String").explicit_key();
        assert!(explicit.is_any_key());
        assert!(explicit.is_insertable());
    }

    #[test]
    fn test_non_written_columns() {
        assert!(!PropertyInfo::new("total", "f64").computed().is_insertable());
        assert!(!PropertyInfo::new("cached", "String").write(false).is_insertable());
    }
}
