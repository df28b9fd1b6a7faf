//! Compile-time validation for the Entity derive macro.
//!
//! Every problem found is reported, combined into one `syn::Error`, so a
//! single build shows all of them at their source locations.

use std::collections::HashSet;

use proc_macro2::Span;
use syn::Error;

use crate::parse::EntityDef;

/// Validate a parsed entity definition.
pub fn validate_entity(entity: &EntityDef) -> Result<(), Error> {
    let mut errors = Vec::new();

    validate_has_fields(entity, &mut errors);
    validate_table_name(&entity.table_name, entity.table_span, &mut errors);
    validate_no_duplicate_columns(entity, &mut errors);
    validate_key_flags(entity, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        let mut combined = errors.remove(0);
        for err in errors {
            combined.combine(err);
        }
        Err(combined)
    }
}

fn validate_has_fields(entity: &EntityDef, errors: &mut Vec<Error>) {
    if entity.fields.is_empty() {
        errors.push(Error::new(
            entity.name.span(),
            "Entity struct must have at least one field",
        ));
    }
}

/// Reject table names that could break out of the generated statement.
fn validate_table_name(table_name: &str, span: Span, errors: &mut Vec<Error>) {
    const DANGEROUS_CHARS: &[char] = &[';', '\'', '`', '-', '/', '*', '\\', '\0', '\n', '\r'];

    if table_name.trim().is_empty() {
        errors.push(Error::new(span, "table name cannot be empty or whitespace"));
        return;
    }

    if let Some(ch) = table_name.chars().find(|c| DANGEROUS_CHARS.contains(c)) {
        errors.push(Error::new(
            span,
            format!("table name contains invalid character '{ch}'"),
        ));
    }
}

fn validate_no_duplicate_columns(entity: &EntityDef, errors: &mut Vec<Error>) {
    let mut seen: HashSet<&str> = HashSet::new();

    for field in &entity.fields {
        if !seen.insert(&field.column_name) {
            errors.push(Error::new(
                field.name.span(),
                format!(
                    "duplicate column name '{}'; another field already maps to this column",
                    field.column_name
                ),
            ));
        }
    }
}

fn validate_key_flags(entity: &EntityDef, errors: &mut Vec<Error>) {
    for field in &entity.fields {
        if field.key && field.explicit_key {
            errors.push(Error::new(
                field.name.span(),
                "`key` and `explicit_key` are mutually exclusive; use `key` for \
                 database-generated keys and `explicit_key` for caller-assigned ones",
            ));
        }
        if field.computed && (field.key || field.explicit_key) {
            errors.push(Error::new(
                field.name.span(),
                "a computed column cannot be part of the key",
            ));
        }
    }
}
