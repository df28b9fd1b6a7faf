//! Attribute parsing for the Entity derive macro.

use proc_macro2::Span;
use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Error, Field, Fields, Generics, Ident, Lit, Result, Type};

/// A parsed entity struct.
#[derive(Debug)]
pub struct EntityDef {
    pub name: Ident,
    pub table_name: String,
    pub table_span: Span,
    pub fields: Vec<FieldDef>,
    pub generics: Generics,
}

/// A parsed entity field.
#[derive(Debug)]
pub struct FieldDef {
    pub name: Ident,
    /// Property name as seen at runtime (raw-identifier prefix removed)
    pub property: String,
    pub column_name: String,
    pub ty: Type,
    pub key: bool,
    pub explicit_key: bool,
    pub write: bool,
    pub computed: bool,
}

/// Parse a derive input into an [`EntityDef`].
///
/// When no field is marked as a key, a field named `id` (any case) becomes
/// the generated key.
pub fn parse_entity(input: &DeriveInput) -> Result<EntityDef> {
    let name = input.ident.clone();
    let generics = input.generics.clone();

    let (table_name, table_span) = parse_struct_attrs(&input.attrs, &name)?;

    let mut fields = match &input.data {
        Data::Struct(data) => parse_fields(&data.fields)?,
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                input,
                "Entity can only be derived for structs, not enums",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Entity can only be derived for structs, not unions",
            ));
        }
    };

    if !fields.iter().any(|f| f.key || f.explicit_key) {
        if let Some(id) = fields
            .iter_mut()
            .find(|f| f.property.eq_ignore_ascii_case("id"))
        {
            id.key = true;
        }
    }

    Ok(EntityDef {
        name,
        table_name,
        table_span,
        fields,
        generics,
    })
}

/// Parse struct-level `#[contrib(...)]` attributes.
///
/// Supported keys:
/// - `table = "name"` (overrides the derived table name)
fn parse_struct_attrs(attrs: &[Attribute], struct_name: &Ident) -> Result<(String, Span)> {
    let mut table: Option<(String, Span)> = None;

    for attr in attrs {
        if !attr.path().is_ident("contrib") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let value: Lit = meta.value()?.parse()?;
                if let Lit::Str(lit_str) = value {
                    table = Some((lit_str.value(), lit_str.span()));
                    Ok(())
                } else {
                    Err(Error::new_spanned(
                        value,
                        "expected string literal for table name",
                    ))
                }
            } else {
                Err(meta.error(format!(
                    "unknown contrib struct attribute `{}`; expected `table`",
                    meta.path.get_ident().map_or_else(String::new, ToString::to_string)
                )))
            }
        })?;
    }

    Ok(table.unwrap_or_else(|| {
        (
            derive_table_name(&struct_name.unraw().to_string()),
            struct_name.span(),
        )
    }))
}

/// Derive a table name from a struct name: snake_case, then pluralized.
///
/// Examples:
/// - `Hero` -> `heroes`
/// - `TeamMember` -> `team_members`
/// - `Category` -> `categories`
fn derive_table_name(struct_name: &str) -> String {
    pluralize(&to_snake_case(struct_name))
}

/// Convert PascalCase to snake_case.
///
/// Examples:
/// - `Hero` -> `hero`
/// - `TeamMember` -> `team_member`
/// - `HTTPServer` -> `http_server`
fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let chars: Vec<char> = s.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next = chars.get(i + 1).copied();

                // New word after lowercase, or the last capital of an acronym
                // followed by lowercase.
                if prev.is_lowercase()
                    || (prev.is_uppercase() && next.is_some_and(char::is_lowercase))
                {
                    result.push('_');
                }
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}

/// Simple English pluralization.
fn pluralize(word: &str) -> String {
    match word {
        "person" => return "people".to_string(),
        "child" => return "children".to_string(),
        "man" => return "men".to_string(),
        "woman" => return "women".to_string(),
        "datum" => return "data".to_string(),
        "index" => return "indices".to_string(),
        "analysis" => return "analyses".to_string(),
        _ => {}
    }

    if word.is_empty() {
        return String::new();
    }

    if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return format!("{word}es");
    }

    if let Some(stem) = word.strip_suffix('y') {
        if stem.chars().last().is_some_and(|c| !"aeiou".contains(c)) {
            return format!("{stem}ies");
        }
        return format!("{word}s");
    }

    if let Some(stem) = word.strip_suffix("fe") {
        return format!("{stem}ves");
    }

    if word.ends_with('o') {
        let consonant_before = word
            .chars()
            .rev()
            .nth(1)
            .is_some_and(|c| !"aeiou".contains(c));
        let exceptions = ["photo", "piano", "halo", "memo", "pro", "auto"];
        if consonant_before && !exceptions.contains(&word) {
            return format!("{word}es");
        }
    }

    format!("{word}s")
}

/// Parse all fields from a struct.
fn parse_fields(fields: &Fields) -> Result<Vec<FieldDef>> {
    match fields {
        Fields::Named(named) => named.named.iter().map(parse_field).collect(),
        Fields::Unnamed(_) => Err(Error::new(
            Span::call_site(),
            "Entity requires a struct with named fields, not a tuple struct",
        )),
        Fields::Unit => Err(Error::new(
            Span::call_site(),
            "Entity requires a struct with fields, not a unit struct",
        )),
    }
}

/// Parse a single field and its attributes.
fn parse_field(field: &Field) -> Result<FieldDef> {
    let name = field
        .ident
        .clone()
        .ok_or_else(|| Error::new_spanned(field, "expected named field"))?;
    let property = name.unraw().to_string();
    let attrs = parse_field_attrs(&field.attrs)?;

    Ok(FieldDef {
        column_name: attrs.column.unwrap_or_else(|| property.clone()),
        name,
        property,
        ty: field.ty.clone(),
        key: attrs.key,
        explicit_key: attrs.explicit_key,
        write: attrs.write.unwrap_or(true),
        computed: attrs.computed,
    })
}

#[derive(Default)]
struct FieldAttrs {
    key: bool,
    explicit_key: bool,
    write: Option<bool>,
    computed: bool,
    column: Option<String>,
}

/// Parse field-level `#[contrib(...)]` attributes.
///
/// Supported keys: `key`, `explicit_key`, `write = <bool>`, `computed`,
/// `column = "name"`.
fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("contrib") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            let path = &meta.path;

            if path.is_ident("key") {
                result.key = true;
            } else if path.is_ident("explicit_key") {
                result.explicit_key = true;
            } else if path.is_ident("computed") {
                result.computed = true;
            } else if path.is_ident("write") {
                let value: Lit = meta.value()?.parse()?;
                if let Lit::Bool(lit_bool) = value {
                    result.write = Some(lit_bool.value);
                } else {
                    return Err(Error::new_spanned(
                        value,
                        "expected boolean literal for write",
                    ));
                }
            } else if path.is_ident("column") {
                let value: Lit = meta.value()?.parse()?;
                if let Lit::Str(lit_str) = value {
                    result.column = Some(lit_str.value());
                } else {
                    return Err(Error::new_spanned(
                        value,
                        "expected string literal for column name",
                    ));
                }
            } else {
                return Err(meta.error(
                    "unknown contrib field attribute; expected one of \
                     `key`, `explicit_key`, `write`, `computed`, `column`",
                ));
            }
            Ok(())
        })?;
    }

    Ok(result)
}
