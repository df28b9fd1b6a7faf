//! Single-row INSERT with generated-key write-back.
//!
//! Each dialect gets the new row's key back in its own way:
//!
//! | Dialect | Round trips | Key source |
//! |---|---|---|
//! | SqlServer | 1 batch | `SCOPE_IDENTITY()` |
//! | SqlServerCompact | 2 | `@@IDENTITY` |
//! | MySql | 2 | `LAST_INSERT_ID()` |
//! | Postgres | 1 | `RETURNING` on the insert |
//! | Sqlite | 1 batch | `last_insert_rowid()` |
//! | Firebird | 2 | newest key by descending order |
//!
//! Only Postgres writes back compound keys. The other dialects resolve the
//! first key and log a warning when more are declared.
//!
//! The Firebird lookup reads the largest key in the table, not the key of
//! this insert. Under concurrent inserts into the same table it can return
//! another session's row.

use crate::dialect::Dialect;
use crate::keys::{KeyColumn, KeyColumnSet};
use crate::options::InsertOptions;
use sqlcontrib_core::{
    Command, Cx, Error, Executor, KeyError, KeyErrorKind, Outcome, PropertyAccess, Result, Row,
    TypeError, Value,
};

/// The pieces of one INSERT, prepared by the caller.
///
/// `columns` and `parameters` are ready-made SQL fragments, typically built
/// with [`Dialect::append_column`] and `@name` markers. Parameter values are
/// taken from the entity at execution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement<'a> {
    table: &'a str,
    columns: &'a str,
    parameters: &'a str,
    keys: KeyColumnSet,
}

impl<'a> InsertStatement<'a> {
    pub fn new(table: &'a str, columns: &'a str, parameters: &'a str) -> Self {
        Self {
            table,
            columns,
            parameters,
            keys: KeyColumnSet::new(),
        }
    }

    /// Set the generated keys to resolve after the insert.
    pub fn keys(mut self, keys: KeyColumnSet) -> Self {
        self.keys = keys;
        self
    }

    pub fn table(&self) -> &'a str {
        self.table
    }

    pub fn columns(&self) -> &'a str {
        self.columns
    }

    pub fn parameters(&self) -> &'a str {
        self.parameters
    }

    pub fn key_columns(&self) -> &KeyColumnSet {
        &self.keys
    }
}

impl Dialect {
    /// The statement (or batch) that performs the insert.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlcontrib_adapter::{Dialect, InsertStatement};
    ///
    /// let stmt = InsertStatement::new("heroes", "[name]", "@name");
    /// assert_eq!(
    ///     Dialect::SqlServer.insert_sql(&stmt),
    ///     "insert into heroes ([name]) values (@name);select SCOPE_IDENTITY() id"
    /// );
    /// ```
    pub fn insert_sql(self, statement: &InsertStatement<'_>) -> String {
        let InsertStatement {
            table,
            columns,
            parameters,
            ..
        } = statement;
        match self {
            Dialect::SqlServer => format!(
                "insert into {table} ({columns}) values ({parameters});select SCOPE_IDENTITY() id"
            ),
            Dialect::Sqlite => format!(
                "INSERT INTO {table} ({columns}) VALUES ({parameters}); SELECT last_insert_rowid() id"
            ),
            Dialect::Postgres => {
                let mut sql = format!("insert into {table} ({columns}) values ({parameters})");
                if statement.keys.is_empty() {
                    sql.push_str(" RETURNING *");
                } else {
                    sql.push_str(" RETURNING ");
                    for (i, key) in statement.keys.iter().enumerate() {
                        if i > 0 {
                            sql.push_str(", ");
                        }
                        sql.push_str(key.column);
                    }
                }
                sql
            }
            Dialect::SqlServerCompact | Dialect::MySql | Dialect::Firebird => {
                format!("insert into {table} ({columns}) values ({parameters})")
            }
        }
    }

    /// The follow-up query that reads the generated key, for dialects that
    /// need a second round trip. `None` when the key arrives with the insert
    /// or there is no key to read.
    pub fn identity_sql(self, statement: &InsertStatement<'_>) -> Option<String> {
        if statement.keys.is_empty() {
            return None;
        }
        match self {
            Dialect::SqlServerCompact => Some("select @@IDENTITY id".to_string()),
            Dialect::MySql => Some("Select LAST_INSERT_ID() id".to_string()),
            Dialect::Firebird => {
                let key = statement.keys.first()?.column;
                Some(format!(
                    "SELECT FIRST 1 {key} ID FROM {} ORDER BY {key} DESC",
                    statement.table
                ))
            }
            Dialect::SqlServer | Dialect::Postgres | Dialect::Sqlite => None,
        }
    }

    /// Insert `entity` and write its generated key(s) back.
    ///
    /// Returns the first key's value, or 0 when there are no keys or the
    /// backend reported a NULL identity. Parameters are bound from
    /// [`PropertyAccess::parameters`]. Every statement runs on `executor`
    /// with the transaction and timeout from `options`.
    ///
    /// Executor failures are returned exactly as reported. An identity
    /// query that comes back empty is a [`KeyError`].
    ///
    /// The reported identity must be integral. On Postgres a first key of
    /// any other kind (a generated UUID, say) fails with [`Error::Type`]
    /// after the row has been inserted, and no key is written back.
    #[tracing::instrument(
        level = "debug",
        skip(cx, executor, options, statement, entity),
        fields(table = statement.table(), keys = statement.keys.len())
    )]
    pub async fn insert<E, P>(
        self,
        cx: &Cx,
        executor: &E,
        options: &InsertOptions<'_, E::Transaction>,
        statement: &InsertStatement<'_>,
        entity: &mut P,
    ) -> Outcome<i64, Error>
    where
        E: Executor,
        P: PropertyAccess + ?Sized,
    {
        let sql = self.insert_sql(statement);
        let params = entity.parameters();
        let command = options.apply(Command::new(&sql).params(&params));
        tracing::debug!(sql = %sql, params = params.len(), "Executing insert");

        let rows = match self {
            Dialect::SqlServer | Dialect::Sqlite => {
                match executor.query_multiple(cx, &command).await {
                    // The identity SELECT is the last statement of the batch.
                    Outcome::Ok(mut sets) => sets.pop().unwrap_or_default(),
                    Outcome::Err(e) => return Outcome::Err(e),
                    Outcome::Cancelled(r) => return Outcome::Cancelled(r),
                    Outcome::Panicked(p) => return Outcome::Panicked(p),
                }
            }
            Dialect::Postgres => match executor.query(cx, &command).await {
                Outcome::Ok(rows) => rows,
                Outcome::Err(e) => return Outcome::Err(e),
                Outcome::Cancelled(r) => return Outcome::Cancelled(r),
                Outcome::Panicked(p) => return Outcome::Panicked(p),
            },
            Dialect::SqlServerCompact | Dialect::MySql | Dialect::Firebird => {
                match executor.execute(cx, &command).await {
                    Outcome::Ok(affected) => {
                        tracing::trace!(affected, "Insert executed");
                    }
                    Outcome::Err(e) => return Outcome::Err(e),
                    Outcome::Cancelled(r) => return Outcome::Cancelled(r),
                    Outcome::Panicked(p) => return Outcome::Panicked(p),
                }

                let Some(identity_sql) = self.identity_sql(statement) else {
                    tracing::debug!("No key columns, skipping identity lookup");
                    return Outcome::Ok(0);
                };
                if self == Dialect::Firebird {
                    tracing::debug!(
                        sql = %identity_sql,
                        "Firebird key lookup reads the newest row and is not atomic with the insert"
                    );
                } else {
                    tracing::debug!(sql = %identity_sql, "Reading generated key");
                }
                let lookup = options.apply(Command::new(&identity_sql));
                match executor.query(cx, &lookup).await {
                    Outcome::Ok(rows) => rows,
                    Outcome::Err(e) => return Outcome::Err(e),
                    Outcome::Cancelled(r) => return Outcome::Cancelled(r),
                    Outcome::Panicked(p) => return Outcome::Panicked(p),
                }
            }
        };

        let resolved = if self.supports_compound_keys() {
            write_back_returned_keys(statement, &rows, entity)
        } else {
            write_back_identity(self, statement, &rows, entity)
        };
        match resolved {
            Ok(id) => Outcome::Ok(id),
            Err(e) => Outcome::Err(e),
        }
    }
}

/// Single-identity dialects: the first row's `id` column goes to the first key.
#[allow(clippy::result_large_err)]
fn write_back_identity<P>(
    dialect: Dialect,
    statement: &InsertStatement<'_>,
    rows: &[Row],
    entity: &mut P,
) -> Result<i64>
where
    P: PropertyAccess + ?Sized,
{
    let Some(key) = statement.keys.first() else {
        return Ok(0);
    };
    if statement.keys.len() > 1 {
        tracing::warn!(
            %dialect,
            table = statement.table,
            keys = statement.keys.len(),
            key = key.property,
            "Dialect returns a single identity; only the first key is written back"
        );
    }

    let row = first_row(statement, rows)?;
    let value = row.get_ignore_case("id").ok_or_else(|| {
        KeyError::new(
            KeyErrorKind::MissingKeyColumn,
            statement.table,
            "identity result has no 'id' column",
        )
    })?;
    if value.is_null() {
        tracing::debug!(key = key.property, "Backend returned a NULL identity");
        return Ok(0);
    }

    let id = identity(value, key)?;
    entity.set_value(key.property, Value::BigInt(id))?;
    tracing::debug!(key = key.property, id, "Wrote generated key");
    Ok(id)
}

/// Postgres: every key is read from the `RETURNING` row; the first is reported.
#[allow(clippy::result_large_err)]
fn write_back_returned_keys<P>(
    statement: &InsertStatement<'_>,
    rows: &[Row],
    entity: &mut P,
) -> Result<i64>
where
    P: PropertyAccess + ?Sized,
{
    if statement.keys.is_empty() {
        return Ok(0);
    }

    let row = first_row(statement, rows)?;

    // Resolve every key before touching the entity; a failure part way leaves
    // it as it was.
    let mut returned = Vec::with_capacity(statement.keys.len());
    for key in &statement.keys {
        let value = row
            .get_ignore_case(&key.property.to_lowercase())
            .or_else(|| row.get_ignore_case(key.column))
            .ok_or_else(|| {
                KeyError::new(
                    KeyErrorKind::MissingKeyColumn,
                    statement.table,
                    format!("RETURNING row has no column for key '{}'", key.property),
                )
            })?;
        returned.push((key, value));
    }

    let id = match returned.first() {
        Some((key, value)) if !value.is_null() => identity(value, key)?,
        _ => 0,
    };

    let mut written: Vec<(&KeyColumn, Value)> = Vec::with_capacity(returned.len());
    for (key, value) in returned {
        if value.is_null() {
            tracing::debug!(key = key.property, "Backend returned a NULL key");
            continue;
        }
        let previous = entity.get_value(key.property)?;
        if let Err(e) = entity.set_value(key.property, value.clone()) {
            // Undo the keys written so far.
            for (key, previous) in written.into_iter().rev() {
                let _ = entity.set_value(key.property, previous);
            }
            return Err(e);
        }
        written.push((key, previous));
        tracing::debug!(key = key.property, "Wrote returned key");
    }
    Ok(id)
}

#[allow(clippy::result_large_err)]
fn first_row<'r>(statement: &InsertStatement<'_>, rows: &'r [Row]) -> Result<&'r Row> {
    rows.first().ok_or_else(|| {
        KeyError::new(
            KeyErrorKind::MissingIdentityRow,
            statement.table,
            "insert reported no row to read the generated key from",
        )
        .into()
    })
}

#[allow(clippy::result_large_err)]
fn identity(value: &Value, key: &KeyColumn) -> Result<i64> {
    value.as_identity().ok_or_else(|| {
        Error::Type(TypeError {
            expected: "integral identity",
            actual: value.type_name().to_string(),
            column: Some(key.column.to_string()),
            rust_type: Some("i64"),
        })
    })
}
