//! The six supported SQL dialects and their identifier quoting.

use serde::{Deserialize, Serialize};
use sqlcontrib_core::{quote_ident, quote_ident_bracket, quote_ident_mysql};
use std::fmt;
use std::str::FromStr;

/// SQL dialect of the backend an insert runs against.
///
/// Stateless and `Copy`; every operation is a pure function of the variant
/// and its arguments, so one value can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    /// Microsoft SQL Server (`SCOPE_IDENTITY()` in the same batch)
    #[default]
    #[serde(rename = "sqlserver", alias = "mssql")]
    SqlServer,
    /// SQL Server Compact (`@@IDENTITY` in a second round trip)
    #[serde(rename = "sqlce", alias = "sqlservercompact")]
    SqlServerCompact,
    /// MySQL and MariaDB (`LAST_INSERT_ID()` in a second round trip)
    #[serde(rename = "mysql", alias = "mariadb")]
    MySql,
    /// PostgreSQL (`RETURNING` on the insert itself)
    #[serde(rename = "postgres", alias = "postgresql", alias = "pg")]
    Postgres,
    /// SQLite (`last_insert_rowid()` in the same batch)
    #[serde(rename = "sqlite")]
    Sqlite,
    /// Firebird (descending-order lookup of the newest key)
    #[serde(rename = "firebird", alias = "fb")]
    Firebird,
}

impl Dialect {
    /// All dialects, in declaration order.
    pub const ALL: [Dialect; 6] = [
        Dialect::SqlServer,
        Dialect::SqlServerCompact,
        Dialect::MySql,
        Dialect::Postgres,
        Dialect::Sqlite,
        Dialect::Firebird,
    ];

    /// Canonical lower-case name, as used by `Display` and serde.
    pub const fn name(self) -> &'static str {
        match self {
            Dialect::SqlServer => "sqlserver",
            Dialect::SqlServerCompact => "sqlce",
            Dialect::MySql => "mysql",
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite",
            Dialect::Firebird => "firebird",
        }
    }

    /// Pick a dialect from the type name of an ADO.NET-style connection
    /// (`SqlConnection`, `NpgsqlConnection`, ...).
    ///
    /// Matching ignores case. Unrecognized names fall back to
    /// [`Dialect::SqlServer`].
    pub fn from_connection_type_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "sqlconnection" => Dialect::SqlServer,
            "sqlceconnection" => Dialect::SqlServerCompact,
            "npgsqlconnection" => Dialect::Postgres,
            "sqliteconnection" => Dialect::Sqlite,
            "mysqlconnection" => Dialect::MySql,
            "fbconnection" => Dialect::Firebird,
            other => {
                tracing::debug!(
                    connection = other,
                    "Unknown connection type, using SQL Server dialect"
                );
                Dialect::SqlServer
            }
        }
    }

    /// Can this dialect write back more than one generated key per insert?
    pub const fn supports_compound_keys(self) -> bool {
        matches!(self, Dialect::Postgres)
    }

    /// Quote a column name for this dialect.
    ///
    /// Embedded closing delimiters are doubled. Firebird names are emitted
    /// as given.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlcontrib_adapter::Dialect;
    ///
    /// assert_eq!(Dialect::SqlServer.quote_column("Foo"), "[Foo]");
    /// assert_eq!(Dialect::MySql.quote_column("Foo"), "`Foo`");
    /// assert_eq!(Dialect::Postgres.quote_column("Foo"), "\"Foo\"");
    /// assert_eq!(Dialect::Firebird.quote_column("Foo"), "Foo");
    /// ```
    pub fn quote_column(self, name: &str) -> String {
        match self {
            Dialect::SqlServer | Dialect::SqlServerCompact => quote_ident_bracket(name),
            Dialect::MySql => quote_ident_mysql(name),
            Dialect::Postgres | Dialect::Sqlite => quote_ident(name),
            Dialect::Firebird => name.to_string(),
        }
    }

    /// `<quoted column> = @<name>`, the fragment used in SET and WHERE lists.
    pub fn quote_column_equals_parameter(self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() * 2 + 6);
        self.append_column_equals_parameter(&mut out, name);
        out
    }

    /// Append the quoted column name to `sql`.
    pub fn append_column(self, sql: &mut String, name: &str) {
        sql.push_str(&self.quote_column(name));
    }

    /// Append `<quoted column> = @<name>` to `sql`.
    pub fn append_column_equals_parameter(self, sql: &mut String, name: &str) {
        self.append_column(sql, name);
        sql.push_str(" = @");
        sql.push_str(name);
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no known dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDialectError {
    input: String,
}

impl ParseDialectError {
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParseDialectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown SQL dialect '{}'", self.input)
    }
}

impl std::error::Error for ParseDialectError {}

impl FromStr for Dialect {
    type Err = ParseDialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlserver" | "mssql" => Ok(Dialect::SqlServer),
            "sqlce" | "sqlservercompact" => Ok(Dialect::SqlServerCompact),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "sqlite" => Ok(Dialect::Sqlite),
            "firebird" | "fb" => Ok(Dialect::Firebird),
            _ => Err(ParseDialectError {
                input: s.to_string(),
            }),
        }
    }
}
