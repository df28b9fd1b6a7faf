//! Error types for sqlcontrib operations.

use std::fmt;

/// The primary error type for all sqlcontrib operations.
///
/// Executors report backend failures through the `Connection`, `Query`,
/// `Io` and `Timeout` variants. The proxy and insert layers never rewrap
/// those; they only originate `Shape`, `Key` and `Type` errors themselves.
#[derive(Debug)]
pub enum Error {
    /// Connection-related errors (connect, disconnect, timeout)
    Connection(ConnectionError),
    /// Query execution errors
    Query(QueryError),
    /// Type conversion errors
    Type(TypeError),
    /// The entity is not a valid data shape, or a property lookup failed
    Shape(ShapeError),
    /// A generated key could not be resolved after an insert
    Key(KeyError),
    /// I/O errors
    Io(std::io::Error),
    /// Operation timed out
    Timeout,
    /// Custom error with message
    Custom(String),
}

#[derive(Debug)]
pub struct ConnectionError {
    pub kind: ConnectionErrorKind,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionErrorKind {
    /// Failed to establish connection
    Connect,
    /// Authentication failed
    Authentication,
    /// Connection lost during operation
    Disconnected,
    /// Connection refused
    Refused,
}

#[derive(Debug)]
pub struct QueryError {
    pub kind: QueryErrorKind,
    pub sql: Option<String>,
    pub sqlstate: Option<String>,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Syntax error in SQL
    Syntax,
    /// Constraint violation (unique, foreign key, etc.)
    Constraint,
    /// Table or column not found
    NotFound,
    /// Permission denied
    Permission,
    /// Deadlock detected
    Deadlock,
    /// Statement timeout
    Timeout,
    /// Other database error
    Database,
}

#[derive(Debug)]
pub struct TypeError {
    pub expected: &'static str,
    pub actual: String,
    pub column: Option<String>,
    pub rust_type: Option<&'static str>,
}

/// Raised when an entity cannot be turned into a tracked proxy shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeError {
    pub kind: ShapeErrorKind,
    /// Rust type name of the entity
    pub entity: &'static str,
    /// The offending property, when the problem is property-specific
    pub property: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeErrorKind {
    /// The entity declares no properties at all
    Empty,
    /// A property has an empty name
    UnnamedProperty,
    /// Two properties share a name
    DuplicateProperty,
    /// Two properties map to the same column
    DuplicateColumn,
    /// A property has a getter but no setter
    MissingSetter,
    /// A property is flagged both computed and key
    ComputedKey,
    /// A property name was looked up that the shape does not declare
    UnknownProperty,
}

/// Raised when a backend did not hand back the identity row an insert needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyError {
    pub kind: KeyErrorKind,
    pub table: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyErrorKind {
    /// The identity lookup (or RETURNING clause) produced no rows
    MissingIdentityRow,
    /// A returned row lacks the column a key property maps to
    MissingKeyColumn,
}

impl ShapeError {
    pub fn new(
        kind: ShapeErrorKind,
        entity: &'static str,
        property: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            entity,
            property: property.map(str::to_string),
            message: message.into(),
        }
    }

    /// Shorthand for a lookup of a property the entity does not declare.
    pub fn unknown_property(entity: &'static str, property: &str) -> Self {
        Self::new(
            ShapeErrorKind::UnknownProperty,
            entity,
            Some(property),
            format!("entity `{entity}` has no property `{property}`"),
        )
    }
}

impl KeyError {
    pub fn new(kind: KeyErrorKind, table: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            table: table.into(),
            message: message.into(),
        }
    }
}

impl Error {
    /// Did this error originate in the backend rather than in sqlcontrib?
    pub fn is_execution_failure(&self) -> bool {
        matches!(
            self,
            Error::Connection(_) | Error::Query(_) | Error::Io(_) | Error::Timeout
        )
    }

    /// Get SQLSTATE if available (e.g., "23505" for unique violation)
    pub fn sqlstate(&self) -> Option<&str> {
        match self {
            Error::Query(q) => q.sqlstate.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connection(e) => write!(f, "Connection error: {}", e.message),
            Error::Query(e) => {
                if let Some(sqlstate) = &e.sqlstate {
                    write!(f, "Query error (SQLSTATE {}): {}", sqlstate, e.message)
                } else {
                    write!(f, "Query error: {}", e.message)
                }
            }
            Error::Type(e) => {
                if let Some(col) = &e.column {
                    write!(
                        f,
                        "Type error in column '{}': expected {}, found {}",
                        col, e.expected, e.actual
                    )
                } else {
                    write!(f, "Type error: expected {}, found {}", e.expected, e.actual)
                }
            }
            Error::Shape(e) => write!(f, "Shape error: {}", e.message),
            Error::Key(e) => write!(f, "Key error on table '{}': {}", e.table, e.message),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Timeout => write!(f, "Operation timed out"),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Connection(e) => e
                .source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn std::error::Error + 'static)),
            Error::Query(e) => e
                .source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn std::error::Error + 'static)),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<ShapeError> for Error {
    fn from(err: ShapeError) -> Self {
        Error::Shape(err)
    }
}

impl From<KeyError> for Error {
    fn from(err: KeyError) -> Self {
        Error::Key(err)
    }
}

/// Result type alias for sqlcontrib operations.
pub type Result<T> = std::result::Result<T, Error>;
