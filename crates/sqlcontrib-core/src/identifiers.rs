//! SQL identifier quoting.
//!
//! Each function wraps a bare identifier in one backend family's quoting
//! syntax and doubles any embedded closing delimiter, so the result is
//! always a single identifier token.

/// Quote a SQL identifier using ANSI double-quoting (Postgres, SQLite).
///
/// # Examples
///
/// ```
/// use sqlcontrib_core::quote_ident;
///
/// assert_eq!(quote_ident("users"), "\"users\"");
/// assert_eq!(quote_ident("user\"name"), "\"user\"\"name\"");
/// ```
#[inline]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a SQL identifier using MySQL backtick quoting.
///
/// # Examples
///
/// ```
/// use sqlcontrib_core::quote_ident_mysql;
///
/// assert_eq!(quote_ident_mysql("users"), "`users`");
/// assert_eq!(quote_ident_mysql("user`name"), "`user``name`");
/// ```
#[inline]
pub fn quote_ident_mysql(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Quote a SQL identifier using SQL Server bracket quoting.
///
/// Only the closing bracket needs escaping; `[` is literal inside brackets.
///
/// # Examples
///
/// ```
/// use sqlcontrib_core::quote_ident_bracket;
///
/// assert_eq!(quote_ident_bracket("users"), "[users]");
/// assert_eq!(quote_ident_bracket("a]b"), "[a]]b]");
/// ```
#[inline]
pub fn quote_ident_bracket(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident_simple() {
        assert_eq!(quote_ident("Foo"), "\"Foo\"");
    }

    #[test]
    fn test_quote_ident_empty() {
        assert_eq!(quote_ident(""), "\"\"");
    }

    #[test]
    fn test_quote_ident_sql_injection_attempt() {
        let quoted = quote_ident("users\"; DROP TABLE secrets; --");
        assert_eq!(quoted, "\"users\"\"; DROP TABLE secrets; --\"");
    }

    #[test]
    fn test_quote_ident_mysql_multiple_backticks() {
        assert_eq!(quote_ident_mysql("a`b`c"), "`a``b``c`");
    }

    #[test]
    fn test_quote_ident_bracket_simple() {
        assert_eq!(quote_ident_bracket("Foo"), "[Foo]");
    }

    #[test]
    fn test_quote_ident_bracket_open_bracket_is_literal() {
        assert_eq!(quote_ident_bracket("a[b"), "[a[b]");
    }

    #[test]
    fn test_quote_ident_bracket_injection_attempt() {
        assert_eq!(
            quote_ident_bracket("x]; DROP TABLE t; --"),
            "[x]]; DROP TABLE t; --]"
        );
    }
}
