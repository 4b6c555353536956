use crate::types::{ArgType, ArgValue, ScalarType};

/// One positional argument together with the type hints the ORM supplied for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    pub value: ArgValue,
    pub arg_type: ArgType,
}

impl Arg {
    #[must_use]
    pub fn new(value: impl Into<ArgValue>, arg_type: ArgType) -> Self {
        Self {
            value: value.into(),
            arg_type,
        }
    }

    /// Argument without type hints; encoding passes it through untouched unless it
    /// is a date/time or a byte view.
    #[must_use]
    pub fn untyped(value: impl Into<ArgValue>) -> Self {
        Self::new(value, ArgType::default())
    }

    #[must_use]
    pub fn typed(value: impl Into<ArgValue>, scalar_type: ScalarType) -> Self {
        Self::new(value, ArgType::new(scalar_type))
    }
}

/// A SQL string and its positional arguments bundled together.
///
/// ```rust
/// use tidbcloud_driver_adapter::prelude::*;
///
/// let query = Query::new(
///     "INSERT INTO users (email, name) VALUES (?, ?)",
///     vec![Arg::untyped("a@example.com"), Arg::untyped("alice")],
/// );
/// # let _ = query;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// The SQL query string
    pub sql: String,
    /// Arguments in placeholder order
    pub args: Vec<Arg>,
}

impl Query {
    /// Create a new `Query` with the given SQL and arguments
    pub fn new(sql: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }

    /// Create a new `Query` with no arguments
    pub fn new_without_args(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument, keeping placeholder order.
    #[must_use]
    pub fn arg(mut self, arg: Arg) -> Self {
        self.args.push(arg);
        self
    }
}
