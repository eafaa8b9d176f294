//! Pivot error types.

use std::fmt;

use thiserror::Error;

use crate::sql::InvalidIdentifier;

/// Result type for pivot operations.
pub type PivotResult<T> = Result<T, PivotError>;

/// A request that cannot be turned into SQL. Raised before any database
/// round-trip.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Permanent target without a usable schema prefix.
    #[error("a non-empty schema prefix is required for a permanent pivot table")]
    MissingPrefix,

    /// No value columns were given.
    #[error("at least one value column is required")]
    EmptyValueNames,

    /// A caller-supplied name failed the identifier whitelist.
    #[error("invalid {role} identifier {value:?}")]
    InvalidIdentifier {
        /// Which input the name was given for (table, row key, ...).
        role: &'static str,
        value: String,
    },

    /// Aggregate function name is not a plain identifier.
    #[error("invalid aggregate function {0:?}")]
    InvalidAggregate(String),

    /// A configured category filter could not be built.
    #[error("invalid category filter: {0}")]
    InvalidFilter(String),
}

impl ConfigurationError {
    pub(crate) fn identifier(role: &'static str, err: InvalidIdentifier) -> Self {
        Self::InvalidIdentifier {
            role,
            value: err.0,
        }
    }
}

/// The database round-trip a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discover,
    Drop,
    Create,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Discover => "category discovery",
            Stage::Drop => "drop of previous pivot table",
            Stage::Create => "pivot table creation",
        })
    }
}

/// Errors that can occur while generating a pivot table.
#[derive(Error, Debug)]
pub enum PivotError {
    #[error(transparent)]
    Config(#[from] ConfigurationError),

    /// Two generated columns would get the same name.
    #[error("generated column {name} collides for categories {first:?} and {second:?}")]
    ColumnCollision {
        name: String,
        first: String,
        second: String,
    },

    /// The session rejected a statement. The driver error is kept unchanged.
    #[error("{stage} failed: {source}")]
    Database {
        stage: Stage,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl PivotError {
    pub(crate) fn database<E>(stage: Stage, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Database {
            stage,
            source: Box::new(err),
        }
    }

    /// Check if this error was raised before touching the database.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// The failing round-trip, for database errors.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Database { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
