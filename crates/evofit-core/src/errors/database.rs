// ABOUTME: Database error types with structured context for persistence failures
// ABOUTME: Converts sqlx errors into domain errors without leaking driver details

use std::fmt::Display;

#[cfg(feature = "database-errors")]
use sqlx::Error as SqlxError;

/// Errors raised by the persistence layer
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Could not open or reach the database
    #[error("Database connection failed: {context}")]
    ConnectionFailed {
        /// What was being attempted
        context: String,
    },

    /// Query execution or row decoding failed
    #[error("Database query failed: {context}")]
    QueryError {
        /// Query description and driver message
        context: String,
    },

    /// A lookup by primary key returned nothing
    #[error("{entity_type} with ID '{entity_id}' not found")]
    NotFound {
        /// Kind of entity
        entity_type: &'static str,
        /// Identifier that was requested
        entity_id: String,
    },

    /// Schema creation failed
    #[error("Database migration failed for {table}: {reason}")]
    MigrationFailed {
        /// Table being migrated
        table: &'static str,
        /// Driver message
        reason: String,
    },

    /// Stored value could not be parsed back into a domain type
    #[error("Invalid stored value for {field}: {value}")]
    InvalidData {
        /// Column name
        field: &'static str,
        /// Offending raw value
        value: String,
    },
}

impl DatabaseError {
    /// Wrap a driver error with a short description of the failing operation
    pub fn query(operation: &str, error: impl Display) -> Self {
        Self::QueryError {
            context: format!("{operation}: {error}"),
        }
    }
}

#[cfg(feature = "database-errors")]
impl From<SqlxError> for DatabaseError {
    fn from(error: SqlxError) -> Self {
        match error {
            SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Io(_) => {
                Self::ConnectionFailed {
                    context: error.to_string(),
                }
            }
            other => Self::QueryError {
                context: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_helper_formats_operation() {
        let error = DatabaseError::query("Failed to get goal", "no such table: goals");
        assert_eq!(
            error.to_string(),
            "Database query failed: Failed to get goal: no such table: goals"
        );
    }

    #[test]
    fn test_invalid_data_display() {
        let error = DatabaseError::InvalidData {
            field: "measurement_date",
            value: "2024-13-45".to_owned(),
        };
        assert!(error.to_string().contains("measurement_date"));
    }
}
