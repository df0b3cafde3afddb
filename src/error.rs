use thiserror::Error;

/// An error from unsuccessful database operations
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum DbErr {
    /// There was a problem with the database connection
    #[error("Connection Error: {0}")]
    Conn(String),
    /// An operation did not execute successfully
    #[error("Execution Error: {0}")]
    Exec(String),
    /// An error occurred while performing a query
    #[error("Query Error: {0}")]
    Query(String),
    /// The record was not found in the database
    #[error("RecordNotFound Error: {0}")]
    RecordNotFound(String),
    /// A custom error
    #[error("Custom Error: {0}")]
    Custom(String),
    /// Error occurred while parsing value as target type
    #[error("Type Error: {0}")]
    Type(String),
    /// A storage value could not be interpreted as a nullable timestamp
    #[error("Scan Error: {0}")]
    Scan(String),
    /// A text payload was neither `null` nor a valid timestamp
    #[error("Parse Error: {0}")]
    Parse(String),
}
