//! Connector error types

/// Errors surfaced to the caller of the connector
#[derive(Debug)]
pub enum ConnectorError {
    /// A required connection parameter is empty
    MissingConfiguration { field: &'static str },
    /// A filter clause uses an operator the hub query language has no equivalent for
    UnsupportedFilterOperator { column: String, operator: String },
    /// A reserved date column was compared against something that is not a timestamp
    InvalidFilterValue { column: String, value: String },
    /// The requested CRUD verb is not available for the type
    UnsupportedOperation { type_name: String, operation: &'static str },
    /// A record in a batch carries no source id field at all
    MissingSourceId,
    /// The universe layout does not say which field identifies an entity
    MissingIdField { universe: String },
    /// The hub client failed
    Hub(anyhow::Error),
}

impl ConnectorError {
    /// HTTP-style status class for the error
    pub fn status_code(&self) -> u16 {
        match self {
            ConnectorError::Hub(_) => 500,
            _ => 400,
        }
    }

    pub fn unsupported(type_name: impl Into<String>, operation: &'static str) -> Self {
        ConnectorError::UnsupportedOperation {
            type_name: type_name.into(),
            operation,
        }
    }
}

impl std::fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectorError::MissingConfiguration { field } => {
                write!(f, "{} can not be empty", field)
            }
            ConnectorError::UnsupportedFilterOperator { column, operator } => {
                write!(
                    f,
                    "An unsupported criteria type of {} was given for the column {}",
                    operator, column
                )
            }
            ConnectorError::InvalidFilterValue { column, value } => {
                write!(
                    f,
                    "The value '{}' given for the column {} is not a valid date",
                    value, column
                )
            }
            ConnectorError::UnsupportedOperation {
                type_name,
                operation,
            } => {
                write!(f, "The type {} does not support {}", type_name, operation)
            }
            ConnectorError::MissingSourceId => {
                write!(f, "No Source ID was given for the record to update")
            }
            ConnectorError::MissingIdField { universe } => {
                write!(f, "The universe {} does not declare an ID field", universe)
            }
            ConnectorError::Hub(err) => write!(f, "Hub request failed: {:#}", err),
        }
    }
}

impl std::error::Error for ConnectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConnectorError::Hub(err) => Some(&**err),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for ConnectorError {
    fn from(err: anyhow::Error) -> Self {
        ConnectorError::Hub(err)
    }
}

pub type Result<T> = std::result::Result<T, ConnectorError>;
