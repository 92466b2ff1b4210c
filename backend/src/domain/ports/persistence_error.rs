//! Error type shared by the domain-store repository ports.

/// Persistence errors raised by domain-store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    /// Store connection could not be established.
    #[error("domain store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("domain store query failed: {message}")]
    Query { message: String },
}

impl PersistenceError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn constructors_accept_str() {
        let err = PersistenceError::connection("refused");
        assert_eq!(err.to_string(), "domain store connection failed: refused");

        let err = PersistenceError::query("syntax");
        assert_eq!(err.to_string(), "domain store query failed: syntax");
    }
}
