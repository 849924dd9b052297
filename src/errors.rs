use thiserror::Error;

/// Errors raised by the persona catalogue and selection pipeline.
#[derive(Error, Debug)]
pub enum PersonaError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Persona not found: {0}")]
    NotFound(String),

    #[error("Persona already exists: {0}")]
    DuplicateId(String),

    #[error("Context manager unavailable: {0}")]
    ContextUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<std::io::Error> for PersonaError {
    fn from(err: std::io::Error) -> Self {
        PersonaError::Storage(err.to_string())
    }
}

pub type PersonaResult<T> = Result<T, PersonaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_become_storage_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PersonaError = io.into();
        assert!(matches!(err, PersonaError::Storage(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn serde_errors_are_wrapped() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: PersonaError = parse.into();
        assert!(matches!(err, PersonaError::Serialization(_)));
    }
}
