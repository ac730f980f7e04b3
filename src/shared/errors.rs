use thiserror::Error;

/// Coarse error classification used by the HTTP layer to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Infrastructure,
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("No parking slot available for a new hold payment (available={available}, pending={pending})")]
    AdmissionDenied { available: u64, pending: u64 },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Store call timed out: {0}")]
    Timeout(&'static str),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict(_) | Self::AdmissionDenied { .. } => ErrorKind::Conflict,
            Self::Storage(_) | Self::Timeout(_) => ErrorKind::Infrastructure,
        }
    }

    /// Whether the operation may succeed if retried unchanged.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Timeout(_))
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admission_denied_is_a_conflict() {
        let err = DomainError::AdmissionDenied {
            available: 5,
            pending: 5,
        };
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(!err.is_transient());
    }

    #[test]
    fn timeout_is_transient_infrastructure() {
        let err = DomainError::Timeout("parking_slots.find_by_id");
        assert_eq!(err.kind(), ErrorKind::Infrastructure);
        assert!(err.is_transient());
    }

    #[test]
    fn not_found_message_names_entity() {
        let err = DomainError::not_found("Sensor", 42);
        assert_eq!(err.to_string(), "Not found: Sensor with id=42");
    }
}
