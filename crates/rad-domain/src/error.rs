// error.rs
use thiserror::Error;

/// Error del dominio para el catálogo de imágenes.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Error de validación: {0}")]
    ValidationError(String),

    #[error("Error de serialización: {0}")]
    SerializationError(String),
}

// Conversión desde serde_json::Error a DomainError
impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::SerializationError(e.to_string())
    }
}
