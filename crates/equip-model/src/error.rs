use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("equipment name must not be empty")]
    EmptyEquipmentName,
    #[error("equipment type must not be empty")]
    EmptyEquipmentType,
    #[error("{field} must be a finite number, got {value}")]
    NonFiniteValue { field: &'static str, value: String },
    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),
    #[error("invalid dataset id: {0:?}")]
    InvalidDatasetId(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
