//! Energy calculation errors

use thiserror::Error;

/// Precondition violations for the energy calculations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnergyError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EnergyError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        EnergyError::InvalidInput(message.into())
    }
}

/// Result type for energy calculations
pub type EnergyResult<T> = Result<T, EnergyError>;

/// Reject non-positive or non-finite weights
pub(crate) fn ensure_positive_weight(weight_kg: f64) -> EnergyResult<()> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(EnergyError::invalid_input(format!(
            "weight must be positive, got {} kg",
            weight_kg
        )));
    }
    Ok(())
}
