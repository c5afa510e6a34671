use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UnderwriteError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero or negative denominator in {context}")]
    DivisionByZero { context: String },

    #[error("Valuation impossibility: {0}")]
    ImpossibleValuation(String),

    #[error("Convergence failure: {function} found no root after {iterations} iterations (last NPV: {last_npv})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_npv: Decimal,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for UnderwriteError {
    fn from(e: serde_json::Error) -> Self {
        UnderwriteError::SerializationError(e.to_string())
    }
}
