//! Deterministic multifamily underwriting engine.
//!
//! Turns a normalized rent roll plus an assumption set into point-in-time
//! metrics, a hold-period cash-flow projection, an exit valuation, and an
//! IRR solve, repeated under bull/base/bear scenario overrides. Pure
//! computation: same inputs always produce the same outputs, no hidden
//! state across calls.

pub mod assumptions;
pub mod error;
pub mod metrics;
pub mod projection;
pub mod rent_roll;
pub mod scenario;
pub mod time_value;
pub mod types;
pub mod underwrite;

pub use error::UnderwriteError;
pub use types::*;

/// Standard result type for all underwriting operations
pub type UnderwriteResult<T> = Result<T, UnderwriteError>;
