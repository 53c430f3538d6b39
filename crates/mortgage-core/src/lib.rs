//! Mortgage affordability, payment schedule and land transfer tax engine.
//!
//! Every calculator is a pure function over an immutable input record. The
//! only shared state is the stress-test configuration, which callers load once
//! and pass down by reference.

pub mod config;
pub mod error;
pub mod rates;
pub mod time_value;
pub mod types;

#[cfg(feature = "payment")]
pub mod payment;

#[cfg(feature = "affordability")]
pub mod affordability;

#[cfg(feature = "land_transfer")]
pub mod land_transfer;

#[cfg(feature = "monthly_cost")]
pub mod monthly_cost;

pub use config::EngineConfig;
pub use error::MortgageError;
pub use stress_test::StressTestPolicy;
pub use types::*;

/// Standard result type for all mortgage-core operations
pub type MortgageResult<T> = Result<T, MortgageError>;
