//! # Errors
//!
//! Input-shape and configuration errors rejected before any numerical work.
//!
//! Numerical non-convergence is deliberately *not* part of this taxonomy: a
//! solve that fails to satisfy its constraints is reported as data on the
//! [`OptimizationResult`](crate::optimizer::OptimizationResult) so that one
//! bad frontier point never aborts a multi-point sweep.

use thiserror::Error;

/// Fatal errors surfaced at the engine boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortfolioError {
  /// Fewer than two return periods; the sample covariance is undefined.
  #[error("insufficient data: {periods} return period(s), need at least 2")]
  InsufficientData { periods: usize },

  /// Configuration rejected before numerical work begins.
  #[error("invalid configuration: {0}")]
  InvalidConfiguration(String),

  /// Vector/matrix shapes disagree.
  #[error("dimension mismatch: {0}")]
  DimensionMismatch(String),
}
