//! # Allocation Solvers
//!
//! $$
//! \max_{\mathbf{w}}\frac{\mu_p-r_f}{\sigma_p},\qquad
//! \min_{\mathbf{w}}\sigma_p,\qquad
//! \min_{\mathbf{w}:\,\mu_p=r^\*}\sigma_p
//! $$
//!
//! The three named allocation solves, all delegating to the constrained
//! optimizer with a unit-sum equality constraint plus bounds and starting
//! from equal weighting.

use crate::error::PortfolioError;
use crate::evaluate::evaluate;
use crate::optimizer::minimize;
use crate::optimizer::ConstraintFn;
use crate::optimizer::OptimizationResult;
use crate::optimizer::OptimizerConfig;
use crate::stats::ReturnStatistics;

/// Bounds and rate configuration shared by the named solves.
#[derive(Clone, Copy, Debug)]
pub struct SolverConfig {
  /// Annualized risk-free rate used in Sharpe computations.
  pub risk_free_rate: f64,
  /// Lower bound on every weight component.
  pub lower_bound: f64,
  /// Upper bound on every weight component.
  pub upper_bound: f64,
  /// Stopping criteria and penalty schedule of the inner optimizer.
  pub optimizer: OptimizerConfig,
}

impl Default for SolverConfig {
  fn default() -> Self {
    Self {
      risk_free_rate: 0.02,
      lower_bound: 0.0,
      upper_bound: 1.0,
      optimizer: OptimizerConfig::default(),
    }
  }
}

pub(crate) fn validate(config: &SolverConfig, num_assets: usize) -> Result<(), PortfolioError> {
  if num_assets == 0 {
    return Err(PortfolioError::InvalidConfiguration(
      "no assets to allocate".to_string(),
    ));
  }
  if !(config.lower_bound <= config.upper_bound) {
    return Err(PortfolioError::InvalidConfiguration(format!(
      "lower bound {} exceeds upper bound {}",
      config.lower_bound, config.upper_bound
    )));
  }
  if config.risk_free_rate < 0.0 || !config.risk_free_rate.is_finite() {
    return Err(PortfolioError::InvalidConfiguration(format!(
      "risk-free rate {} must be finite and non-negative",
      config.risk_free_rate
    )));
  }

  // Bounds must admit a unit sum at all.
  let n = num_assets as f64;
  if n * config.upper_bound < 1.0 || n * config.lower_bound > 1.0 {
    return Err(PortfolioError::InvalidConfiguration(format!(
      "bounds [{}, {}] cannot sum to 1 across {} asset(s)",
      config.lower_bound, config.upper_bound, num_assets
    )));
  }

  Ok(())
}

fn equal_weights(n: usize) -> Vec<f64> {
  vec![1.0 / n as f64; n]
}

/// Maximize the Sharpe ratio by minimizing its negation.
///
/// Nonconvex in general; a single local solve from equal weighting is
/// accepted as the result, so global optimality is not guaranteed.
pub fn max_sharpe(
  stats: &ReturnStatistics,
  config: &SolverConfig,
) -> Result<OptimizationResult, PortfolioError> {
  validate(config, stats.num_assets())?;

  let risk_free = config.risk_free_rate;
  let objective = move |w: &[f64]| -evaluate(w, stats, risk_free).sharpe_ratio;
  let budget = |w: &[f64]| w.iter().sum::<f64>() - 1.0;
  let constraints: [ConstraintFn; 1] = [&budget];

  Ok(minimize(
    &objective,
    &constraints,
    &equal_weights(stats.num_assets()),
    config.lower_bound,
    config.upper_bound,
    &config.optimizer,
  ))
}

/// Minimize annualized volatility.
///
/// The quadratic form is convex for a PSD covariance, so the local solve
/// is globally optimal.
pub fn min_variance(
  stats: &ReturnStatistics,
  config: &SolverConfig,
) -> Result<OptimizationResult, PortfolioError> {
  validate(config, stats.num_assets())?;

  let objective = |w: &[f64]| evaluate(w, stats, 0.0).annualized_volatility;
  let budget = |w: &[f64]| w.iter().sum::<f64>() - 1.0;
  let constraints: [ConstraintFn; 1] = [&budget];

  Ok(minimize(
    &objective,
    &constraints,
    &equal_weights(stats.num_assets()),
    config.lower_bound,
    config.upper_bound,
    &config.optimizer,
  ))
}

/// Minimize annualized volatility subject to a fixed annualized return.
///
/// An unattainable target is reported as `converged = false` on the
/// result, never as an error.
pub fn target_return_min_variance(
  stats: &ReturnStatistics,
  config: &SolverConfig,
  target_return: f64,
) -> Result<OptimizationResult, PortfolioError> {
  validate(config, stats.num_assets())?;

  let objective = |w: &[f64]| evaluate(w, stats, 0.0).annualized_volatility;
  let budget = |w: &[f64]| w.iter().sum::<f64>() - 1.0;
  let pinned_return =
    move |w: &[f64]| evaluate(w, stats, 0.0).annualized_return - target_return;
  let constraints: [ConstraintFn; 2] = [&budget, &pinned_return];

  Ok(minimize(
    &objective,
    &constraints,
    &equal_weights(stats.num_assets()),
    config.lower_bound,
    config.upper_bound,
    &config.optimizer,
  ))
}
