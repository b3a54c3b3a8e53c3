//! # Efficient Frontier
//!
//! $$
//! \sigma^\*(r) = \min_{\mathbf{w}:\,\mu_p = r} \sigma_p
//! $$
//!
//! Discretized frontier: a sweep of target returns from the
//! minimum-variance return up to 1.2x the maximum-Sharpe return, each
//! solved independently. Targets are independent of one another, so the
//! sweep runs in parallel and is collected back in target order.

use rayon::iter::IntoParallelIterator;
use rayon::iter::ParallelIterator;
use tracing::debug;
use tracing::trace;

use crate::error::PortfolioError;
use crate::evaluate::evaluate;
use crate::optimizer::SolveFailure;
use crate::solvers::max_sharpe;
use crate::solvers::min_variance;
use crate::solvers::target_return_min_variance;
use crate::solvers::SolverConfig;
use crate::stats::ReturnStatistics;

/// Margin applied to the maximum-Sharpe return to fix the top of the
/// target sweep.
pub(crate) const SWEEP_MARGIN: f64 = 1.2;

/// One point of the discretized frontier.
///
/// `volatility` is absent for an infeasible or non-converged target; the
/// sweep keeps such points so the contract stays explicit, and callers
/// filter before plotting.
#[derive(Clone, Copy, Debug)]
pub struct FrontierPoint {
  /// Annualized target return of this solve.
  pub target_return: f64,
  /// Minimum annualized volatility achieving the target, if any.
  pub volatility: Option<f64>,
  /// Why the point is absent, when it is.
  pub failure: Option<SolveFailure>,
}

/// Sweep `num_points` evenly spaced targets over `[low, high]`, both ends
/// inclusive.
///
/// One failed target never stops the remaining sweep.
pub fn sweep(
  stats: &ReturnStatistics,
  config: &SolverConfig,
  num_points: usize,
  low: f64,
  high: f64,
) -> Result<Vec<FrontierPoint>, PortfolioError> {
  if num_points < 2 {
    return Err(PortfolioError::InvalidConfiguration(format!(
      "frontier needs at least 2 points, got {num_points}"
    )));
  }

  debug!(num_points, low, high, "sweeping efficient frontier");

  let step = (high - low) / (num_points - 1) as f64;

  (0..num_points)
    .into_par_iter()
    .map(|i| -> Result<FrontierPoint, PortfolioError> {
      let target_return = low + step * i as f64;
      let result = target_return_min_variance(stats, config, target_return)?;

      if result.converged {
        Ok(FrontierPoint {
          target_return,
          volatility: Some(result.objective),
          failure: None,
        })
      } else {
        trace!(target_return, failure = ?result.failure, "frontier point not attainable");
        Ok(FrontierPoint {
          target_return,
          volatility: None,
          failure: result.failure,
        })
      }
    })
    .collect()
}

/// Generate the frontier for the reference sweep range.
///
/// The endpoints come from the minimum-variance and maximum-Sharpe
/// achieved returns; those solves are used as range anchors even when they
/// report non-convergence, matching the heuristic nature of the range.
pub fn generate(
  stats: &ReturnStatistics,
  config: &SolverConfig,
  num_points: usize,
) -> Result<Vec<FrontierPoint>, PortfolioError> {
  let floor = min_variance(stats, config)?;
  let tangency = max_sharpe(stats, config)?;

  let low = evaluate(&floor.weights, stats, config.risk_free_rate).annualized_return;
  let high =
    evaluate(&tangency.weights, stats, config.risk_free_rate).annualized_return * SWEEP_MARGIN;

  sweep(stats, config, num_points, low, high)
}

#[cfg(test)]
mod tests {
  use ndarray::array;

  use super::*;

  fn three_asset_stats() -> ReturnStatistics {
    ReturnStatistics::new(
      array![0.01, 0.015, 0.02],
      array![
        [0.0004, 0.0001, 0.0],
        [0.0001, 0.0006, 0.0001],
        [0.0, 0.0001, 0.0009]
      ],
      12,
    )
    .unwrap()
  }

  fn zero_rate() -> SolverConfig {
    SolverConfig {
      risk_free_rate: 0.0,
      ..SolverConfig::default()
    }
  }

  #[test]
  fn frontier_targets_ascend_and_volatility_is_monotone() {
    let stats = three_asset_stats();
    let points = generate(&stats, &zero_rate(), 21).unwrap();

    assert_eq!(points.len(), 21);

    for pair in points.windows(2) {
      assert!(pair[1].target_return > pair[0].target_return);
    }

    let present: Vec<f64> = points.iter().filter_map(|p| p.volatility).collect();
    assert!(present.len() >= 2);
    for pair in present.windows(2) {
      assert!(pair[1] >= pair[0] - 1e-4);
    }
  }

  #[test]
  fn infeasible_tail_does_not_stop_the_sweep() {
    // The tangency portfolio concentrates in the second asset, so 1.2x its
    // return exceeds anything the bounds admit and the top targets fail.
    let stats = ReturnStatistics::new(
      array![0.001, 0.02],
      array![[0.0004, 0.0], [0.0, 0.0004]],
      12,
    )
    .unwrap();

    let points = generate(&stats, &zero_rate(), 15).unwrap();

    assert_eq!(points.len(), 15);
    let last = points.last().unwrap();
    assert!(last.volatility.is_none());
    assert_eq!(last.failure, Some(SolveFailure::Infeasible));
    assert!(points.iter().any(|p| p.volatility.is_some()));
  }

  #[test]
  fn sweep_covers_both_endpoints() {
    let stats = three_asset_stats();
    let points = sweep(&stats, &zero_rate(), 5, 0.15, 0.21).unwrap();

    assert_eq!(points.len(), 5);
    assert!((points[0].target_return - 0.15).abs() < 1e-12);
    assert!((points[4].target_return - 0.21).abs() < 1e-12);
  }

  #[test]
  fn rejects_degenerate_point_count() {
    let err = generate(&three_asset_stats(), &zero_rate(), 1).unwrap_err();
    assert!(matches!(err, PortfolioError::InvalidConfiguration(_)));
  }
}
