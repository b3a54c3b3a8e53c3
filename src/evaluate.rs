//! # Portfolio Evaluation
//!
//! $$
//! \mu_p = k\,\mathbf{w}^\top\mu,\qquad
//! \sigma_p = \sqrt{k}\,\sqrt{\mathbf{w}^\top\Sigma\,\mathbf{w}}
//! $$
//!
//! Pure mapping from a weight vector and return statistics to annualized
//! performance. Annualization scales variance linearly with the period
//! count under an i.i.d. assumption, so volatility scales by the square
//! root of the period count; this is a documented approximation, not true
//! compounding.

use ndarray::ArrayView1;

use crate::stats::ReturnStatistics;

/// Annualized performance of one weight vector.
#[derive(Clone, Copy, Debug)]
pub struct PortfolioPerformance {
  /// `(w . mu) * periods_per_year`.
  pub annualized_return: f64,
  /// `sqrt(w' Sigma w) * sqrt(periods_per_year)`; never negative.
  pub annualized_volatility: f64,
  /// Excess return per unit volatility; `NaN` for a zero-volatility
  /// portfolio (degenerate under the model, must not fault).
  pub sharpe_ratio: f64,
}

/// Evaluate a weight vector against per-period return statistics.
///
/// Deterministic and side-effect free; inputs are never mutated.
///
/// # Panics
///
/// Panics when `weights` length differs from the number of assets covered
/// by `stats`. The solvers always supply aligned vectors; direct callers
/// own this contract.
pub fn evaluate(
  weights: &[f64],
  stats: &ReturnStatistics,
  risk_free_rate: f64,
) -> PortfolioPerformance {
  assert_eq!(
    weights.len(),
    stats.num_assets(),
    "weight count must match asset count"
  );

  let w = ArrayView1::from(weights);
  let k = stats.periods_per_year as f64;

  let annualized_return = w.dot(&stats.mean) * k;

  // Round-off can push the quadratic form a hair below zero.
  let variance = w.dot(&stats.covariance.dot(&w)).max(0.0);
  let annualized_volatility = variance.sqrt() * k.sqrt();

  let sharpe_ratio = if annualized_volatility == 0.0 {
    f64::NAN
  } else {
    (annualized_return - risk_free_rate) / annualized_volatility
  };

  PortfolioPerformance {
    annualized_return,
    annualized_volatility,
    sharpe_ratio,
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use ndarray::array;

  use super::*;

  fn stats() -> ReturnStatistics {
    ReturnStatistics::new(
      array![0.01, 0.02],
      array![[0.0004, 0.0], [0.0, 0.0009]],
      12,
    )
    .unwrap()
  }

  #[test]
  fn evaluates_known_portfolio() {
    let perf = evaluate(&[0.5, 0.5], &stats(), 0.02);

    // 0.5 * 0.01 + 0.5 * 0.02 = 0.015, annualized 0.18
    assert_abs_diff_eq!(perf.annualized_return, 0.18, epsilon = 1e-12);
    // var = 0.25 * 0.0004 + 0.25 * 0.0009 = 3.25e-4
    let expected_vol = (3.25e-4_f64).sqrt() * 12.0_f64.sqrt();
    assert_abs_diff_eq!(perf.annualized_volatility, expected_vol, epsilon = 1e-12);
    assert_abs_diff_eq!(
      perf.sharpe_ratio,
      (0.18 - 0.02) / expected_vol,
      epsilon = 1e-12
    );
  }

  #[test]
  fn zero_volatility_reports_nan_sharpe() {
    let riskless = ReturnStatistics::new(
      array![0.01, 0.02],
      array![[0.0, 0.0], [0.0, 0.0]],
      12,
    )
    .unwrap();

    let perf = evaluate(&[0.5, 0.5], &riskless, 0.0);
    assert_eq!(perf.annualized_volatility, 0.0);
    assert!(perf.sharpe_ratio.is_nan());
  }

  #[test]
  fn volatility_is_never_negative() {
    let perf = evaluate(&[1.0, 0.0], &stats(), 0.0);
    assert!(perf.annualized_volatility >= 0.0);
  }

  #[test]
  #[should_panic(expected = "weight count must match asset count")]
  fn mismatched_weight_count_panics() {
    evaluate(&[1.0], &stats(), 0.0);
  }
}
