//! # Portfolio Engine
//!
//! $$
//! \mathbf{w}^\* = \operatorname{Optimize}(\mu, \Sigma, r_f)
//! $$
//!
//! High-level orchestration: validates configuration once, derives
//! statistics from a return table and produces the maximum-Sharpe,
//! minimum-variance and equal-weight allocations plus the efficient
//! frontier in a single report. Thin callers (static rendering, an
//! interactive page) supply only data and configuration.

use tracing::debug;

use crate::error::PortfolioError;
use crate::evaluate::evaluate;
use crate::evaluate::PortfolioPerformance;
use crate::frontier;
use crate::frontier::FrontierPoint;
use crate::optimizer::OptimizerConfig;
use crate::solvers::max_sharpe;
use crate::solvers::min_variance;
use crate::solvers::SolverConfig;
use crate::stats::ReturnStatistics;
use crate::stats::ReturnTable;

/// Runtime configuration for [`PortfolioEngine`].
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
  /// Annualized risk-free rate; must be finite and non-negative.
  pub risk_free_rate: f64,
  /// Return periods per year used for annualization.
  pub periods_per_year: u32,
  /// Lower bound on every weight component.
  pub weight_lower_bound: f64,
  /// Upper bound on every weight component.
  pub weight_upper_bound: f64,
  /// Number of frontier points, both sweep ends inclusive.
  pub frontier_points: usize,
  /// Stopping criteria and penalty schedule of the inner optimizer.
  pub optimizer: OptimizerConfig,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      risk_free_rate: 0.02,
      periods_per_year: 12,
      weight_lower_bound: 0.0,
      weight_upper_bound: 1.0,
      frontier_points: 50,
      optimizer: OptimizerConfig::default(),
    }
  }
}

/// A solved allocation with its evaluated performance.
#[derive(Clone, Debug)]
pub struct Allocation {
  /// Portfolio weights, aligned with the input asset order.
  pub weights: Vec<f64>,
  /// Annualized performance of `weights`.
  pub performance: PortfolioPerformance,
  /// Whether the producing solve converged; always true for the
  /// equal-weight benchmark.
  pub converged: bool,
}

/// Full output of one engine run, passed to the rendering layer by value.
#[derive(Clone, Debug)]
pub struct AllocationReport {
  /// Maximum-Sharpe (tangency) allocation.
  pub max_sharpe: Allocation,
  /// Minimum-variance allocation.
  pub min_variance: Allocation,
  /// Equal-weight benchmark allocation.
  pub equal_weight: Allocation,
  /// Discretized efficient frontier, ascending in target return, absent
  /// points included.
  pub frontier: Vec<FrontierPoint>,
}

/// Single entry point for allocation and frontier workflows.
#[derive(Clone, Debug)]
pub struct PortfolioEngine {
  config: EngineConfig,
}

impl PortfolioEngine {
  /// Construct an engine, rejecting invalid configuration eagerly.
  pub fn new(config: EngineConfig) -> Result<Self, PortfolioError> {
    if !(config.weight_lower_bound <= config.weight_upper_bound) {
      return Err(PortfolioError::InvalidConfiguration(format!(
        "lower bound {} exceeds upper bound {}",
        config.weight_lower_bound, config.weight_upper_bound
      )));
    }
    if config.risk_free_rate < 0.0 || !config.risk_free_rate.is_finite() {
      return Err(PortfolioError::InvalidConfiguration(format!(
        "risk-free rate {} must be finite and non-negative",
        config.risk_free_rate
      )));
    }
    if config.periods_per_year == 0 {
      return Err(PortfolioError::InvalidConfiguration(
        "periods_per_year must be positive".to_string(),
      ));
    }
    if config.frontier_points < 2 {
      return Err(PortfolioError::InvalidConfiguration(format!(
        "frontier needs at least 2 points, got {}",
        config.frontier_points
      )));
    }

    Ok(Self { config })
  }

  /// Borrow engine configuration.
  pub fn config(&self) -> &EngineConfig {
    &self.config
  }

  fn solver_config(&self) -> SolverConfig {
    SolverConfig {
      risk_free_rate: self.config.risk_free_rate,
      lower_bound: self.config.weight_lower_bound,
      upper_bound: self.config.weight_upper_bound,
      optimizer: self.config.optimizer,
    }
  }

  /// Derive statistics from a return table and run the full analysis.
  pub fn analyze(&self, table: &ReturnTable) -> Result<AllocationReport, PortfolioError> {
    let stats = ReturnStatistics::from_table(table, self.config.periods_per_year)?;
    self.optimize(&stats)
  }

  /// Run the full analysis against precomputed statistics.
  pub fn optimize(&self, stats: &ReturnStatistics) -> Result<AllocationReport, PortfolioError> {
    let solver_config = self.solver_config();
    let risk_free = self.config.risk_free_rate;

    let tangency = max_sharpe(stats, &solver_config)?;
    debug!(converged = tangency.converged, "max-sharpe solve finished");

    let floor = min_variance(stats, &solver_config)?;
    debug!(converged = floor.converged, "min-variance solve finished");

    let low = evaluate(&floor.weights, stats, risk_free).annualized_return;
    let high =
      evaluate(&tangency.weights, stats, risk_free).annualized_return * frontier::SWEEP_MARGIN;
    let frontier = frontier::sweep(
      stats,
      &solver_config,
      self.config.frontier_points,
      low,
      high,
    )?;

    let n = stats.num_assets();
    let equal = vec![1.0 / n as f64; n];

    Ok(AllocationReport {
      max_sharpe: Allocation {
        performance: evaluate(&tangency.weights, stats, risk_free),
        converged: tangency.converged,
        weights: tangency.weights,
      },
      min_variance: Allocation {
        performance: evaluate(&floor.weights, stats, risk_free),
        converged: floor.converged,
        weights: floor.weights,
      },
      equal_weight: Allocation {
        performance: evaluate(&equal, stats, risk_free),
        converged: true,
        weights: equal,
      },
      frontier,
    })
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;

  fn sample_table() -> ReturnTable {
    ReturnTable::new(
      vec!["sp500".to_string(), "tech".to_string(), "crypto".to_string()],
      vec![
        vec![0.011, -0.004, 0.009, 0.013, -0.002, 0.007, 0.012, 0.001],
        vec![0.018, -0.011, 0.016, 0.021, -0.008, 0.013, 0.019, 0.004],
        vec![0.042, -0.035, 0.051, 0.038, -0.027, 0.044, -0.019, 0.033],
      ],
    )
    .unwrap()
  }

  #[test]
  fn analyze_produces_full_report() {
    let engine = PortfolioEngine::new(EngineConfig::default()).unwrap();
    let report = engine.analyze(&sample_table()).unwrap();

    assert_eq!(report.max_sharpe.weights.len(), 3);
    assert_eq!(report.min_variance.weights.len(), 3);
    assert_eq!(report.frontier.len(), 50);

    let sum: f64 = report.max_sharpe.weights.iter().sum();
    assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-6);
    assert!(report.min_variance.performance.annualized_volatility >= 0.0);
  }

  #[test]
  fn equal_weight_benchmark_is_reported() {
    let engine = PortfolioEngine::new(EngineConfig::default()).unwrap();
    let report = engine.analyze(&sample_table()).unwrap();

    for &w in &report.equal_weight.weights {
      assert_abs_diff_eq!(w, 1.0 / 3.0, epsilon = 1e-12);
    }
    assert!(report.equal_weight.converged);
  }

  #[test]
  fn min_variance_is_no_riskier_than_the_benchmark() {
    let engine = PortfolioEngine::new(EngineConfig::default()).unwrap();
    let report = engine.analyze(&sample_table()).unwrap();

    assert!(
      report.min_variance.performance.annualized_volatility
        <= report.equal_weight.performance.annualized_volatility + 1e-6
    );
  }

  #[test]
  fn rejects_invalid_engine_configuration() {
    let inverted = EngineConfig {
      weight_lower_bound: 0.8,
      weight_upper_bound: 0.2,
      ..EngineConfig::default()
    };
    assert!(PortfolioEngine::new(inverted).is_err());

    let no_periods = EngineConfig {
      periods_per_year: 0,
      ..EngineConfig::default()
    };
    assert!(PortfolioEngine::new(no_periods).is_err());

    let too_few_points = EngineConfig {
      frontier_points: 1,
      ..EngineConfig::default()
    };
    assert!(PortfolioEngine::new(too_few_points).is_err());
  }
}
