//! # Constrained Optimizer
//!
//! $$
//! \min_{\mathbf{w}\in[l,u]^n} f(\mathbf{w}) + \mu\sum_k c_k(\mathbf{w})^2
//! $$
//!
//! Reusable equality-constrained, box-bounded minimization of a black-box
//! objective. The inner unconstrained solve is Nelder-Mead; equality
//! constraints enter through a quadratic-penalty sweep with warm restarts
//! and a growing penalty weight, and bounds are enforced by clamping the
//! candidate inside the cost. Small dense problems only (n up to ~20).
//!
//! Objectives and constraints carry their own context and must be `Sync`;
//! the routine holds no state, never logs, and is fully deterministic for
//! a fixed initial guess.

use argmin::core::CostFunction;
use argmin::core::Executor;
use argmin::solver::neldermead::NelderMead;

/// Cost sentinel returned where the objective or a constraint is
/// non-finite, keeping the simplex away from degenerate regions.
const COST_CEILING: f64 = 1e10;

/// Black-box objective evaluated on a candidate weight vector.
pub type ObjectiveFn<'a> = &'a (dyn Fn(&[f64]) -> f64 + Sync);

/// Equality constraint; must evaluate to zero at a feasible point.
pub type ConstraintFn<'a> = &'a (dyn Fn(&[f64]) -> f64 + Sync);

/// Stopping criteria and penalty schedule for one constrained solve.
///
/// All stopping behavior lives here rather than inside the algorithm.
#[derive(Clone, Copy, Debug)]
pub struct OptimizerConfig {
  /// Iteration cap for each inner Nelder-Mead solve.
  pub max_iters: u64,
  /// Simplex standard-deviation tolerance for the inner solve.
  pub sd_tolerance: f64,
  /// Maximum absolute constraint residual accepted as converged.
  pub constraint_tolerance: f64,
  /// Number of penalty rounds, each restarting from the previous best.
  pub penalty_rounds: usize,
  /// Penalty weight of the first round.
  pub initial_penalty: f64,
  /// Multiplicative penalty growth between rounds.
  pub penalty_growth: f64,
}

impl Default for OptimizerConfig {
  fn default() -> Self {
    Self {
      max_iters: 5000,
      sd_tolerance: 1e-12,
      constraint_tolerance: 1e-6,
      penalty_rounds: 8,
      initial_penalty: 1e3,
      penalty_growth: 10.0,
    }
  }
}

/// Reason a solve did not produce a converged result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveFailure {
  /// Equality constraints could not be met within tolerance, e.g. a
  /// target return above anything the bounds admit.
  Infeasible,
  /// The inner solver stopped abnormally.
  NonConvergence,
  /// Objective non-finite at the returned point, e.g. a numerically
  /// singular quadratic form.
  Degenerate,
}

/// Outcome of one constrained solve.
///
/// Produced fresh per call and never mutated afterwards. A
/// `converged = false` result is a recoverable, reported condition; the
/// caller decides whether to keep or discard the weights.
#[derive(Clone, Debug)]
pub struct OptimizationResult {
  /// Best weight vector found, clamped into bounds.
  pub weights: Vec<f64>,
  /// Objective value at `weights`, without penalty terms.
  pub objective: f64,
  /// Whether constraints and bounds are satisfied to tolerance.
  pub converged: bool,
  /// Failure classification when `converged` is false.
  pub failure: Option<SolveFailure>,
}

struct PenalizedCost<'a> {
  objective: ObjectiveFn<'a>,
  constraints: &'a [ConstraintFn<'a>],
  lower: f64,
  upper: f64,
  penalty: f64,
}

impl PenalizedCost<'_> {
  fn clamp(&self, x: &[f64]) -> Vec<f64> {
    x.iter().map(|v| v.clamp(self.lower, self.upper)).collect()
  }
}

impl CostFunction for PenalizedCost<'_> {
  // TODO: temp solution until argmin has ndarray@0.17 support
  type Param = Vec<f64>;
  type Output = f64;

  fn cost(&self, x: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
    let w = self.clamp(x);

    let value = (self.objective)(&w);
    if !value.is_finite() {
      return Ok(COST_CEILING);
    }

    let mut residual = 0.0;
    for constraint in self.constraints {
      let c = constraint(&w);
      if !c.is_finite() {
        return Ok(COST_CEILING);
      }
      residual += c * c;
    }

    Ok(value + self.penalty * residual)
  }
}

fn simplex_around(x: &[f64], step: f64) -> Vec<Vec<f64>> {
  let mut simplex = Vec::with_capacity(x.len() + 1);
  simplex.push(x.to_vec());

  for i in 0..x.len() {
    let mut point = x.to_vec();
    point[i] += step;
    simplex.push(point);
  }

  simplex
}

fn failed(weights: Vec<f64>, objective: ObjectiveFn<'_>, failure: SolveFailure) -> OptimizationResult {
  let value = objective(&weights);
  OptimizationResult {
    objective: if value.is_finite() { value } else { f64::NAN },
    weights,
    converged: false,
    failure: Some(failure),
  }
}

/// Minimize `objective` subject to equality `constraints` and uniform
/// per-component bounds `[lower, upper]`, starting from `initial`.
pub fn minimize(
  objective: ObjectiveFn<'_>,
  constraints: &[ConstraintFn<'_>],
  initial: &[f64],
  lower: f64,
  upper: f64,
  config: &OptimizerConfig,
) -> OptimizationResult {
  let mut x: Vec<f64> = initial.iter().map(|v| v.clamp(lower, upper)).collect();
  let mut penalty = config.initial_penalty;
  let mut step = (upper - lower).max(1e-3) * 0.25;

  for _ in 0..config.penalty_rounds {
    let cost = PenalizedCost {
      objective,
      constraints,
      lower,
      upper,
      penalty,
    };

    let solver = match NelderMead::new(simplex_around(&x, step)).with_sd_tolerance(config.sd_tolerance)
    {
      Ok(solver) => solver,
      Err(_) => return failed(x, objective, SolveFailure::NonConvergence),
    };

    match Executor::new(cost, solver)
      .configure(|state| state.max_iters(config.max_iters))
      .run()
    {
      Ok(res) => {
        if let Some(best) = res.state.best_param {
          x = best.iter().map(|v| v.clamp(lower, upper)).collect();
        }
      }
      Err(_) => return failed(x, objective, SolveFailure::NonConvergence),
    }

    penalty *= config.penalty_growth;
    step *= 0.25;
  }

  let value = objective(&x);
  let violation = constraints
    .iter()
    .map(|c| c(&x).abs())
    .fold(0.0_f64, f64::max);

  if !value.is_finite() || !violation.is_finite() {
    return failed(x, objective, SolveFailure::Degenerate);
  }

  if violation > config.constraint_tolerance {
    return OptimizationResult {
      weights: x,
      objective: value,
      converged: false,
      failure: Some(SolveFailure::Infeasible),
    };
  }

  OptimizationResult {
    weights: x,
    objective: value,
    converged: true,
    failure: None,
  }
}
