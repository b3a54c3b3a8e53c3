//! # markowitz-rs
//!
//! $$
//! \mathbf{w}^\* = \arg\max_{\mathbf{w}}\frac{\mathbb{E}[R_p]-r_f}{\sigma_p}
//! $$
//!
//! Mean-variance portfolio optimization over historical return statistics:
//! maximum-Sharpe and minimum-variance allocations plus a discretized
//! efficient frontier, built on equality-constrained Nelder-Mead solves.
//!
//! The crate consumes a period-aligned return table and produces
//! allocation results only; data loading and rendering are external
//! collaborators.

pub mod engine;
pub mod error;
pub mod evaluate;
pub mod frontier;
pub mod optimizer;
pub mod solvers;
pub mod stats;

pub use engine::Allocation;
pub use engine::AllocationReport;
pub use engine::EngineConfig;
pub use engine::PortfolioEngine;
pub use error::PortfolioError;
pub use evaluate::evaluate;
pub use evaluate::PortfolioPerformance;
pub use frontier::generate;
pub use frontier::sweep;
pub use frontier::FrontierPoint;
pub use optimizer::minimize;
pub use optimizer::OptimizationResult;
pub use optimizer::OptimizerConfig;
pub use optimizer::SolveFailure;
pub use solvers::max_sharpe;
pub use solvers::min_variance;
pub use solvers::target_return_min_variance;
pub use solvers::SolverConfig;
pub use stats::ReturnStatistics;
pub use stats::ReturnTable;
