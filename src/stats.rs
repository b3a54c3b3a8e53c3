//! # Return Statistics
//!
//! $$
//! \mu_i = \frac{1}{T}\sum_t r_{t,i},\qquad
//! \Sigma_{ij} = \frac{1}{T-1}\sum_t (r_{t,i}-\mu_i)(r_{t,j}-\mu_j)
//! $$
//!
//! Period-aligned return tables and the sample moments that drive the
//! allocation solvers.

use ndarray::Array1;
use ndarray::Array2;
use ndarray::Axis;

use crate::error::PortfolioError;

/// Period-aligned fractional returns for a fixed, ordered set of assets.
///
/// Asset order is significant: it defines the index alignment of every
/// weight vector and covariance matrix produced downstream.
#[derive(Clone, Debug)]
pub struct ReturnTable {
  assets: Vec<String>,
  /// `periods x assets` return matrix.
  returns: Array2<f64>,
}

impl ReturnTable {
  /// Build a table from one return series per asset.
  ///
  /// Series must already be gap-free and period-aligned; all of them must
  /// have the same length.
  pub fn new(assets: Vec<String>, series: Vec<Vec<f64>>) -> Result<Self, PortfolioError> {
    if assets.is_empty() {
      return Err(PortfolioError::InvalidConfiguration(
        "return table has no assets".to_string(),
      ));
    }
    if series.len() != assets.len() {
      return Err(PortfolioError::DimensionMismatch(format!(
        "{} asset label(s) but {} return series",
        assets.len(),
        series.len()
      )));
    }

    let periods = series[0].len();
    for (label, s) in assets.iter().zip(series.iter()) {
      if s.len() != periods {
        return Err(PortfolioError::DimensionMismatch(format!(
          "series for {} has {} period(s), expected {}",
          label,
          s.len(),
          periods
        )));
      }
    }

    let mut returns = Array2::zeros((periods, assets.len()));
    for (j, s) in series.iter().enumerate() {
      for (t, &r) in s.iter().enumerate() {
        returns[[t, j]] = r;
      }
    }

    Ok(Self { assets, returns })
  }

  /// Build a table of simple period returns from aligned price series.
  ///
  /// The leading period is consumed by differencing, so `T` prices yield
  /// `T - 1` returns per asset.
  pub fn from_prices(assets: Vec<String>, prices: Vec<Vec<f64>>) -> Result<Self, PortfolioError> {
    let series = prices
      .iter()
      .map(|p| {
        p.windows(2)
          .map(|pair| pair[1] / pair[0] - 1.0)
          .collect::<Vec<f64>>()
      })
      .collect();

    Self::new(assets, series)
  }

  /// Ordered asset labels.
  pub fn assets(&self) -> &[String] {
    &self.assets
  }

  /// Number of assets (columns).
  pub fn num_assets(&self) -> usize {
    self.assets.len()
  }

  /// Number of return periods (rows).
  pub fn num_periods(&self) -> usize {
    self.returns.nrows()
  }

  /// Borrow the `periods x assets` return matrix.
  pub fn returns(&self) -> &Array2<f64> {
    &self.returns
  }
}

/// Per-period sample moments of a return table.
///
/// The covariance is symmetric and positive semi-definite by construction
/// from real data; it is kept *unannualized* and scaled only at evaluation
/// time.
#[derive(Clone, Debug)]
pub struct ReturnStatistics {
  /// Arithmetic mean return per asset.
  pub mean: Array1<f64>,
  /// Unbiased sample covariance (`periods - 1` denominator).
  pub covariance: Array2<f64>,
  /// Return periods per year, used for annualization.
  pub periods_per_year: u32,
}

impl ReturnStatistics {
  /// Derive moments from a return table.
  pub fn from_table(table: &ReturnTable, periods_per_year: u32) -> Result<Self, PortfolioError> {
    let periods = table.num_periods();
    if periods < 2 {
      return Err(PortfolioError::InsufficientData { periods });
    }

    let mean = table
      .returns
      .mean_axis(Axis(0))
      .unwrap_or_else(|| Array1::zeros(table.num_assets()));
    let centered = &table.returns - &mean;
    let covariance = centered.t().dot(&centered) / (periods as f64 - 1.0);

    Self::new(mean, covariance, periods_per_year)
  }

  /// Wrap precomputed moments, validating shapes.
  pub fn new(
    mean: Array1<f64>,
    covariance: Array2<f64>,
    periods_per_year: u32,
  ) -> Result<Self, PortfolioError> {
    let n = mean.len();
    if n == 0 {
      return Err(PortfolioError::InvalidConfiguration(
        "statistics cover zero assets".to_string(),
      ));
    }
    if covariance.nrows() != n || covariance.ncols() != n {
      return Err(PortfolioError::DimensionMismatch(format!(
        "covariance is {}x{} for {} asset(s)",
        covariance.nrows(),
        covariance.ncols(),
        n
      )));
    }
    if periods_per_year == 0 {
      return Err(PortfolioError::InvalidConfiguration(
        "periods_per_year must be positive".to_string(),
      ));
    }

    Ok(Self {
      mean,
      covariance,
      periods_per_year,
    })
  }

  /// Number of assets covered by these statistics.
  pub fn num_assets(&self) -> usize {
    self.mean.len()
  }
}
