//! Fixed-length hourly time series covering one (non-leap) reference year.
use crate::error::KpiError;
use anyhow::{Result, ensure};
use std::ops::{Add, AddAssign, Index, Sub};

/// The number of hourly time steps in the reference year
pub const HOURS_PER_YEAR: usize = 8760;

/// The number of hours in each month of the reference year
pub const HOURS_PER_MONTH: [usize; 12] = [744, 672, 744, 720, 744, 720, 744, 744, 720, 744, 720, 744];

/// Totals for each month of the reference year
pub type MonthlyValues = [f64; 12];

/// An hourly series of values for one year.
///
/// The series always has exactly [`HOURS_PER_YEAR`] values. Missing values are stored as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySeries(Vec<f64>);

impl HourlySeries {
    /// A series where every hour is zero
    pub fn zeros() -> Self {
        Self(vec![0.0; HOURS_PER_YEAR])
    }

    /// A series with the same value for every hour
    pub fn constant(value: f64) -> Self {
        Self(vec![value; HOURS_PER_YEAR])
    }

    /// Create a series from a vector of values, checking its length
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        ensure!(
            values.len() == HOURS_PER_YEAR,
            KpiError::InvalidTimeSeriesLength {
                expected: HOURS_PER_YEAR,
                actual: values.len()
            }
        );

        Ok(Self(values))
    }

    /// Create a series from possibly missing values, treating missing values as zero
    pub fn from_optional<I>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        Self::from_values(values.into_iter().map(|v| v.unwrap_or(0.0)).collect())
    }

    /// The hourly values
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Iterate over the hourly values
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    /// Apply `f` to every hour
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self(self.0.iter().map(|&v| f(v)).collect())
    }

    /// Multiply every hour by `factor`
    pub fn scale(&self, factor: f64) -> Self {
        self.map(|v| v * factor)
    }

    /// Combine two series hour by hour
    pub fn zip_with<F>(&self, other: &Self, f: F) -> Self
    where
        F: Fn(f64, f64) -> f64,
    {
        Self(self.iter().zip(other.iter()).map(|(a, b)| f(a, b)).collect())
    }

    /// The hour-by-hour minimum of two series
    pub fn min(&self, other: &Self) -> Self {
        self.zip_with(other, f64::min)
    }

    /// Totals for each month
    pub fn monthly(&self) -> MonthlyValues {
        let mut totals = [0.0; 12];
        let mut start = 0;
        for (total, hours) in totals.iter_mut().zip(HOURS_PER_MONTH) {
            *total = self.0[start..start + hours].iter().sum();
            start += hours;
        }

        totals
    }

    /// Total for the whole year
    pub fn yearly(&self) -> f64 {
        self.0.iter().sum()
    }

    /// The largest hourly value
    pub fn peak(&self) -> f64 {
        self.iter().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Whether any hour has a value greater than zero
    pub fn any_positive(&self) -> bool {
        self.iter().any(|v| v > 0.0)
    }
}

impl Default for HourlySeries {
    fn default() -> Self {
        Self::zeros()
    }
}

impl Index<usize> for HourlySeries {
    type Output = f64;

    fn index(&self, hour: usize) -> &f64 {
        &self.0[hour]
    }
}

impl Add for &HourlySeries {
    type Output = HourlySeries;

    fn add(self, rhs: &HourlySeries) -> HourlySeries {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl Sub for &HourlySeries {
    type Output = HourlySeries;

    fn sub(self, rhs: &HourlySeries) -> HourlySeries {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl AddAssign<&HourlySeries> for HourlySeries {
    fn add_assign(&mut self, rhs: &HourlySeries) {
        for (value, other) in self.0.iter_mut().zip(rhs.iter()) {
            *value += other;
        }
    }
}

impl<'a> std::iter::Sum<&'a HourlySeries> for HourlySeries {
    fn sum<I: Iterator<Item = &'a HourlySeries>>(iter: I) -> Self {
        iter.fold(Self::zeros(), |mut total, series| {
            total += series;
            total
        })
    }
}
