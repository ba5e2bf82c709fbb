//! Error kinds raised by the KPI calculations.
//!
//! These are returned inside [`anyhow::Error`]s, so callers which need to distinguish between them
//! can use `downcast_ref::<KpiError>()`.
use derive_more::Display;

/// An error which makes the KPIs for a building (or the whole community) impossible to calculate
#[derive(Debug, Clone, PartialEq, Display)]
pub enum KpiError {
    /// No factor record exists for a carrier, or a generation system cannot be resolved
    #[display("Missing reference data: {_0}")]
    MissingReferenceData(String),
    /// A time series does not have the expected number of time steps
    #[display("Time series has {actual} values, but {expected} were expected")]
    InvalidTimeSeriesLength {
        /// The required number of values
        expected: usize,
        /// The number of values supplied
        actual: usize,
    },
    /// Parameters for the financial appraisal are unusable
    #[display("Invalid financial input: {_0}")]
    InvalidFinancialInput(String),
    /// Area-weighted averages were requested for a community with no floor area
    #[display("Cannot calculate area-weighted KPIs: total floor area is zero")]
    ZeroAreaAggregation,
}

impl std::error::Error for KpiError {}
