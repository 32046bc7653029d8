//! Resampling windows and aggregate choices for dataset views.

use polars::prelude::Expr;
use std::fmt;

/// The window size a dataset is resampled into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// One row per hour of data.
    Hourly,
    /// One row per calendar day of data.
    Daily,
}

impl Resolution {
    pub(crate) fn window(&self) -> &'static str {
        match self {
            Resolution::Hourly => "1h",
            Resolution::Daily => "1d",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Hourly => write!(f, "hourly"),
            Resolution::Daily => write!(f, "daily"),
        }
    }
}

/// How sensor values are combined within each resampling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregation {
    Mean,
    Min,
    Max,
}

impl Aggregation {
    pub(crate) fn apply(&self, expr: Expr) -> Expr {
        match self {
            Aggregation::Mean => expr.mean(),
            Aggregation::Min => expr.min(),
            Aggregation::Max => expr.max(),
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregation::Mean => write!(f, "mean"),
            Aggregation::Min => write!(f, "min"),
            Aggregation::Max => write!(f, "max"),
        }
    }
}
