use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the load → filter → aggregate pipeline.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The source file is missing, unreadable or malformed. Fatal at startup.
    #[error("data unavailable ({path}): {reason}")]
    DataUnavailable { path: PathBuf, reason: String },

    /// The current selection matches no records.
    #[error("No data available for selected filters.")]
    NoMatchingData,

    /// An aggregator was called on an empty view.
    #[error("aggregation over an empty view")]
    EmptyAggregation,
}

impl DashboardError {
    pub fn data_unavailable(path: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
        DashboardError::DataUnavailable {
            path: path.into(),
            reason: format!("{err:#}"),
        }
    }
}
