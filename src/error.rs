//! Unified error handling for the trail-metrics library.
//!
//! Every failure is reported to the immediate caller as a typed error.
//! Nothing is silently defaulted: a malformed track yielding zero statistics
//! would corrupt downstream trip summaries. No variant is retried internally
//! and none is treated as fatal by the library itself.

use thiserror::Error;

/// Unified error type for trail-metrics operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrailMetricsError {
    /// Track has too few points to compute statistics
    #[error("track '{track_id}' has {point_count} points, at least 2 required")]
    InsufficientData {
        track_id: String,
        point_count: usize,
    },
    /// A point carries a non-finite or out-of-range coordinate or elevation
    #[error("track '{track_id}' has a malformed point at index {index}")]
    MalformedPoint { track_id: String, index: usize },
    /// Marker selection or summary was requested for zero tracks
    #[error("itinerary has no tracks")]
    EmptyItinerary,
    /// Day label is neither a plain number nor an "<int>-<suffix>" string
    #[error("day label '{label}' is not a day number or '<day>-<index>' string")]
    UnparseableDayLabel { label: String },
}

/// Result type alias for trail-metrics operations.
pub type Result<T> = std::result::Result<T, TrailMetricsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrailMetricsError::InsufficientData {
            track_id: "hikes/day-1.gpx".to_string(),
            point_count: 1,
        };
        assert!(err.to_string().contains("hikes/day-1.gpx"));
        assert!(err.to_string().contains("1 points"));
    }

    #[test]
    fn test_malformed_point_identifies_index() {
        let err = TrailMetricsError::MalformedPoint {
            track_id: "t".to_string(),
            index: 7,
        };
        assert!(err.to_string().contains("index 7"));
    }
}
