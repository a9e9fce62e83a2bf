//! # Trail Metrics
//!
//! GPS track statistics and multi-day itinerary classification.
//!
//! This library provides:
//! - Per-track motion statistics (distance, elevation gain/loss) from raw GPS points
//! - Main/side-track classification for days with several recordings
//! - Start/mid/end marker selection for a whole itinerary
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel batch statistics with rayon
//! - **`serde`** - Enable serde derives on the public data types
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use trail_metrics::{compute_track_stats, ActivityKind, StatsConfig, Track, TrackPoint};
//!
//! let start = Utc.with_ymd_and_hms(2024, 7, 14, 8, 30, 0).unwrap();
//! let points: Vec<TrackPoint> = (0..4i64)
//!     .map(|i| TrackPoint::new(
//!         47.0 + i as f64 * 0.001,
//!         11.0,
//!         1200.0 + i as f64 * 15.0,
//!         start + Duration::minutes(i * 10),
//!         1.1,
//!     ))
//!     .collect();
//! let track = Track::new("hikes/day-1.gpx", points, ActivityKind::Hiking);
//!
//! let stats = compute_track_stats(&track, &StatsConfig::default()).unwrap();
//! assert_eq!(stats.total_distance_km, 0.3);
//! assert_eq!(stats.elevation_gain_m, 45.0);
//! ```
//!
//! All operations are pure functions over caller-owned collections: nothing is
//! cached or mutated, so statistics may be computed concurrently on disjoint
//! tracks. Classification, by contrast, folds over one chronologically ordered
//! entry stream and must see the whole itinerary in a single call.

use chrono::{DateTime, Utc};

// Unified error type
pub mod error;
pub use error::{Result, TrailMetricsError};

// Geographic helpers (distances, marker placement geometry)
pub mod geo_utils;
pub use geo_utils::{
    compute_bounds, compute_center, offset_point, track_midpoint, Bounds, DistanceFormula,
};

// Per-track statistics
pub mod stats;
pub use stats::{compute_stats_batch, compute_track_stats, RoundingMode, StatsConfig, TrackStats};

#[cfg(feature = "parallel")]
pub use stats::compute_stats_batch_parallel;

// Itinerary classification and marker selection
pub mod itinerary;
pub use itinerary::{
    classify_day_tracks, count_tracks_per_day, parse_day_label, select_markers,
    summarize_itinerary, DayTrackCounts, ItineraryEntry, ItineraryMarkers, ItinerarySummary,
    MidMarkerKind,
};

// ============================================================================
// Core Types
// ============================================================================

/// A single timestamped GPS sample within a track.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use trail_metrics::TrackPoint;
/// let time = Utc.with_ymd_and_hms(2024, 7, 14, 8, 30, 0).unwrap();
/// let point = TrackPoint::new(47.2692, 11.4041, 574.0, time, 1.3); // Innsbruck
/// assert!(point.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Elevation above sea level in meters
    pub elevation: f64,
    /// Recording time of this sample
    pub timestamp: DateTime<Utc>,
    /// Instantaneous speed in m/s as reported by the recording
    pub speed: f64,
}

impl TrackPoint {
    /// Create a new track point.
    pub fn new(
        latitude: f64,
        longitude: f64,
        elevation: f64,
        timestamp: DateTime<Utc>,
        speed: f64,
    ) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
            timestamp,
            speed,
        }
    }

    /// Check that latitude, longitude and elevation are finite and in range.
    ///
    /// Speed is not checked: it is informational and never feeds the
    /// statistics.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.elevation.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// The kind of activity a track was recorded during.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActivityKind {
    Cycling,
    Hiking,
    Other,
}

/// One continuous GPS recording of a single outing.
///
/// Points are in temporal order and that order is authoritative: the library
/// never re-sorts them. A track usable for statistics has at least 2 points.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    /// Opaque identity, typically the source file path
    pub id: String,
    /// Ordered point sequence
    pub points: Vec<TrackPoint>,
    pub activity: ActivityKind,
}

impl Track {
    /// Create a new track from an ordered point sequence.
    pub fn new(id: &str, points: Vec<TrackPoint>, activity: ActivityKind) -> Self {
        Self {
            id: id.to_string(),
            points,
            activity,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
