//! Per-track motion statistics.
//!
//! Consumes one ordered point sequence and produces cumulative distance and
//! elevation gain/loss, each rounded to one decimal place. Statistics are
//! computed fresh on every call and never cached; tracks are independent, so
//! the batch helpers may fan out one computation per track.

use log::{debug, info};

use crate::error::{Result, TrailMetricsError};
use crate::geo_utils::{self, DistanceFormula};
use crate::Track;

/// Rounding applied to the three statistic outputs.
///
/// The mode is fixed per run so that test fixtures and cross-run comparisons
/// reproduce exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoundingMode {
    /// Ties round away from zero (all outputs are >= 0, so: upward)
    #[default]
    HalfUp,
    /// Ties round to the nearest even tenth, like Python's `round`
    HalfToEven,
}

/// Configuration for track statistics.
///
/// Both knobs are explicit so ambient numeric settings can never change what
/// a run produces.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsConfig {
    /// Geodesic distance formula. Default: haversine on a spherical Earth.
    pub formula: DistanceFormula,
    /// Rounding applied to the outputs. Default: half-up.
    pub rounding: RoundingMode,
}

/// Derived statistics for one track.
///
/// All values are rounded to one decimal place with the configured
/// [`RoundingMode`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackStats {
    /// Cumulative surface distance in kilometers
    pub total_distance_km: f64,
    /// Sum of positive elevation deltas in meters
    pub elevation_gain_m: f64,
    /// Sum of absolute negative elevation deltas in meters
    pub elevation_loss_m: f64,
}

/// Compute distance and elevation statistics for one track.
///
/// Iterates consecutive point pairs, accumulating the geodesic surface
/// distance and splitting elevation deltas into gain (positive) and loss
/// (negative, accumulated as absolute value). Zero deltas contribute to
/// neither.
///
/// # Errors
///
/// - [`TrailMetricsError::InsufficientData`] when the track has fewer than
///   2 points.
/// - [`TrailMetricsError::MalformedPoint`] when any point has a non-finite
///   or out-of-range coordinate or elevation. Bad points are never skipped:
///   partial statistics would be misleading in a hiking log.
pub fn compute_track_stats(track: &Track, config: &StatsConfig) -> Result<TrackStats> {
    if track.points.len() < 2 {
        return Err(TrailMetricsError::InsufficientData {
            track_id: track.id.clone(),
            point_count: track.points.len(),
        });
    }

    if let Some(index) = track.points.iter().position(|p| !p.is_valid()) {
        return Err(TrailMetricsError::MalformedPoint {
            track_id: track.id.clone(),
            index,
        });
    }

    let mut distance_m = 0.0;
    let mut gain_m = 0.0;
    let mut loss_m = 0.0;

    for pair in track.points.windows(2) {
        distance_m += geo_utils::distance_m(&pair[0], &pair[1], config.formula);

        let delta = pair[1].elevation - pair[0].elevation;
        if delta > 0.0 {
            gain_m += delta;
        } else if delta < 0.0 {
            loss_m += -delta;
        }
    }

    debug!(
        "track {}: {:.3} km, +{:.1} m / -{:.1} m over {} points",
        track.id,
        distance_m / 1000.0,
        gain_m,
        loss_m,
        track.points.len()
    );

    Ok(TrackStats {
        total_distance_km: round_to_tenth(distance_m / 1000.0, config.rounding),
        elevation_gain_m: round_to_tenth(gain_m, config.rounding),
        elevation_loss_m: round_to_tenth(loss_m, config.rounding),
    })
}

/// Compute statistics for a batch of tracks.
///
/// The output is order-aligned with the input; each slot carries the track's
/// statistics or its typed error. The caller decides whether to skip a failed
/// track or abort the batch.
pub fn compute_stats_batch(tracks: &[Track], config: &StatsConfig) -> Vec<Result<TrackStats>> {
    let results: Vec<Result<TrackStats>> = tracks
        .iter()
        .map(|track| compute_track_stats(track, config))
        .collect();

    let ok = results.iter().filter(|r| r.is_ok()).count();
    info!("computed statistics for {}/{} tracks", ok, tracks.len());

    results
}

/// Compute statistics for a batch of tracks in parallel.
///
/// Same contract as [`compute_stats_batch`]; per-track statistics have no
/// data dependency between tracks, so the computation fans out with rayon.
#[cfg(feature = "parallel")]
pub fn compute_stats_batch_parallel(
    tracks: &[Track],
    config: &StatsConfig,
) -> Vec<Result<TrackStats>> {
    use rayon::prelude::*;

    let results: Vec<Result<TrackStats>> = tracks
        .par_iter()
        .map(|track| compute_track_stats(track, config))
        .collect();

    let ok = results.iter().filter(|r| r.is_ok()).count();
    info!(
        "computed statistics for {}/{} tracks (parallel)",
        ok,
        tracks.len()
    );

    results
}

/// Round to one decimal place with the given mode.
pub(crate) fn round_to_tenth(value: f64, mode: RoundingMode) -> f64 {
    let scaled = value * 10.0;
    let rounded = match mode {
        RoundingMode::HalfUp => scaled.round(),
        RoundingMode::HalfToEven => scaled.round_ties_even(),
    };
    rounded / 10.0
}
