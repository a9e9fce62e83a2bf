//! Itinerary classification and marker selection.
//!
//! An itinerary is a named, multi-day sequence of tracks (one long-distance
//! hike split across days). Within a day, recordings may include the primary
//! route plus side excursions recorded as separate files; nothing in the
//! metadata flags which is which, so the classifier infers it from position
//! within the day's recording sequence. A second pass picks the tracks that
//! carry the itinerary-level start, mid and end markers.
//!
//! Everything here is recomputed from the caller's entry collection on each
//! call. Classification folds over a single chronologically ordered stream
//! and carries explicit `(current_day, iteration)` state; reordering the
//! input changes the result, so the caller must sort before invoking.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use log::debug;

use crate::error::{Result, TrailMetricsError};
use crate::stats::{round_to_tenth, RoundingMode, TrackStats};

/// Metadata row tying one track to its place in an itinerary.
///
/// Produced by the metadata collaborator that reconciles machine-exported
/// activity data with human-entered trail annotations.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItineraryEntry {
    /// Opaque track identity, typically the source file path
    pub track_id: String,
    /// Itinerary name, e.g. "Tauern Hoehenweg"
    pub itinerary: String,
    /// Human-entered day label: a plain number or a "<day>-<index>" string
    pub day_label: String,
    /// Chronological date of the recording
    pub date: DateTime<Utc>,
}

impl ItineraryEntry {
    pub fn new(track_id: &str, itinerary: &str, day_label: &str, date: DateTime<Utc>) -> Self {
        Self {
            track_id: track_id.to_string(),
            itinerary: itinerary.to_string(),
            day_label: day_label.to_string(),
            date,
        }
    }
}

/// Tracks recorded per day, per itinerary: name -> day index -> count.
///
/// Built fresh for every classification call; never carried across calls.
pub type DayTrackCounts = HashMap<String, HashMap<u32, u32>>;

/// Parse a human-entered day label into its day index.
///
/// Labels are either a plain number (`"7"`, `"7.0"`) or a day-subindex
/// string (`"4-2"` for the second track of day 4). Only the integer prefix
/// is itinerary-significant; fractional parts are truncated.
///
/// # Example
/// ```
/// use trail_metrics::parse_day_label;
/// assert_eq!(parse_day_label("7").unwrap(), 7);
/// assert_eq!(parse_day_label("7.0").unwrap(), 7);
/// assert_eq!(parse_day_label("4-2").unwrap(), 4);
/// assert!(parse_day_label("abc").is_err());
/// ```
pub fn parse_day_label(label: &str) -> Result<u32> {
    let prefix = label.split('-').next().unwrap_or(label).trim();
    let value: f64 = prefix
        .parse()
        .map_err(|_| TrailMetricsError::UnparseableDayLabel {
            label: label.to_string(),
        })?;

    // Day indices start at 1; anything else is a broken annotation
    if !value.is_finite() || value < 1.0 {
        return Err(TrailMetricsError::UnparseableDayLabel {
            label: label.to_string(),
        });
    }

    Ok(value as u32)
}

/// Count how many tracks were recorded per day, per itinerary.
///
/// # Errors
///
/// [`TrailMetricsError::UnparseableDayLabel`] if any entry's label has no
/// integer day prefix.
pub fn count_tracks_per_day(entries: &[ItineraryEntry]) -> Result<DayTrackCounts> {
    let mut counts: DayTrackCounts = HashMap::new();

    for entry in entries {
        let day = parse_day_label(&entry.day_label)?;
        *counts
            .entry(entry.itinerary.clone())
            .or_default()
            .entry(day)
            .or_insert(0) += 1;
    }

    Ok(counts)
}

/// Classify each track of one itinerary as main track or side track.
///
/// `entries` must hold the tracks of a single itinerary in strict
/// chronological/recording order; the classifier is a small state machine
/// over that stream, not a per-track function. The fold carries
/// `(current_day, iteration)`:
///
/// - a new day resets the iteration counter to 1;
/// - the first track of a day is the main track, whether or not side trips
///   follow;
/// - every later track of that day (a summit detour, an evening stroll) is a
///   side track, and the counter resets once the day's last track is seen.
///
/// Returns the `track_id -> is_main_track` mapping.
pub fn classify_day_tracks(entries: &[ItineraryEntry]) -> Result<HashMap<String, bool>> {
    let counts = count_tracks_per_day(entries)?;

    let mut labels: HashMap<String, bool> = HashMap::with_capacity(entries.len());
    let mut current_day: Option<u32> = None;
    let mut iteration: u32 = 1;

    for entry in entries {
        let day = parse_day_label(&entry.day_label)?;
        if current_day != Some(day) {
            current_day = Some(day);
            iteration = 1;
        }

        let day_total = counts
            .get(&entry.itinerary)
            .and_then(|days| days.get(&day))
            .copied()
            .unwrap_or(0);
        let position = iteration;

        let is_main = if iteration == 1 && day_total == 1 {
            // Only track on this day
            true
        } else if iteration == 1 {
            iteration += 1;
            true
        } else if iteration == day_total {
            // Last track of the day
            iteration = 1;
            false
        } else {
            iteration += 1;
            false
        };

        debug!(
            "{}: day {} track {}/{} -> {}",
            entry.track_id,
            day,
            position,
            day_total,
            if is_main { "main" } else { "side" }
        );

        labels.insert(entry.track_id.clone(), is_main);
    }

    Ok(labels)
}

/// Where the itinerary-level mid marker should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MidMarkerKind {
    /// Draw a true waypoint near the middle of the mid track
    Mid,
    /// Reuse end-of-day semantics: draw at the mid track's terminal point
    End,
}

/// The tracks carrying an itinerary's start, mid and end summary markers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItineraryMarkers {
    pub start_track: String,
    pub mid_track: String,
    pub mid_marker_kind: MidMarkerKind,
    pub end_track: String,
}

/// Select the start, mid and end representative tracks of one itinerary.
///
/// Entries are sorted ascending by date (stable, so equal dates keep caller
/// order). With `n` tracks and midpoint `m = n / 2`:
///
/// - start is the earliest track, end the latest;
/// - `n == 2` puts a `Mid` marker on index 1 (the end track);
/// - even `n > 2` puts an `End`-style marker on index `m - 1`;
/// - odd `n` puts a `Mid` marker on index `ceil(m) - 1`.
///
/// A one-track itinerary degenerates to all three markers on that track;
/// callers must tolerate the aliasing.
///
/// # Errors
///
/// [`TrailMetricsError::EmptyItinerary`] when `entries` is empty.
pub fn select_markers(entries: &[ItineraryEntry]) -> Result<ItineraryMarkers> {
    if entries.is_empty() {
        return Err(TrailMetricsError::EmptyItinerary);
    }

    let mut sorted: Vec<&ItineraryEntry> = entries.iter().collect();
    sorted.sort_by_key(|entry| entry.date);

    let n = sorted.len();
    let (mid_index, mid_marker_kind) = if n == 2 {
        (1, MidMarkerKind::Mid)
    } else if n % 2 == 0 {
        (n / 2 - 1, MidMarkerKind::End)
    } else {
        ((n + 1) / 2 - 1, MidMarkerKind::Mid)
    };

    debug!(
        "{}: start={} mid={} ({:?}) end={} over {} tracks",
        sorted[0].itinerary,
        sorted[0].track_id,
        sorted[mid_index].track_id,
        mid_marker_kind,
        sorted[n - 1].track_id,
        n
    );

    Ok(ItineraryMarkers {
        start_track: sorted[0].track_id.clone(),
        mid_track: sorted[mid_index].track_id.clone(),
        mid_marker_kind,
        end_track: sorted[n - 1].track_id.clone(),
    })
}

/// Aggregated figures for a whole itinerary.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItinerarySummary {
    /// Number of distinct days with at least one recording
    pub days: u32,
    pub total_distance_km: f64,
    pub elevation_gain_m: f64,
    pub elevation_loss_m: f64,
}

/// Aggregate one itinerary's per-track statistics into a summary.
///
/// Totals are rounded to one decimal place; the inputs are already rounded,
/// so this only clears accumulated float noise. The day count ignores
/// duplicate day indices: a day with a main track and two side trips is one
/// day.
///
/// # Errors
///
/// [`TrailMetricsError::EmptyItinerary`] on empty input and
/// [`TrailMetricsError::UnparseableDayLabel`] on a broken day annotation.
pub fn summarize_itinerary(items: &[(ItineraryEntry, TrackStats)]) -> Result<ItinerarySummary> {
    if items.is_empty() {
        return Err(TrailMetricsError::EmptyItinerary);
    }

    let mut days: BTreeSet<u32> = BTreeSet::new();
    let mut total_distance_km = 0.0;
    let mut elevation_gain_m = 0.0;
    let mut elevation_loss_m = 0.0;

    for (entry, stats) in items {
        days.insert(parse_day_label(&entry.day_label)?);
        total_distance_km += stats.total_distance_km;
        elevation_gain_m += stats.elevation_gain_m;
        elevation_loss_m += stats.elevation_loss_m;
    }

    Ok(ItinerarySummary {
        days: days.len() as u32,
        total_distance_km: round_to_tenth(total_distance_km, RoundingMode::HalfUp),
        elevation_gain_m: round_to_tenth(elevation_gain_m, RoundingMode::HalfUp),
        elevation_loss_m: round_to_tenth(elevation_loss_m, RoundingMode::HalfUp),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn date(offset_hours: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 14, 8, 0, 0).unwrap() + Duration::hours(offset_hours)
    }

    /// Entries for itinerary "X": day 1 with one track, day 2 with three
    /// tracks A/B/C, day 3 with one track, in recording order.
    fn scenario_entries() -> Vec<ItineraryEntry> {
        vec![
            ItineraryEntry::new("d1", "X", "1", date(0)),
            ItineraryEntry::new("d2-a", "X", "2", date(24)),
            ItineraryEntry::new("d2-b", "X", "2-2", date(26)),
            ItineraryEntry::new("d2-c", "X", "2-3", date(28)),
            ItineraryEntry::new("d3", "X", "3", date(48)),
        ]
    }

    #[test]
    fn test_parse_day_label() {
        assert_eq!(parse_day_label("7").unwrap(), 7);
        assert_eq!(parse_day_label("7.0").unwrap(), 7);
        assert_eq!(parse_day_label("4-2").unwrap(), 4);
        assert_eq!(parse_day_label(" 12 ").unwrap(), 12);
        assert!(matches!(
            parse_day_label("abc"),
            Err(TrailMetricsError::UnparseableDayLabel { .. })
        ));
        assert!(parse_day_label("").is_err());
        assert!(parse_day_label("0").is_err());
        assert!(parse_day_label("-3").is_err());
    }

    #[test]
    fn test_count_tracks_per_day() {
        let counts = count_tracks_per_day(&scenario_entries()).unwrap();
        let x = &counts["X"];
        assert_eq!(x[&1], 1);
        assert_eq!(x[&2], 3);
        assert_eq!(x[&3], 1);
    }

    #[test]
    fn test_count_rejects_bad_label() {
        let entries = vec![ItineraryEntry::new("t", "X", "later", date(0))];
        assert!(count_tracks_per_day(&entries).is_err());
    }

    #[test]
    fn test_classify_day_tracks_scenario() {
        let labels = classify_day_tracks(&scenario_entries()).unwrap();
        assert_eq!(labels["d1"], true);
        assert_eq!(labels["d2-a"], true);
        assert_eq!(labels["d2-b"], false);
        assert_eq!(labels["d2-c"], false);
        // Counter reset entering day 3: its single track is main again
        assert_eq!(labels["d3"], true);
    }

    #[test]
    fn test_classify_two_track_day() {
        let entries = vec![
            ItineraryEntry::new("a", "X", "1", date(0)),
            ItineraryEntry::new("b", "X", "1-2", date(2)),
            ItineraryEntry::new("c", "X", "2", date(24)),
        ];
        let labels = classify_day_tracks(&entries).unwrap();
        assert_eq!(labels["a"], true);
        assert_eq!(labels["b"], false);
        assert_eq!(labels["c"], true);
    }

    #[test]
    fn test_classify_propagates_label_error() {
        let entries = vec![ItineraryEntry::new("t", "X", "??", date(0))];
        assert!(matches!(
            classify_day_tracks(&entries),
            Err(TrailMetricsError::UnparseableDayLabel { .. })
        ));
    }

    fn n_entries(n: usize) -> Vec<ItineraryEntry> {
        (0..n)
            .map(|i| {
                ItineraryEntry::new(
                    &format!("t{}", i),
                    "X",
                    &format!("{}", i + 1),
                    date(i as i64 * 24),
                )
            })
            .collect()
    }

    #[test]
    fn test_select_markers_parity_table() {
        // (n, expected mid index, expected kind)
        let cases = [
            (1, 0, MidMarkerKind::Mid),
            (2, 1, MidMarkerKind::Mid),
            (3, 1, MidMarkerKind::Mid),
            (4, 1, MidMarkerKind::End),
            (5, 2, MidMarkerKind::Mid),
        ];
        for (n, mid_index, kind) in cases {
            let markers = select_markers(&n_entries(n)).unwrap();
            assert_eq!(markers.start_track, "t0", "n={}", n);
            assert_eq!(markers.end_track, format!("t{}", n - 1), "n={}", n);
            assert_eq!(markers.mid_track, format!("t{}", mid_index), "n={}", n);
            assert_eq!(markers.mid_marker_kind, kind, "n={}", n);
        }
    }

    #[test]
    fn test_select_markers_sorts_by_date() {
        let mut entries = n_entries(3);
        entries.reverse(); // t2, t1, t0 by recording order, dates still ascending t0..t2
        let markers = select_markers(&entries).unwrap();
        assert_eq!(markers.start_track, "t0");
        assert_eq!(markers.mid_track, "t1");
        assert_eq!(markers.end_track, "t2");
    }

    #[test]
    fn test_select_markers_empty() {
        assert!(matches!(
            select_markers(&[]),
            Err(TrailMetricsError::EmptyItinerary)
        ));
    }

    #[test]
    fn test_summarize_itinerary() {
        let stats = |d, g, l| TrackStats {
            total_distance_km: d,
            elevation_gain_m: g,
            elevation_loss_m: l,
        };
        let items = vec![
            (
                ItineraryEntry::new("d1", "X", "1", date(0)),
                stats(12.3, 450.0, 410.5),
            ),
            (
                ItineraryEntry::new("d2-a", "X", "2", date(24)),
                stats(15.1, 610.2, 580.0),
            ),
            (
                ItineraryEntry::new("d2-b", "X", "2-2", date(26)),
                stats(2.4, 180.0, 180.0),
            ),
        ];
        let summary = summarize_itinerary(&items).unwrap();
        // Day 2 counts once despite two recordings
        assert_eq!(summary.days, 2);
        assert_eq!(summary.total_distance_km, 29.8);
        assert_eq!(summary.elevation_gain_m, 1240.2);
        assert_eq!(summary.elevation_loss_m, 1170.5);
    }

    #[test]
    fn test_summarize_empty() {
        assert!(matches!(
            summarize_itinerary(&[]),
            Err(TrailMetricsError::EmptyItinerary)
        ));
    }
}
