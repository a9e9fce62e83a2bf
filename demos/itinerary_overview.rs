//! Walkthrough of a synthetic three-day itinerary: per-track statistics,
//! main/side classification and summary-marker selection.
//!
//! Run with: cargo run --example itinerary_overview

use chrono::{DateTime, Duration, TimeZone, Utc};
use trail_metrics::{
    classify_day_tracks, compute_stats_batch, select_markers, summarize_itinerary, ActivityKind,
    ItineraryEntry, StatsConfig, Track, TrackPoint, TrackStats,
};

/// A straight-line hike heading north with a steady climb.
fn make_track(id: &str, start: DateTime<Utc>, start_lat: f64, climb_m: f64) -> Track {
    let points: Vec<TrackPoint> = (0..60i64)
        .map(|i| {
            TrackPoint::new(
                start_lat + i as f64 * 0.001,
                11.0,
                1200.0 + climb_m * (i as f64 / 59.0),
                start + Duration::minutes(i),
                1.2,
            )
        })
        .collect();
    Track::new(id, points, ActivityKind::Hiking)
}

fn main() {
    let day1 = Utc.with_ymd_and_hms(2024, 7, 14, 8, 0, 0).unwrap();
    let day2 = day1 + Duration::days(1);
    let day3 = day1 + Duration::days(2);

    // Day 2 has the main stage plus a summit side trip
    let tracks = vec![
        make_track("tauern/day-1.gpx", day1, 47.00, 650.0),
        make_track("tauern/day-2.gpx", day2, 47.06, 820.0),
        make_track("tauern/day-2-summit.gpx", day2 + Duration::hours(6), 47.12, 300.0),
        make_track("tauern/day-3.gpx", day3, 47.13, 540.0),
    ];

    let entries = vec![
        ItineraryEntry::new("tauern/day-1.gpx", "Tauern Hoehenweg", "1", day1),
        ItineraryEntry::new("tauern/day-2.gpx", "Tauern Hoehenweg", "2", day2),
        ItineraryEntry::new(
            "tauern/day-2-summit.gpx",
            "Tauern Hoehenweg",
            "2-2",
            day2 + Duration::hours(6),
        ),
        ItineraryEntry::new("tauern/day-3.gpx", "Tauern Hoehenweg", "3", day3),
    ];

    let config = StatsConfig::default();

    println!("Itinerary Overview Example\n");

    // Per-track statistics
    println!("1. Track statistics:");
    let results = compute_stats_batch(&tracks, &config);
    let mut items: Vec<(ItineraryEntry, TrackStats)> = Vec::new();
    for (entry, result) in entries.iter().zip(&results) {
        match result {
            Ok(stats) => {
                println!(
                    "   {}: {:.1} km, +{:.1} m / -{:.1} m",
                    entry.track_id,
                    stats.total_distance_km,
                    stats.elevation_gain_m,
                    stats.elevation_loss_m
                );
                items.push((entry.clone(), *stats));
            }
            Err(err) => println!("   {}: FAILED ({})", entry.track_id, err),
        }
    }

    // Main vs side tracks
    println!("\n2. Main/side classification:");
    let labels = classify_day_tracks(&entries).unwrap();
    for entry in &entries {
        let role = if labels[&entry.track_id] { "main" } else { "side" };
        println!("   {} (day {}): {}", entry.track_id, entry.day_label, role);
    }

    // Itinerary markers
    println!("\n3. Summary markers:");
    let markers = select_markers(&entries).unwrap();
    println!("   start: {}", markers.start_track);
    println!("   mid:   {} ({:?})", markers.mid_track, markers.mid_marker_kind);
    println!("   end:   {}", markers.end_track);

    // Whole-itinerary summary
    println!("\n4. Itinerary summary:");
    let summary = summarize_itinerary(&items).unwrap();
    println!(
        "   {} days, {:.1} km, +{:.1} m / -{:.1} m",
        summary.days,
        summary.total_distance_km,
        summary.elevation_gain_m,
        summary.elevation_loss_m
    );
}
