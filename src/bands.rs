// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Band construction.
//!
//! For every minute `m` of a [`SampleRange`] two boundary curves are solved,
//! one at `(m − 0.5)/60` and one at `(m + 0.5)/60` hours, across a fixed
//! ladder of latitudes. The band for `m` is the strip between them: the area
//! where the prayer time rounds to `m`.
//!
//! Points whose longitude falls outside the bounds are dropped, and a band
//! whose curves keep fewer than two points each is skipped. Missing bands at
//! the edge of a region are a normal outcome, not an error.

use chrono::NaiveTime;
use log::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geo::{mean_point, Curve, GeoBounds, LonLat};
use crate::sampler::SampleRange;
use crate::solver::LongitudeSolver;

/// Fill colours, light to dark.
pub const PALETTE: [&str; 10] = [
    "#E3F2FD", "#BBDEFB", "#90CAF9", "#64B5F6", "#42A5F5", "#2196F3", "#1E88E5", "#1976D2",
    "#1565C0", "#0D47A1",
];

/// Minimum number of in-bounds points a boundary curve needs.
pub const MIN_CURVE_POINTS: usize = 2;

/// One filled strip of constant rounded prayer time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Band {
    /// Closed ring: `curve_low ++ reverse(curve_high)`, first point repeated.
    pub polygon: Vec<LonLat>,
    /// Minute of day this band stands for.
    pub minute: i32,
    /// Index into [`PALETTE`], cyclic in range order.
    pub color_index: usize,
    /// `HH:MM`, present only when the label fits inside the map.
    pub label: Option<String>,
    pub label_position: Option<LonLat>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub curve_low: Curve,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub curve_high: Curve,
}

impl Band {
    /// Assemble a band from its two boundary curves.
    ///
    /// Returns `None` if either curve has fewer than [`MIN_CURVE_POINTS`].
    pub fn from_curves(
        minute: i32,
        color_index: usize,
        curve_low: Curve,
        curve_high: Curve,
        bounds: &GeoBounds,
        label_margin: f64,
    ) -> Option<Self> {
        if curve_low.len() < MIN_CURVE_POINTS || curve_high.len() < MIN_CURVE_POINTS {
            return None;
        }

        let mut polygon = Vec::with_capacity(curve_low.len() + curve_high.len() + 1);
        polygon.extend_from_slice(&curve_low);
        polygon.extend(curve_high.iter().rev().copied());
        polygon.push(curve_low[0]);

        let label_position = mean_point(curve_low.iter().chain(curve_high.iter()))
            .filter(|c| bounds.shrunk(label_margin).strictly_contains(*c));
        let label = label_position.map(|_| format_minute_label(minute));

        Some(Self {
            polygon,
            minute,
            color_index: color_index % PALETTE.len(),
            label,
            label_position,
            curve_low,
            curve_high,
        })
    }

    /// Hex fill colour.
    #[inline]
    pub fn color(&self) -> &'static str {
        PALETTE[self.color_index % PALETTE.len()]
    }
}

/// `HH:MM` for a minute of day; wraps past midnight in both directions.
pub fn format_minute_label(minute: i32) -> String {
    let secs = minute.rem_euclid(24 * 60) as u32 * 60;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// Solve one curve at `time` (hours) over `latitudes`, keeping in-bounds points.
pub fn solve_curve(solver: &LongitudeSolver, latitudes: &[f64], time: f64, bounds: &GeoBounds) -> Curve {
    latitudes
        .iter()
        .filter_map(|&lat| {
            solver
                .solve(lat, time)
                .filter(|&lon| bounds.contains_lon(lon))
                .map(|lon| LonLat::new(lon, lat))
        })
        .collect()
}

/// Build every band of `range` in minute order.
pub fn build_bands(
    solver: &LongitudeSolver,
    bounds: &GeoBounds,
    range: SampleRange,
    latitude_samples: usize,
    label_margin: f64,
) -> Vec<Band> {
    let latitudes = bounds.latitude_ladder(latitude_samples);
    let bands: Vec<Band> = range
        .minutes()
        .enumerate()
        .filter_map(|(idx, minute)| {
            let m = f64::from(minute);
            let low = solve_curve(solver, &latitudes, (m - 0.5) / 60.0, bounds);
            let high = solve_curve(solver, &latitudes, (m + 0.5) / 60.0, bounds);
            let band = Band::from_curves(minute, idx, low, high, bounds, label_margin);
            if band.is_none() {
                trace!("minute {minute}: too few in-bounds points, skipped");
            }
            band
        })
        .collect();
    debug!("built {} of {} bands", bands.len(), range.len());
    bands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::julian::julian_day;
    use crate::prayer::{Prayer, PrayerAngleSpec, PrayerSettings};
    use crate::sampler::discover_range;

    fn paris() -> GeoBounds {
        GeoBounds::new(2.0, 3.0, 48.0, 49.0).unwrap()
    }

    fn solver(prayer: Prayer) -> LongitudeSolver {
        let spec = PrayerAngleSpec::resolve(prayer, &PrayerSettings::default());
        LongitudeSolver::new(spec, julian_day(2024, 6, 21), 1.0)
    }

    #[test]
    fn labels() {
        assert_eq!(format_minute_label(0), "00:00");
        assert_eq!(format_minute_label(771), "12:51");
        assert_eq!(format_minute_label(1439), "23:59");
        assert_eq!(format_minute_label(1440 + 65), "01:05");
        assert_eq!(format_minute_label(-1), "23:59");
    }

    #[test]
    fn ring_is_closed_and_ordered() {
        let b = GeoBounds::new(0.0, 10.0, 0.0, 10.0).unwrap();
        let low = vec![LonLat::new(4.0, 2.0), LonLat::new(4.0, 8.0)];
        let high = vec![LonLat::new(6.0, 2.0), LonLat::new(6.0, 8.0)];
        let band = Band::from_curves(600, 3, low, high, &b, 0.05).unwrap();
        assert_eq!(
            band.polygon,
            vec![
                LonLat::new(4.0, 2.0),
                LonLat::new(4.0, 8.0),
                LonLat::new(6.0, 8.0),
                LonLat::new(6.0, 2.0),
                LonLat::new(4.0, 2.0),
            ]
        );
        assert_eq!(band.label.as_deref(), Some("10:00"));
        assert_eq!(band.label_position, Some(LonLat::new(5.0, 5.0)));
        assert_eq!(band.color(), "#64B5F6");
    }

    #[test]
    fn too_few_points_skip_band() {
        let b = GeoBounds::new(0.0, 10.0, 0.0, 10.0).unwrap();
        let low = vec![LonLat::new(4.0, 2.0)];
        let high = vec![LonLat::new(6.0, 2.0), LonLat::new(6.0, 8.0)];
        assert!(Band::from_curves(600, 0, low, high, &b, 0.05).is_none());
    }

    #[test]
    fn label_dropped_near_edge() {
        let b = GeoBounds::new(0.0, 10.0, 0.0, 10.0).unwrap();
        let low = vec![LonLat::new(0.1, 2.0), LonLat::new(0.1, 8.0)];
        let high = vec![LonLat::new(0.3, 2.0), LonLat::new(0.3, 8.0)];
        let band = Band::from_curves(600, 0, low, high, &b, 0.05).unwrap();
        assert!(band.label.is_none());
        assert!(band.label_position.is_none());
        assert_eq!(band.polygon.len(), 5);
    }

    #[test]
    fn color_cycles() {
        let b = GeoBounds::new(0.0, 10.0, 0.0, 10.0).unwrap();
        let low = vec![LonLat::new(4.0, 2.0), LonLat::new(4.0, 8.0)];
        let high = vec![LonLat::new(6.0, 2.0), LonLat::new(6.0, 8.0)];
        let band = Band::from_curves(600, 12, low, high, &b, 0.05).unwrap();
        assert_eq!(band.color_index, 2);
    }

    #[test]
    fn dhuhr_bands_are_vertical() {
        let s = solver(Prayer::Dhuhr);
        let range = discover_range(&s, &paris(), 11, 2).unwrap();
        let bands = build_bands(&s, &paris(), range, 200, 0.05);
        assert!(!bands.is_empty());
        for band in &bands {
            for curve in [&band.curve_low, &band.curve_high] {
                let lon0 = curve[0].lon;
                assert!(curve.iter().all(|p| (p.lon - lon0).abs() < 1e-9));
            }
            // One minute of clock time is a quarter degree of longitude.
            let width = band.curve_low[0].lon - band.curve_high[0].lon;
            assert!((width - 0.25).abs() < 0.01, "{width}");
        }
        let minutes: Vec<i32> = bands.iter().map(|b| b.minute).collect();
        assert!(minutes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn fajr_curves_stay_in_bounds() {
        let s = solver(Prayer::Fajr);
        let b = paris();
        let range = discover_range(&s, &b, 11, 2).unwrap();
        let bands = build_bands(&s, &b, range, 200, 0.05);
        assert!(!bands.is_empty());
        for band in &bands {
            assert!(band.curve_low.len() >= 2 && band.curve_high.len() >= 2);
            assert!(band.polygon.iter().all(|p| b.contains(*p)));
            assert_eq!(band.polygon.first(), band.polygon.last());
            assert!(band.curve_low.windows(2).all(|w| w[0].lat < w[1].lat));
        }
    }
}
