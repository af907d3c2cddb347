// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Line-mode isochrones: one open curve per whole minute.
//!
//! Same solver and latitude ladder as [`bands`](crate::bands), but each curve
//! is solved at the exact target time `m/60` instead of the two half-minute
//! boundaries. Only every [`EngineConfig::isoline_label_every`]-th minute is
//! labelled, at the middle point of its curve.
//!
//! [`EngineConfig::isoline_label_every`]: crate::EngineConfig::isoline_label_every

use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bands::{format_minute_label, solve_curve, MIN_CURVE_POINTS};
use crate::geo::{Curve, GeoBounds, LonLat};
use crate::sampler::SampleRange;
use crate::solver::LongitudeSolver;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Isoline {
    pub minute: i32,
    pub points: Curve,
    pub label: Option<String>,
    pub label_position: Option<LonLat>,
}

/// Labelling rules for [`build_isolines`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct IsolineLabels {
    /// Only minutes divisible by this are labelled. Zero disables labels.
    pub every: i32,
    /// Inward margin, as a fraction of width and height, the label must clear.
    pub margin: f64,
}

impl Isoline {
    fn new(minute: i32, points: Curve, bounds: &GeoBounds, labels: IsolineLabels) -> Option<Self> {
        if points.len() < MIN_CURVE_POINTS {
            return None;
        }
        let label_position = (labels.every > 0 && minute.rem_euclid(labels.every) == 0)
            .then(|| points[points.len() / 2])
            .filter(|p| bounds.shrunk(labels.margin).contains(*p));
        Some(Self {
            minute,
            label: label_position.map(|_| format_minute_label(minute)),
            label_position,
            points,
        })
    }
}

/// Build one isoline per minute of `range` that keeps at least two points.
pub fn build_isolines(
    solver: &LongitudeSolver,
    bounds: &GeoBounds,
    range: SampleRange,
    latitude_samples: usize,
    labels: IsolineLabels,
) -> Vec<Isoline> {
    let latitudes = bounds.latitude_ladder(latitude_samples);
    let lines: Vec<Isoline> = range
        .minutes()
        .filter_map(|minute| {
            let points = solve_curve(solver, &latitudes, f64::from(minute) / 60.0, bounds);
            Isoline::new(minute, points, bounds, labels)
        })
        .collect();
    debug!("built {} of {} isolines", lines.len(), range.len());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::julian::julian_day;
    use crate::prayer::{Prayer, PrayerAngleSpec, PrayerSettings};
    use crate::sampler::discover_range;

    const LABELS: IsolineLabels = IsolineLabels {
        every: 5,
        margin: 0.02,
    };

    #[test]
    fn only_round_minutes_are_labelled() {
        let b = GeoBounds::new(0.0, 10.0, 0.0, 10.0).unwrap();
        let pts = vec![
            LonLat::new(5.0, 1.0),
            LonLat::new(5.0, 5.0),
            LonLat::new(5.0, 9.0),
        ];
        let labelled = Isoline::new(600, pts.clone(), &b, LABELS).unwrap();
        assert_eq!(labelled.label.as_deref(), Some("10:00"));
        assert_eq!(labelled.label_position, Some(LonLat::new(5.0, 5.0)));

        let plain = Isoline::new(601, pts, &b, LABELS).unwrap();
        assert!(plain.label.is_none());
    }

    #[test]
    fn middle_point_outside_margin_is_unlabelled() {
        let b = GeoBounds::new(0.0, 10.0, 0.0, 10.0).unwrap();
        let pts = vec![LonLat::new(0.1, 1.0), LonLat::new(0.1, 5.0)];
        let line = Isoline::new(600, pts, &b, LABELS).unwrap();
        assert!(line.label.is_none());
        assert!(Isoline::new(600, vec![LonLat::new(5.0, 5.0)], &b, LABELS).is_none());
    }

    #[test]
    fn dhuhr_isolines_step_a_quarter_degree() {
        let spec = PrayerAngleSpec::resolve(Prayer::Dhuhr, &PrayerSettings::default());
        let s = LongitudeSolver::new(spec, julian_day(2024, 6, 21), 1.0);
        let b = GeoBounds::new(2.0, 3.0, 48.0, 49.0).unwrap();
        let range = discover_range(&s, &b, 11, 5).unwrap();
        let lines = build_isolines(&s, &b, range, 50, LABELS);
        assert!(lines.len() >= 3);
        for w in lines.windows(2) {
            assert_eq!(w[1].minute, w[0].minute + 1);
            let step = w[0].points[0].lon - w[1].points[0].lon;
            assert!((step - 0.25).abs() < 0.01, "{step}");
        }
    }
}
