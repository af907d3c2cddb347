// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Whole-request pipeline.
//!
//! ```text
//! request ─► resolve prayer ─► validate ─► scan range ─► build bands
//! ```
//!
//! Every call is pure: nothing is cached between requests and nothing is
//! shared between threads, so the same request always yields the same bands.

use log::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bands::{build_bands, Band};
use crate::config::EngineConfig;
use crate::error::IsochroneError;
use crate::geo::GeoBounds;
use crate::isolines::{build_isolines, Isoline, IsolineLabels};
use crate::julian::CalendarDate;
use crate::prayer::{Prayer, PrayerAngleSpec, PrayerSettings};
use crate::sampler::discover_range;
use crate::solver::LongitudeSolver;

/// Latitude ladder size used when a request does not name one.
pub const DEFAULT_LATITUDE_SAMPLES: usize = 200;

#[cfg(feature = "serde")]
fn default_latitude_samples() -> usize {
    DEFAULT_LATITUDE_SAMPLES
}

/// One isochrone computation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct IsochroneRequest {
    /// Prayer identifier, one of the lowercase names of [`Prayer`](crate::Prayer).
    pub prayer: String,
    pub bounds: GeoBounds,
    pub date: CalendarDate,
    /// Fixed offset from UTC in hours. Defaults to the nominal zone of the
    /// bounds' centre meridian.
    #[cfg_attr(feature = "serde", serde(default))]
    pub timezone: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub settings: PrayerSettings,
    #[cfg_attr(feature = "serde", serde(default = "default_latitude_samples"))]
    pub latitude_sample_count: usize,
}

impl IsochroneRequest {
    pub fn new(prayer: impl Into<String>, bounds: GeoBounds, date: CalendarDate) -> Self {
        Self {
            prayer: prayer.into(),
            bounds,
            date,
            timezone: None,
            settings: PrayerSettings::default(),
            latitude_sample_count: DEFAULT_LATITUDE_SAMPLES,
        }
    }

    pub fn with_timezone(mut self, hours: f64) -> Self {
        self.timezone = Some(hours);
        self
    }

    pub fn with_settings(mut self, settings: PrayerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_latitude_samples(mut self, count: usize) -> Self {
        self.latitude_sample_count = count;
        self
    }

    /// The request's timezone, or `round(centre longitude / 15)`.
    pub fn effective_timezone(&self) -> f64 {
        self.timezone
            .unwrap_or_else(|| (self.bounds.center().lon / 15.0).round())
    }
}

/// Wire answer: either the bands or an error message.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum IsochroneResponse {
    Bands { bands: Vec<Band> },
    Error { error: String },
}

impl From<Result<Vec<Band>, IsochroneError>> for IsochroneResponse {
    fn from(result: Result<Vec<Band>, IsochroneError>) -> Self {
        match result {
            Ok(bands) => Self::Bands { bands },
            Err(e) => Self::Error {
                error: e.to_string(),
            },
        }
    }
}

/// Resolve and validate a request into a ready solver.
///
/// The prayer is resolved first so an unknown name fails before anything
/// else is looked at.
fn prepare(request: &IsochroneRequest, config: &EngineConfig) -> Result<LongitudeSolver, IsochroneError> {
    let prayer: Prayer = request.prayer.parse()?;
    if let Some(setting) = request.settings.get(prayer) {
        if setting.is_minutes() && setting.numeric() != 0.0 {
            warn!("{prayer} setting {setting:?} is an offset in minutes, read as an angle");
        }
    }
    let spec = PrayerAngleSpec::resolve(prayer, &request.settings);
    request.bounds.validate()?;
    if request.latitude_sample_count < 2 {
        return Err(IsochroneError::InvalidSampleCount(request.latitude_sample_count));
    }

    let timezone = request.effective_timezone();
    debug!(
        "{} on {} over {:?}, tz {:+}",
        request.prayer, request.date, request.bounds, timezone
    );
    Ok(LongitudeSolver::new(spec, request.date.julian_day(), timezone)
        .with_iterations(config.refinement_iterations))
}

fn bands_with_samples(
    request: &IsochroneRequest,
    config: &EngineConfig,
    latitude_samples: usize,
) -> Result<Vec<Band>, IsochroneError> {
    let solver = prepare(request, config)?;
    let range = discover_range(
        &solver,
        &request.bounds,
        config.sample_grid,
        config.band_padding_minutes,
    )?;
    Ok(build_bands(
        &solver,
        &request.bounds,
        range,
        latitude_samples,
        config.label_margin,
    ))
}

/// Compute the band set of a request at its own latitude density.
pub fn compute_isochrones(
    request: &IsochroneRequest,
    config: &EngineConfig,
) -> Result<Vec<Band>, IsochroneError> {
    bands_with_samples(request, config, request.latitude_sample_count)
}

/// Synchronous fallback for callers without a background worker.
///
/// Runs on the calling thread with the coarser
/// [`EngineConfig::fallback_latitude_samples`] density (never finer than the
/// request asks for), so it blocks for a fraction of the full computation.
pub fn compute_isochrones_blocking(
    request: &IsochroneRequest,
    config: &EngineConfig,
) -> Result<Vec<Band>, IsochroneError> {
    let samples = request
        .latitude_sample_count
        .min(config.fallback_latitude_samples.max(2));
    bands_with_samples(request, config, samples)
}

/// Line-mode variant: one curve per minute instead of filled bands.
pub fn compute_isolines(
    request: &IsochroneRequest,
    config: &EngineConfig,
) -> Result<Vec<Isoline>, IsochroneError> {
    let solver = prepare(request, config)?;
    let range = discover_range(
        &solver,
        &request.bounds,
        config.sample_grid,
        config.isoline_padding_minutes,
    )?;
    Ok(build_isolines(
        &solver,
        &request.bounds,
        range,
        request.latitude_sample_count,
        IsolineLabels {
            every: config.isoline_label_every,
            margin: config.isoline_label_margin,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prayer: &str) -> IsochroneRequest {
        IsochroneRequest::new(
            prayer,
            GeoBounds::new(2.0, 3.0, 48.0, 49.0).unwrap(),
            CalendarDate::new(2024, 6, 21).unwrap(),
        )
        .with_timezone(1.0)
    }

    #[test]
    fn default_timezone_follows_centre_meridian() {
        let mut req = request("dhuhr");
        req.timezone = None;
        assert_eq!(req.effective_timezone(), 0.0);
        req.bounds = GeoBounds::new(30.0, 40.0, 20.0, 30.0).unwrap();
        assert_eq!(req.effective_timezone(), 2.0);
        req.bounds = GeoBounds::new(-80.0, -70.0, 20.0, 30.0).unwrap();
        assert_eq!(req.effective_timezone(), -5.0);
    }

    #[test]
    fn unknown_prayer_wins_over_bad_bounds() {
        let mut req = request("tarawih");
        req.bounds.max_lon = req.bounds.min_lon;
        assert_eq!(
            compute_isochrones(&req, &EngineConfig::default()),
            Err(IsochroneError::InvalidPrayer("tarawih".into()))
        );
    }

    #[test]
    fn rejects_short_ladder() {
        let req = request("dhuhr").with_latitude_samples(1);
        assert_eq!(
            compute_isochrones(&req, &EngineConfig::default()),
            Err(IsochroneError::InvalidSampleCount(1))
        );
    }

    #[test]
    fn blocking_path_uses_coarser_ladder() {
        let cfg = EngineConfig::default();
        let full = compute_isochrones(&request("fajr"), &cfg).unwrap();
        let coarse = compute_isochrones_blocking(&request("fajr"), &cfg).unwrap();
        assert!(!coarse.is_empty());
        let points = |bands: &[Band]| bands.iter().map(|b| b.polygon.len()).sum::<usize>();
        assert!(points(&coarse) < points(&full));
    }

    #[test]
    fn response_from_result() {
        let ok: IsochroneResponse = Ok(Vec::new()).into();
        assert_eq!(ok, IsochroneResponse::Bands { bands: Vec::new() });
        let err: IsochroneResponse = Err(IsochroneError::NoValidSamples).into();
        assert!(matches!(err, IsochroneResponse::Error { .. }));
    }

    #[test]
    fn isolines_for_dhuhr() {
        let lines = compute_isolines(&request("dhuhr"), &EngineConfig::default()).unwrap();
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().any(|l| l.minute == 770 && l.label.as_deref() == Some("12:50")));
    }
}
