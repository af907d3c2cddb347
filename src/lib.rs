// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Prayer-time isochrones
//!
//! This crate computes, for a geographic box and a calendar date, the curves
//! along which a given prayer falls on the same clock minute, and turns them
//! into filled bands ready to draw on a map.
//!
//! # Pipeline
//!
//! | Step | Item |
//! |------|------|
//! | Julian day of the date | [`julian_day`], [`CalendarDate`] |
//! | Sun declination and equation of time | [`sun_position`] |
//! | Prayer → depression angle and direction | [`PrayerAngleSpec`] |
//! | Clock time → longitude at one latitude | [`LongitudeSolver`] |
//! | Minutes that occur inside the box | [`discover_range`] |
//! | One polygon per minute | [`build_bands`], [`Band`] |
//!
//! [`compute_isochrones`] runs the whole pipeline for an
//! [`IsochroneRequest`]. [`IsochroneWorker`] runs it off the caller's thread,
//! and [`compute_isochrones_blocking`] is the coarser synchronous fallback.
//!
//! # Example
//!
//! ```
//! use isochron::{compute_isochrones, CalendarDate, EngineConfig, GeoBounds, IsochroneRequest};
//!
//! let request = IsochroneRequest::new(
//!     "dhuhr",
//!     GeoBounds::new(2.0, 3.0, 48.0, 49.0)?,
//!     CalendarDate::new(2024, 6, 21)?,
//! )
//! .with_timezone(1.0);
//!
//! let bands = compute_isochrones(&request, &EngineConfig::default())?;
//! assert!(bands.iter().all(|b| b.polygon.first() == b.polygon.last()));
//! # Ok::<(), isochron::IsochroneError>(())
//! ```
//!
//! # Accuracy
//!
//! The solar model is the low-precision almanac series (about one arc-minute
//! in declination). Results are meant for whole-minute maps below roughly
//! 60° of latitude; above that, twilight prayers may not occur at all and the
//! corresponding bands are simply absent.

pub mod bands;
pub mod clip;
mod config;
pub mod engine;
pub mod ephemeris;
mod error;
pub mod geo;
pub mod isolines;
mod julian;
pub mod prayer;
pub mod sampler;
pub mod solver;
pub mod worker;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use bands::{build_bands, format_minute_label, Band, PALETTE};
pub use clip::{clip_band, Clipper};
pub use config::EngineConfig;
pub use engine::{
    compute_isochrones, compute_isochrones_blocking, compute_isolines, IsochroneRequest,
    IsochroneResponse, DEFAULT_LATITUDE_SAMPLES,
};
pub use ephemeris::{sun_position, SolarPosition};
pub use error::IsochroneError;
pub use geo::{Curve, GeoBounds, LonLat};
pub use isolines::{build_isolines, Isoline, IsolineLabels};
pub use julian::{julian_day, CalendarDate, JulianDay};
pub use prayer::{CalculationMethod, Direction, Prayer, PrayerAngleSpec, PrayerSettings, SettingValue};
pub use sampler::{discover_range, SampleRange};
pub use solver::LongitudeSolver;
pub use worker::{CancellationToken, IsochroneWorker, PendingIsochrones, RequestId};
