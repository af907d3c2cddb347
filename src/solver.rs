// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Analytic inverse solver: clock time → longitude.
//!
//! For a fixed latitude `φ`, target clock time `T` (hours, in the reference
//! timezone `tz`) and solar position `(δ, eqt)` the prayer occurs at
//!
//! ```text
//! lon = 15 · (12 − eqt + tz − T) ∓ H
//! cos H = (−sin α − sin δ · sin φ) / (cos δ · cos φ)
//! ```
//!
//! with `−H` before noon (CCW) and `+H` after noon (CW). Dhuhr has no hour
//! angle term, which makes its isochrones meridians.
//!
//! # Refinement
//!
//! The solar position is first evaluated at the reference Julian day, not at
//! the meridian being solved for. [`LongitudeSolver::solve`] removes that bias
//! with a short fixed-point iteration: the reference day is shifted by the
//! longitude just found (`jd' = jd − lon/360`) and the point is solved again.
//! Declination and equation of time change slowly, so two iterations reach
//! sub-minute agreement. A failed iteration keeps the last valid longitude.

use log::trace;

use crate::ephemeris::{dacos, dacot, dcos, dsin, dtan, sun_position, SolarPosition};
use crate::julian::JulianDay;
use crate::prayer::{Direction, PrayerAngleSpec};

/// Denominators below this are treated as zero.
pub const DEGENERATE_COSINE: f64 = 1e-10;

/// Default number of refinement iterations.
pub const REFINEMENT_ITERATIONS: usize = 2;

/// Longitude of the meridian where clock time `time` equals mean solar noon
/// corrected by `eqt`: `15 · (12 − eqt + tz − T)`.
#[inline]
pub fn base_longitude(time: f64, equation_of_time: f64, timezone: f64) -> f64 {
    15.0 * (12.0 - equation_of_time + timezone - time)
}

/// Asr altitude at `latitude`: `−arccot(factor + tan|φ − δ|)`.
///
/// Depends on latitude and date, and is not monotonic in latitude.
pub fn asr_angle(factor: f64, latitude: f64, declination: f64) -> Option<f64> {
    let x = factor + dtan((latitude - declination).abs());
    if x == 0.0 || !x.is_finite() {
        return None;
    }
    Some(-dacot(x))
}

/// Hour angle (degrees, `0..=180`) at which the Sun reaches depression
/// `angle`, or `None` when it never does at this latitude on this date.
///
/// The cosine is never clamped: `|cos H| > 1` means no solution.
pub fn hour_angle(latitude: f64, sun: &SolarPosition, angle: f64) -> Option<f64> {
    let cos_lat = dcos(latitude);
    let cos_decl = dcos(sun.declination);
    if cos_lat.abs() < DEGENERATE_COSINE || cos_decl.abs() < DEGENERATE_COSINE {
        return None;
    }
    let cos_h = (-dsin(angle) - dsin(sun.declination) * dsin(latitude)) / (cos_decl * cos_lat);
    if !cos_h.is_finite() || cos_h.abs() > 1.0 {
        return None;
    }
    Some(dacos(cos_h))
}

/// Effective angle for `spec` at a point: the fixed angle, or the Asr angle
/// computed from the latitude. `None` for Dhuhr.
pub fn effective_angle(spec: &PrayerAngleSpec, latitude: f64, sun: &SolarPosition) -> Option<f64> {
    if spec.is_asr {
        asr_angle(spec.asr_factor.unwrap_or(1.0), latitude, sun.declination)
    } else {
        spec.angle
    }
}

/// Signed hour-angle offset in degrees for `spec` at `latitude`: negative
/// before noon, positive after, zero for Dhuhr.
pub fn hour_angle_offset(spec: &PrayerAngleSpec, latitude: f64, sun: &SolarPosition) -> Option<f64> {
    if spec.direction == Direction::None {
        return Some(0.0);
    }
    let angle = effective_angle(spec, latitude, sun)?;
    let h = hour_angle(latitude, sun, angle)?;
    Some(match spec.direction {
        Direction::Ccw => -h,
        _ => h,
    })
}

/// Single-point solve without refinement.
pub fn solve_longitude(
    latitude: f64,
    time: f64,
    sun: &SolarPosition,
    timezone: f64,
    spec: &PrayerAngleSpec,
) -> Option<f64> {
    let base = base_longitude(time, sun.equation_of_time, timezone);
    let offset = hour_angle_offset(spec, latitude, sun)?;
    Some(base + offset)
}

/// Solver bound to one prayer, reference day and timezone.
#[derive(Debug, Copy, Clone)]
pub struct LongitudeSolver {
    spec: PrayerAngleSpec,
    jd_base: JulianDay,
    timezone: f64,
    iterations: usize,
}

impl LongitudeSolver {
    pub fn new(spec: PrayerAngleSpec, jd_base: JulianDay, timezone: f64) -> Self {
        Self {
            spec,
            jd_base,
            timezone,
            iterations: REFINEMENT_ITERATIONS,
        }
    }

    /// Override the number of refinement iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    #[inline]
    pub fn spec(&self) -> &PrayerAngleSpec {
        &self.spec
    }

    #[inline]
    pub fn jd_base(&self) -> JulianDay {
        self.jd_base
    }

    #[inline]
    pub fn timezone(&self) -> f64 {
        self.timezone
    }

    /// Solar position with the reference day moved to `longitude`.
    #[inline]
    pub fn sun_at(&self, longitude: f64) -> SolarPosition {
        sun_position(self.jd_base.shifted_to_longitude(longitude))
    }

    /// Refined longitude at which the prayer falls on `time` at `latitude`.
    pub fn solve(&self, latitude: f64, time: f64) -> Option<f64> {
        self.solve_with(latitude, time, self.iterations)
    }

    /// As [`solve`](Self::solve) with an explicit iteration count.
    pub fn solve_with(&self, latitude: f64, time: f64, iterations: usize) -> Option<f64> {
        let sun = sun_position(self.jd_base);
        let mut lon = solve_longitude(latitude, time, &sun, self.timezone, &self.spec)?;
        for i in 0..iterations {
            let sun = self.sun_at(lon);
            match solve_longitude(latitude, time, &sun, self.timezone, &self.spec) {
                Some(next) => lon = next,
                None => {
                    trace!("refinement stopped at iteration {i} (lat {latitude:.4}, T {time:.4})");
                    break;
                }
            }
        }
        Some(lon)
    }
}
