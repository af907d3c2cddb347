// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Low-precision solar position.
//!
//! Mean anomaly, mean longitude and a two-term equation of centre give the
//! ecliptic longitude of the Sun; declination and right ascension follow from
//! a linearly drifting obliquity. Accuracy is about one arc-minute, well
//! inside the one-minute resolution of the isochrone bands.
//!
//! All angles are in degrees; the equation of time is in hours.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::julian::JulianDay;

/// Declination and equation of time for one Julian day.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolarPosition {
    /// Degrees north (+) or south (−) of the celestial equator.
    pub declination: f64,
    /// Apparent minus mean solar time, in hours.
    pub equation_of_time: f64,
}

/// Solar declination and equation of time at `jd`.
pub fn sun_position(jd: JulianDay) -> SolarPosition {
    let d = jd.days_since_j2000().value();

    let g = fix_angle(357.529 + 0.985_600_28 * d);
    let q = fix_angle(280.459 + 0.985_647_36 * d);
    let l = fix_angle(q + 1.915 * dsin(g) + 0.020 * dsin(2.0 * g));
    let e = 23.439 - 0.000_000_36 * d;

    let ra = datan2(dcos(e) * dsin(l), dcos(l)) / 15.0;

    SolarPosition {
        declination: dasin(dsin(e) * dsin(l)),
        equation_of_time: wrap_hour_signed(q / 15.0 - ra),
    }
}

// ── Range reduction ───────────────────────────────────────────────────────

/// Wrap an angle into `[0, 360)`.
#[inline]
pub fn fix_angle(angle: f64) -> f64 {
    fix(angle, 360.0)
}

/// Wrap an hour value into `[0, 24)`.
#[inline]
pub fn fix_hour(hour: f64) -> f64 {
    fix(hour, 24.0)
}

/// Wrap an hour difference into `[-12, 12)`.
///
/// `q` and the right ascension wrap at different moments around the March
/// equinox; their difference must stay a few minutes, never a full day.
#[inline]
pub fn wrap_hour_signed(hour: f64) -> f64 {
    fix_hour(hour + 12.0) - 12.0
}

#[inline]
fn fix(value: f64, period: f64) -> f64 {
    let wrapped = value - period * (value / period).floor();
    if wrapped < 0.0 {
        wrapped + period
    } else {
        wrapped
    }
}

// ── Degree trigonometry ───────────────────────────────────────────────────

#[inline]
pub(crate) fn dsin(deg: f64) -> f64 {
    deg.to_radians().sin()
}

#[inline]
pub(crate) fn dcos(deg: f64) -> f64 {
    deg.to_radians().cos()
}

#[inline]
pub(crate) fn dtan(deg: f64) -> f64 {
    deg.to_radians().tan()
}

#[inline]
pub(crate) fn dasin(x: f64) -> f64 {
    x.asin().to_degrees()
}

#[inline]
pub(crate) fn dacos(x: f64) -> f64 {
    x.acos().to_degrees()
}

#[inline]
pub(crate) fn datan2(y: f64, x: f64) -> f64 {
    y.atan2(x).to_degrees()
}

#[inline]
pub(crate) fn dacot(x: f64) -> f64 {
    (1.0 / x).atan().to_degrees()
}
