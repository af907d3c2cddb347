// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Calendar dates and Julian days.
//!
//! [`CalendarDate`] is a validated proleptic-Gregorian date with no time
//! component. [`JulianDay`] stores a single [`Days`] quantity counted from
//! the start of the Julian Period; the value produced from a calendar date
//! is referenced to 0h UT of that date.
//!
//! The solar model shifts the reference day by the longitude being solved
//! for ([`JulianDay::shifted_to_longitude`]), which is why positions are
//! recomputed from a `JulianDay` instead of being cached per date.

use chrono::{Datelike, NaiveDate};
use qtty::Days;
use std::ops::{Add, AddAssign, Sub, SubAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::IsochroneError;

// ═══════════════════════════════════════════════════════════════════════════
// CalendarDate
// ═══════════════════════════════════════════════════════════════════════════

/// A calendar day `(year, month, day)`.
///
/// Construction goes through [`chrono::NaiveDate`], so impossible dates
/// (`2023-02-29`, month 13, ...) are rejected up front.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "Ymd", into = "Ymd")
)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, IsochroneError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(IsochroneError::InvalidDate { year, month, day })
    }

    #[inline]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    #[inline]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    #[inline]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Julian day at 0h UT of this date.
    #[inline]
    pub fn julian_day(&self) -> JulianDay {
        julian_day(self.year(), self.month(), self.day())
    }

    /// The underlying chrono date.
    #[inline]
    pub const fn naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl std::fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

/// Wire shape `{year, month, day}`.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct Ymd {
    year: i32,
    month: u32,
    day: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<Ymd> for CalendarDate {
    type Error = IsochroneError;

    fn try_from(value: Ymd) -> Result<Self, Self::Error> {
        Self::new(value.year, value.month, value.day)
    }
}

#[cfg(feature = "serde")]
impl From<CalendarDate> for Ymd {
    fn from(date: CalendarDate) -> Self {
        Ymd {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// JulianDay
// ═══════════════════════════════════════════════════════════════════════════

/// A continuous day count since the start of the Julian Period.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct JulianDay {
    quantity: Days,
}

impl JulianDay {
    /// J2000.0 epoch: 2000-01-01T12:00:00 (JD 2 451 545.0).
    pub const J2000: Self = Self::new(2_451_545.0);

    /// Create from a raw scalar (days).
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self {
            quantity: Days::new(value),
        }
    }

    /// Create from a [`Days`] quantity.
    #[inline]
    pub const fn from_days(days: Days) -> Self {
        Self { quantity: days }
    }

    /// The underlying quantity in days.
    #[inline]
    pub const fn quantity(&self) -> Days {
        self.quantity
    }

    /// The underlying scalar value in days.
    #[inline]
    pub const fn value(&self) -> f64 {
        self.quantity.value()
    }

    /// Days elapsed since J2000.0 (negative before the epoch).
    #[inline]
    pub fn days_since_j2000(&self) -> Days {
        *self - Self::J2000
    }

    /// Reference day moved to a meridian: `jd - lon / (15 · 24)`.
    ///
    /// East longitudes reach a given clock time earlier in UT, so the shift
    /// is subtracted.
    #[inline]
    pub fn shifted_to_longitude(&self, longitude_deg: f64) -> Self {
        *self - Days::new(longitude_deg / 360.0)
    }
}

/// Gregorian calendar date → Julian day at 0h UT.
///
/// January and February count as months 13 and 14 of the previous year
/// before the Gregorian leap correction `B = 2 - A + ⌊A/4⌋` is applied.
pub fn julian_day(year: i32, month: u32, day: u32) -> JulianDay {
    let (y, m) = if month <= 2 {
        (year as f64 - 1.0, month as f64 + 12.0)
    } else {
        (year as f64, month as f64)
    };
    let a = (y / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();
    JulianDay::new(
        (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + day as f64 + b - 1524.5,
    )
}

// ── Display ───────────────────────────────────────────────────────────────

impl std::fmt::Display for JulianDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JD {}", self.quantity)
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────

impl Add<Days> for JulianDay {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Days) -> Self::Output {
        Self::from_days(self.quantity + rhs)
    }
}

impl AddAssign<Days> for JulianDay {
    #[inline]
    fn add_assign(&mut self, rhs: Days) {
        self.quantity += rhs;
    }
}

impl Sub<Days> for JulianDay {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Days) -> Self::Output {
        Self::from_days(self.quantity - rhs)
    }
}

impl SubAssign<Days> for JulianDay {
    #[inline]
    fn sub_assign(&mut self, rhs: Days) {
        self.quantity -= rhs;
    }
}

impl Sub for JulianDay {
    type Output = Days;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.quantity - rhs.quantity
    }
}

impl From<CalendarDate> for JulianDay {
    fn from(date: CalendarDate) -> Self {
        date.julian_day()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
