// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Range discovery.
//!
//! Before building any curve the engine needs to know which clock minutes
//! actually occur inside the bounds. A small grid is scanned in the forward
//! direction (longitude → time): the time at a grid point is
//! `12 − eqt + tz − lon/15` moved by `∓H/15` for prayers with a direction.
//! This is an approximation used only to bound the minute range; the curves
//! themselves come from [`LongitudeSolver`].

use std::ops::RangeInclusive;

use log::debug;

use crate::error::IsochroneError;
use crate::geo::GeoBounds;
use crate::solver::{hour_angle_offset, LongitudeSolver};

/// Inclusive range of minutes of day for which bands are built.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SampleRange {
    pub min_minute: i32,
    pub max_minute: i32,
}

impl SampleRange {
    /// `[⌊min⌋ − padding, ⌈max⌉ + padding]` over the sampled minutes.
    ///
    /// Fails with [`IsochroneError::NoValidSamples`] on an empty sample set
    /// and with [`IsochroneError::DegenerateRange`] when fewer than two
    /// distinct minutes remain.
    pub fn from_samples(samples: &[f64], padding: i32) -> Result<Self, IsochroneError> {
        let (min, max) = samples
            .iter()
            .copied()
            .filter(|t| t.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, t| match acc {
                None => Some((t, t)),
                Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
            })
            .ok_or(IsochroneError::NoValidSamples)?;

        let range = Self {
            min_minute: min.floor() as i32 - padding,
            max_minute: max.ceil() as i32 + padding,
        };
        if range.len() < 2 {
            return Err(IsochroneError::DegenerateRange {
                min_minute: range.min_minute,
                max_minute: range.max_minute,
            });
        }
        Ok(range)
    }

    /// Number of minutes in the range.
    pub fn len(&self) -> usize {
        (self.max_minute - self.min_minute + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn minutes(&self) -> RangeInclusive<i32> {
        self.min_minute..=self.max_minute
    }
}

/// Approximate clock time (hours) of the prayer at one point, or `None` if
/// it does not occur there.
pub fn approximate_time(solver: &LongitudeSolver, longitude: f64, latitude: f64) -> Option<f64> {
    let sun = solver.sun_at(longitude);
    let base = 12.0 - sun.equation_of_time + solver.timezone() - longitude / 15.0;
    let offset = hour_angle_offset(solver.spec(), latitude, &sun)?;
    Some(base + offset / 15.0)
}

/// Scan a `grid × grid` lattice over `bounds` and derive the minute range.
pub fn discover_range(
    solver: &LongitudeSolver,
    bounds: &GeoBounds,
    grid: usize,
    padding: i32,
) -> Result<SampleRange, IsochroneError> {
    let samples: Vec<f64> = bounds
        .grid(grid)
        .filter_map(|p| approximate_time(solver, p.lon, p.lat))
        .map(|hours| hours * 60.0)
        .collect();
    debug!(
        "range scan: {} of {} grid points valid",
        samples.len(),
        grid * grid
    );
    let range = SampleRange::from_samples(&samples, padding)?;
    debug!("minute range [{}, {}]", range.min_minute, range.max_minute);
    Ok(range)
}
