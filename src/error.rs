// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error taxonomy for isochrone requests.
//!
//! Only request-level failures live here. A point for which the prayer does
//! not occur is not an error: the solver returns `None` and the point is
//! dropped from its curve.

use thiserror::Error;

use crate::worker::RequestId;

/// Everything that can make a whole isochrone request fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IsochroneError {
    /// The prayer identifier is not one of the seven known prayers.
    #[error("invalid prayer: {0:?}")]
    InvalidPrayer(String),

    /// The range scan found no point of the region where the prayer occurs.
    #[error("no valid prayer time inside the requested bounds")]
    NoValidSamples,

    /// The discovered minute range holds fewer than two minutes.
    #[error("degenerate minute range [{min_minute}, {max_minute}]")]
    DegenerateRange { min_minute: i32, max_minute: i32 },

    #[error(
        "invalid bounds: lon [{min_lon}, {max_lon}], lat [{min_lat}, {max_lat}]"
    )]
    InvalidBounds {
        min_lon: f64,
        max_lon: f64,
        min_lat: f64,
        max_lat: f64,
    },

    #[error("invalid calendar date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// Curves need at least two latitudes.
    #[error("latitude sample count must be at least 2 (got {0})")]
    InvalidSampleCount(usize),

    /// The caller stopped waiting; the computation may still be running.
    #[error("request {id} timed out")]
    TimedOut { id: RequestId },

    /// The request was cancelled and the worker dropped its result.
    #[error("request {id} was cancelled")]
    Cancelled { id: RequestId },

    /// The background worker is gone and can no longer answer.
    #[error("isochrone worker unavailable")]
    WorkerUnavailable,
}
