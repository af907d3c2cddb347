// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Engine tunables.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::solver::REFINEMENT_ITERATIONS;

/// Knobs shared by every request an engine or worker serves.
///
/// The defaults reproduce the reference behaviour: an 11×11 range scan,
/// two refinement passes, two minutes of padding around the discovered range
/// and labels kept 5 % away from the map edge.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct EngineConfig {
    /// Points per axis of the range-discovery grid.
    pub sample_grid: usize,
    /// Fixed-point passes applied to every solved longitude.
    pub refinement_iterations: usize,
    /// Minutes added on both sides of the discovered band range.
    pub band_padding_minutes: i32,
    /// Minutes added on both sides of the discovered isoline range.
    pub isoline_padding_minutes: i32,
    /// Inward margin (fraction of width/height) a band label must clear.
    pub label_margin: f64,
    /// Inward margin an isoline label must clear.
    pub isoline_label_margin: f64,
    /// Only minutes divisible by this get an isoline label.
    pub isoline_label_every: i32,
    /// Latitude ladder used by the synchronous fallback path.
    pub fallback_latitude_samples: usize,
    /// How long a caller waits for the background worker.
    pub timeout_ms: u64,
}

impl EngineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_grid: 11,
            refinement_iterations: REFINEMENT_ITERATIONS,
            band_padding_minutes: 2,
            isoline_padding_minutes: 5,
            label_margin: 0.05,
            isoline_label_margin: 0.02,
            isoline_label_every: 5,
            fallback_latitude_samples: 60,
            timeout_ms: 30_000,
        }
    }
}
