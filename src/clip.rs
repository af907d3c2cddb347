// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Clipping bands against an outline.
//!
//! Polygon boolean operations are not implemented here. Callers plug in a
//! geometry backend through [`Clipper`]; [`clip_band`] only decides what to
//! do with its answer.

use log::warn;

use crate::bands::Band;
use crate::geo::{GeoBounds, LonLat};

/// Geometry backend able to intersect two rings and locate a centroid.
pub trait Clipper {
    type Error: std::error::Error;

    /// Intersection of two closed rings. `Ok(None)` means they do not overlap.
    fn intersect(&self, a: &[LonLat], b: &[LonLat]) -> Result<Option<Vec<LonLat>>, Self::Error>;

    /// Area centroid of a closed ring.
    fn centroid(&self, ring: &[LonLat]) -> Result<LonLat, Self::Error>;
}

/// Clip `band` against `outline`.
///
/// - overlap: the ring is replaced by the intersection and a present label
///   moves to the clipped centroid, if that still lies inside `label_area`;
/// - no overlap: `None`, the band is not visible;
/// - backend failure: the band is returned unclipped.
pub fn clip_band<C: Clipper>(
    band: Band,
    outline: &[LonLat],
    clipper: &C,
    label_area: &GeoBounds,
) -> Option<Band> {
    let ring = match clipper.intersect(&band.polygon, outline) {
        Ok(Some(ring)) => ring,
        Ok(None) => return None,
        Err(e) => {
            warn!("clipping band {} failed, keeping it unclipped: {e}", band.minute);
            return Some(band);
        }
    };

    let label_position = match band.label_position {
        Some(_) => match clipper.centroid(&ring) {
            Ok(c) => Some(c).filter(|c| label_area.strictly_contains(*c)),
            Err(e) => {
                warn!("centroid of band {} failed: {e}", band.minute);
                band.label_position
            }
        },
        None => None,
    };

    Some(Band {
        polygon: ring,
        label: label_position.and(band.label),
        label_position,
        ..band
    })
}
