// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Geographic primitives: points, curves and the request envelope.

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::IsochroneError;

/// A `(longitude, latitude)` pair in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    #[inline]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<(f64, f64)> for LonLat {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self { lon, lat }
    }
}

// Points travel as `[lon, lat]` arrays.
#[cfg(feature = "serde")]
impl Serialize for LonLat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [self.lon, self.lat].serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for LonLat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [lon, lat] = <[f64; 2]>::deserialize(deserializer)?;
        Ok(Self { lon, lat })
    }
}

/// Ordered, open polyline: one point per sampled latitude that survived the
/// bounds filter.
pub type Curve = Vec<LonLat>;

/// Arithmetic mean of a set of points.
pub fn mean_point<'a, I>(points: I) -> Option<LonLat>
where
    I: IntoIterator<Item = &'a LonLat>,
{
    let (mut lon, mut lat, mut n) = (0.0, 0.0, 0usize);
    for p in points {
        lon += p.lon;
        lat += p.lat;
        n += 1;
    }
    (n > 0).then(|| LonLat::new(lon / n as f64, lat / n as f64))
}

// ═══════════════════════════════════════════════════════════════════════════
// GeoBounds
// ═══════════════════════════════════════════════════════════════════════════

/// Sampling and clipping envelope.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct GeoBounds {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl GeoBounds {
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Result<Self, IsochroneError> {
        let bounds = Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Both ranges must be non-empty, with longitudes in `[-180, 180]` and
    /// latitudes in `[-90, 90]`. NaN fails every comparison.
    pub fn validate(&self) -> Result<(), IsochroneError> {
        let lon_ok = -180.0 <= self.min_lon && self.min_lon < self.max_lon && self.max_lon <= 180.0;
        let lat_ok = -90.0 <= self.min_lat && self.min_lat < self.max_lat && self.max_lat <= 90.0;
        if lon_ok && lat_ok {
            Ok(())
        } else {
            Err(IsochroneError::InvalidBounds {
                min_lon: self.min_lon,
                max_lon: self.max_lon,
                min_lat: self.min_lat,
                max_lat: self.max_lat,
            })
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    #[inline]
    pub fn center(&self) -> LonLat {
        LonLat::new(
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    /// Closed-interval test on the longitude axis.
    #[inline]
    pub fn contains_lon(&self, lon: f64) -> bool {
        self.min_lon <= lon && lon <= self.max_lon
    }

    /// Bounds pulled in by `fraction` of the width and height on each side.
    pub fn shrunk(&self, fraction: f64) -> Self {
        let dx = fraction * self.width();
        let dy = fraction * self.height();
        Self {
            min_lon: self.min_lon + dx,
            max_lon: self.max_lon - dx,
            min_lat: self.min_lat + dy,
            max_lat: self.max_lat - dy,
        }
    }

    /// Open-interval containment on both axes.
    pub fn strictly_contains(&self, p: LonLat) -> bool {
        self.min_lon < p.lon && p.lon < self.max_lon && self.min_lat < p.lat && p.lat < self.max_lat
    }

    /// Closed-interval containment on both axes.
    pub fn contains(&self, p: LonLat) -> bool {
        self.contains_lon(p.lon) && self.min_lat <= p.lat && p.lat <= self.max_lat
    }

    /// `count` evenly spaced latitudes from `min_lat` to `max_lat` inclusive.
    pub fn latitude_ladder(&self, count: usize) -> Vec<f64> {
        linspace(self.min_lat, self.max_lat, count)
    }

    /// `count × count` grid of points covering the bounds, row by row.
    pub fn grid(&self, count: usize) -> impl Iterator<Item = LonLat> + '_ {
        let lats = linspace(self.min_lat, self.max_lat, count);
        let lons = linspace(self.min_lon, self.max_lon, count);
        lats.into_iter()
            .flat_map(move |lat| lons.clone().into_iter().map(move |lon| LonLat::new(lon, lat)))
    }
}

/// `count` evenly spaced values over `[start, end]`, endpoints included.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| {
                    if i == count - 1 {
                        end
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}
