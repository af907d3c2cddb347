// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Prayer identifiers, calculation settings and the angle model.
//!
//! Every prayer except Dhuhr is defined by the solar depression (or, for
//! Asr, shadow-length) angle at which it occurs and by the side of solar
//! noon it falls on:
//!
//! | Prayer | Angle | Direction |
//! |--------|-------|-----------|
//! | Fajr | `settings.fajr` | CCW |
//! | Sunrise | 0.833° | CCW |
//! | Dhuhr | — | none |
//! | Asr | per point, from the Asr factor | CW |
//! | Sunset | 0.833° | CW |
//! | Maghrib | `settings.maghrib`, or 0.833° when not positive | CW |
//! | Isha | `settings.isha` | CW |

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::IsochroneError;

/// Refraction plus solar semi-diameter at the horizon.
pub const HORIZON_DIP: f64 = 0.833;

// ═══════════════════════════════════════════════════════════════════════════
// Prayer
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Prayer {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Sunset,
    Maghrib,
    Isha,
}

impl Prayer {
    pub const ALL: [Prayer; 7] = [
        Prayer::Fajr,
        Prayer::Sunrise,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Sunset,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Prayer::Fajr => "fajr",
            Prayer::Sunrise => "sunrise",
            Prayer::Dhuhr => "dhuhr",
            Prayer::Asr => "asr",
            Prayer::Sunset => "sunset",
            Prayer::Maghrib => "maghrib",
            Prayer::Isha => "isha",
        }
    }
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Prayer {
    type Err = IsochroneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Prayer::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| IsochroneError::InvalidPrayer(s.to_owned()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════════════════════

/// A setting given either as a number or as free text such as `"90 min"`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum SettingValue {
    Number(f64),
    Text(String),
}

impl SettingValue {
    /// Numeric reading of the setting: numbers as-is, text through
    /// [`leading_number`].
    pub fn numeric(&self) -> f64 {
        match self {
            SettingValue::Number(n) => *n,
            SettingValue::Text(s) => leading_number(s),
        }
    }

    /// Whether the value is expressed in minutes (`"10 min"`).
    pub fn is_minutes(&self) -> bool {
        matches!(self, SettingValue::Text(s) if s.contains("min"))
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        SettingValue::Number(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Text(value.to_owned())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Text(value)
    }
}

/// Leading numeric token of `text`: optional sign, digits, at most one
/// decimal point. Anything unparseable reads as `0`.
pub fn leading_number(text: &str) -> f64 {
    let text = text.trim_start();
    let mut end = 0;
    let mut seen_point = false;
    for (i, ch) in text.char_indices() {
        match ch {
            '+' | '-' if i == 0 => {}
            '0'..='9' => {}
            '.' if !seen_point => seen_point = true,
            _ => break,
        }
        end = i + ch.len_utf8();
    }
    text[..end].parse().unwrap_or(0.0)
}

/// Shadow-length multiplier for Asr.
///
/// `"Standard"` → 1, `"Hanafi"` → 2, anything else is read as a number.
pub fn asr_factor(setting: &SettingValue) -> f64 {
    match setting {
        SettingValue::Text(s) if s == "Standard" => 1.0,
        SettingValue::Text(s) if s == "Hanafi" => 2.0,
        other => other.numeric(),
    }
}

/// Angle settings for the configurable prayers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PrayerSettings {
    pub fajr: SettingValue,
    pub isha: SettingValue,
    pub maghrib: SettingValue,
    pub asr: SettingValue,
}

impl PrayerSettings {
    /// The setting that drives `prayer`, if it has one.
    pub fn get(&self, prayer: Prayer) -> Option<&SettingValue> {
        match prayer {
            Prayer::Fajr => Some(&self.fajr),
            Prayer::Asr => Some(&self.asr),
            Prayer::Maghrib => Some(&self.maghrib),
            Prayer::Isha => Some(&self.isha),
            Prayer::Sunrise | Prayer::Dhuhr | Prayer::Sunset => None,
        }
    }
}

impl Default for PrayerSettings {
    fn default() -> Self {
        CalculationMethod::Mwl.settings()
    }
}

/// Published calculation conventions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CalculationMethod {
    /// Muslim World League.
    #[default]
    Mwl,
    /// Islamic Society of North America.
    Isna,
    /// Egyptian General Authority of Survey.
    Egypt,
    /// Umm Al-Qura, Makkah.
    Makkah,
    /// University of Islamic Sciences, Karachi.
    Karachi,
    /// Institute of Geophysics, University of Tehran.
    Tehran,
    /// Shia Ithna-Ashari, Leva Institute, Qum.
    Jafari,
}

impl CalculationMethod {
    pub fn settings(&self) -> PrayerSettings {
        let (fajr, isha, maghrib): (f64, SettingValue, SettingValue) = match self {
            CalculationMethod::Mwl => (18.0, 17.0.into(), "0 min".into()),
            CalculationMethod::Isna => (15.0, 15.0.into(), "0 min".into()),
            CalculationMethod::Egypt => (19.5, 17.5.into(), "0 min".into()),
            CalculationMethod::Makkah => (18.5, "90 min".into(), "0 min".into()),
            CalculationMethod::Karachi => (18.0, 18.0.into(), "0 min".into()),
            CalculationMethod::Tehran => (17.7, 14.0.into(), 4.5.into()),
            CalculationMethod::Jafari => (16.0, 14.0.into(), 4.0.into()),
        };
        PrayerSettings {
            fajr: fajr.into(),
            isha,
            maghrib,
            asr: "Standard".into(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Angle model
// ═══════════════════════════════════════════════════════════════════════════

/// Side of solar noon on which a prayer falls.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Before noon (morning side).
    Ccw,
    /// After noon (afternoon side).
    Cw,
    /// At noon: the isochrone degenerates to a meridian.
    None,
}

/// Resolved geometry of one prayer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PrayerAngleSpec {
    /// Depression angle in degrees; `None` for Dhuhr and Asr.
    pub angle: Option<f64>,
    pub direction: Direction,
    pub is_asr: bool,
    pub asr_factor: Option<f64>,
}

impl PrayerAngleSpec {
    /// Resolve a prayer against a settings bundle.
    pub fn resolve(prayer: Prayer, settings: &PrayerSettings) -> Self {
        let fixed = |angle: f64, direction| PrayerAngleSpec {
            angle: Some(angle),
            direction,
            is_asr: false,
            asr_factor: None,
        };
        match prayer {
            Prayer::Fajr => fixed(settings.fajr.numeric(), Direction::Ccw),
            Prayer::Sunrise => fixed(HORIZON_DIP, Direction::Ccw),
            Prayer::Dhuhr => PrayerAngleSpec {
                angle: None,
                direction: Direction::None,
                is_asr: false,
                asr_factor: None,
            },
            Prayer::Asr => PrayerAngleSpec {
                angle: None,
                direction: Direction::Cw,
                is_asr: true,
                asr_factor: Some(asr_factor(&settings.asr)),
            },
            Prayer::Sunset => fixed(HORIZON_DIP, Direction::Cw),
            Prayer::Maghrib => {
                let angle = settings.maghrib.numeric();
                fixed(if angle > 0.0 { angle } else { HORIZON_DIP }, Direction::Cw)
            }
            Prayer::Isha => fixed(settings.isha.numeric(), Direction::Cw),
        }
    }

    /// Resolve a prayer given by name.
    pub fn resolve_named(name: &str, settings: &PrayerSettings) -> Result<Self, IsochroneError> {
        Ok(Self::resolve(name.parse()?, settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names() {
        for prayer in Prayer::ALL {
            assert_eq!(prayer.name().parse::<Prayer>(), Ok(prayer));
        }
    }

    #[test]
    fn unknown_name_is_invalid_prayer() {
        assert_eq!(
            "tarawih".parse::<Prayer>(),
            Err(IsochroneError::InvalidPrayer("tarawih".into()))
        );
        assert!(PrayerAngleSpec::resolve_named("Fajr", &PrayerSettings::default()).is_err());
    }

    #[test]
    fn leading_number_token() {
        assert_eq!(leading_number("18"), 18.0);
        assert_eq!(leading_number("90 min"), 90.0);
        assert_eq!(leading_number("-4.5deg"), -4.5);
        assert_eq!(leading_number("+2"), 2.0);
        assert_eq!(leading_number("1.2.3"), 1.2);
        assert_eq!(leading_number(""), 0.0);
        assert_eq!(leading_number("min"), 0.0);
        assert_eq!(leading_number("-"), 0.0);
        assert_eq!(leading_number("Jafari"), 0.0);
    }

    #[test]
    fn asr_factor_resolution() {
        assert_eq!(asr_factor(&"Standard".into()), 1.0);
        assert_eq!(asr_factor(&"Hanafi".into()), 2.0);
        assert_eq!(asr_factor(&"1.5".into()), 1.5);
        assert_eq!(asr_factor(&SettingValue::Number(3.0)), 3.0);
    }

    #[test]
    fn default_table() {
        let settings = PrayerSettings::default();
        let fajr = PrayerAngleSpec::resolve(Prayer::Fajr, &settings);
        assert_eq!(fajr.angle, Some(18.0));
        assert_eq!(fajr.direction, Direction::Ccw);

        let isha = PrayerAngleSpec::resolve(Prayer::Isha, &settings);
        assert_eq!(isha.angle, Some(17.0));
        assert_eq!(isha.direction, Direction::Cw);

        let dhuhr = PrayerAngleSpec::resolve(Prayer::Dhuhr, &settings);
        assert_eq!(dhuhr.direction, Direction::None);
        assert_eq!(dhuhr.angle, None);

        let asr = PrayerAngleSpec::resolve(Prayer::Asr, &settings);
        assert!(asr.is_asr);
        assert_eq!(asr.asr_factor, Some(1.0));
        assert_eq!(asr.direction, Direction::Cw);

        let sunrise = PrayerAngleSpec::resolve(Prayer::Sunrise, &settings);
        assert_eq!(sunrise.angle, Some(HORIZON_DIP));
    }

    #[test]
    fn maghrib_falls_back_to_horizon() {
        let mwl = PrayerAngleSpec::resolve(Prayer::Maghrib, &PrayerSettings::default());
        assert_eq!(mwl.angle, Some(HORIZON_DIP));

        let tehran = CalculationMethod::Tehran.settings();
        let maghrib = PrayerAngleSpec::resolve(Prayer::Maghrib, &tehran);
        assert_eq!(maghrib.angle, Some(4.5));
    }

    #[test]
    fn minute_settings_are_flagged() {
        let makkah = CalculationMethod::Makkah.settings();
        assert!(makkah.isha.is_minutes());
        assert!(!makkah.fajr.is_minutes());
        assert_eq!(makkah.isha.numeric(), 90.0);
    }
}
