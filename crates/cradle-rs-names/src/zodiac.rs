//! Birth-date zodiac lookup and the example names shown for each sign.
//!
//! Only the six signs from Aries through Virgo are modeled. Dates outside
//! their ranges resolve to [`ZodiacSign::Aries`]; use
//! [`modeled_zodiac_sign`] to tell the fallback apart from a real match.

use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Gender tag attached to an example name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Boy,
    Girl,
    Unisex,
}

/// Example name listed under a zodiac sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZodiacName {
    pub name: &'static str,
    pub gender: Gender,
    /// Short gloss of the name's meaning.
    pub meaning: &'static str,
    /// Language or culture of origin.
    pub origin: &'static str,
}

/// Modeled zodiac signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
}

/// Inclusive (month, day) bounds per sign.
const RANGES: &[(ZodiacSign, (u32, u32), (u32, u32))] = &[
    (ZodiacSign::Aries, (3, 21), (4, 19)),
    (ZodiacSign::Taurus, (4, 20), (5, 20)),
    (ZodiacSign::Gemini, (5, 21), (6, 20)),
    (ZodiacSign::Cancer, (6, 21), (7, 22)),
    (ZodiacSign::Leo, (7, 23), (8, 22)),
    (ZodiacSign::Virgo, (8, 23), (9, 22)),
];

impl ZodiacSign {
    /// All modeled signs in calendar order.
    pub const ALL: [ZodiacSign; 6] = [
        Self::Aries,
        Self::Taurus,
        Self::Gemini,
        Self::Cancer,
        Self::Leo,
        Self::Virgo,
    ];

    /// Lowercase identifier, e.g. `"leo"`.
    pub fn id(self) -> &'static str {
        match self {
            Self::Aries => "aries",
            Self::Taurus => "taurus",
            Self::Gemini => "gemini",
            Self::Cancer => "cancer",
            Self::Leo => "leo",
            Self::Virgo => "virgo",
        }
    }

    /// Capitalized name, e.g. `"Leo"`.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
        }
    }

    /// Human-readable date range.
    pub fn date_range(self) -> &'static str {
        match self {
            Self::Aries => "March 21 - April 19",
            Self::Taurus => "April 20 - May 20",
            Self::Gemini => "May 21 - June 20",
            Self::Cancer => "June 21 - July 22",
            Self::Leo => "July 23 - August 22",
            Self::Virgo => "August 23 - September 22",
        }
    }

    /// Classical element: Fire, Earth, Air or Water.
    pub fn element(self) -> &'static str {
        match self {
            Self::Aries | Self::Leo => "Fire",
            Self::Taurus | Self::Virgo => "Earth",
            Self::Gemini => "Air",
            Self::Cancer => "Water",
        }
    }

    /// Static example names for this sign.
    pub fn example_names(self) -> &'static [ZodiacName] {
        match self {
            Self::Aries => ARIES_NAMES,
            Self::Taurus => TAURUS_NAMES,
            Self::Gemini => GEMINI_NAMES,
            Self::Cancer => CANCER_NAMES,
            Self::Leo => LEO_NAMES,
            Self::Virgo => VIRGO_NAMES,
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ZodiacSign {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|sign| sign.id().eq_ignore_ascii_case(value))
            .ok_or_else(|| format!("unknown zodiac sign: {value}"))
    }
}

/// Resolve the sign for a birth date, falling back to Aries.
pub fn zodiac_sign(date: NaiveDate) -> ZodiacSign {
    modeled_zodiac_sign(date).unwrap_or_else(|| {
        debug!("date outside modeled zodiac ranges, using aries (date={date})");
        ZodiacSign::Aries
    })
}

/// Resolve the sign for a birth date when it falls in a modeled range.
pub fn modeled_zodiac_sign(date: NaiveDate) -> Option<ZodiacSign> {
    let key = (date.month(), date.day());
    RANGES
        .iter()
        .find(|(_, start, end)| *start <= key && key <= *end)
        .map(|(sign, _, _)| *sign)
}

const fn zodiac_name(
    name: &'static str,
    gender: Gender,
    meaning: &'static str,
    origin: &'static str,
) -> ZodiacName {
    ZodiacName {
        name,
        gender,
        meaning,
        origin,
    }
}

const ARIES_NAMES: &[ZodiacName] = &[
    zodiac_name("Aiden", Gender::Boy, "Little fire", "Irish"),
    zodiac_name("Blaze", Gender::Boy, "Flame", "English"),
    zodiac_name("Ember", Gender::Girl, "Spark of fire", "English"),
    zodiac_name("Scarlett", Gender::Girl, "Red", "English"),
];

const TAURUS_NAMES: &[ZodiacName] = &[
    zodiac_name("Flora", Gender::Girl, "Flower", "Latin"),
    zodiac_name("Rowan", Gender::Unisex, "Little redhead", "Irish"),
    zodiac_name("Sage", Gender::Unisex, "Wise", "Latin"),
    zodiac_name("Taurin", Gender::Boy, "Bull-like", "Latin"),
];

const GEMINI_NAMES: &[ZodiacName] = &[
    zodiac_name("Castor", Gender::Boy, "Beaver", "Greek"),
    zodiac_name("Iris", Gender::Girl, "Rainbow", "Greek"),
    zodiac_name("Skye", Gender::Unisex, "Sky", "Scottish"),
    zodiac_name("Thomas", Gender::Boy, "Twin", "Aramaic"),
];

const CANCER_NAMES: &[ZodiacName] = &[
    zodiac_name("Luna", Gender::Girl, "Moon", "Latin"),
    zodiac_name("Marina", Gender::Girl, "Of the sea", "Latin"),
    zodiac_name("Dylan", Gender::Boy, "Son of the sea", "Welsh"),
    zodiac_name("River", Gender::Unisex, "Flowing stream", "English"),
];

const LEO_NAMES: &[ZodiacName] = &[
    zodiac_name("Leo", Gender::Boy, "Lion", "Latin"),
    zodiac_name("Aurelia", Gender::Girl, "Golden", "Latin"),
    zodiac_name("Sol", Gender::Unisex, "Sun", "Latin"),
    zodiac_name("Regina", Gender::Girl, "Queen", "Latin"),
];

const VIRGO_NAMES: &[ZodiacName] = &[
    zodiac_name("Ceres", Gender::Girl, "Goddess of the harvest", "Latin"),
    zodiac_name("Sophia", Gender::Girl, "Wisdom", "Greek"),
    zodiac_name("August", Gender::Boy, "Venerable", "Latin"),
    zodiac_name("Hazel", Gender::Girl, "Hazelnut tree", "English"),
];
