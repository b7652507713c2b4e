//! Canonical display identifiers for countries, channels and cities.
//!
//! Countries and channels are complete partitions: anything unrecognised
//! lands in [`OTHER`]. Cities are not bucketed; a city named "unknown" is
//! dropped by the views that rank cities.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Fallback bucket label.
pub const OTHER: &str = "Other";

/// A market served by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Market {
    /// Numeric country id used by the shop platform.
    pub id: &'static str,
    /// ISO 3166-1 alpha-2 code.
    pub alpha2: &'static str,
    /// Display name.
    pub name: &'static str,
}

/// The fixed market table. Both code maps are views over this one list.
pub const MARKETS: [Market; 4] = [
    Market { id: "58", alpha2: "DK", name: "Denmark" },
    Market { id: "72", alpha2: "FI", name: "Finland" },
    Market { id: "160", alpha2: "NO", name: "Norway" },
    Market { id: "205", alpha2: "SE", name: "Sweden" },
];

/// Looks up a market by its numeric id.
pub fn market_by_id(id: &str) -> Option<&'static Market> {
    let id = id.trim();
    MARKETS.iter().find(|m| m.id == id)
}

/// Looks up a market by alpha-2 code, case-insensitively.
pub fn market_by_alpha2(code: &str) -> Option<&'static Market> {
    let code = code.trim();
    MARKETS.iter().find(|m| m.alpha2.eq_ignore_ascii_case(code))
}

/// Looks up a market by display name, case-insensitively.
pub fn market_by_name(name: &str) -> Option<&'static Market> {
    let name = name.trim();
    MARKETS.iter().find(|m| m.name.eq_ignore_ascii_case(name))
}

/// Maps a raw country value to its display name.
///
/// Accepts a numeric id, an alpha-2 code or an already canonical name.
/// Blank and unmapped values become [`OTHER`].
pub fn canonical_country(raw: &str) -> &'static str {
    let raw = raw.trim();
    if raw.is_empty() {
        return OTHER;
    }

    let market = if raw.bytes().all(|b| b.is_ascii_digit()) {
        market_by_id(raw)
    } else if raw.len() == 2 {
        market_by_alpha2(raw)
    } else {
        market_by_name(raw)
    };

    market.map(|m| m.name).unwrap_or(OTHER)
}

/// Sales channel of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    Telephone,
    Web,
    Email,
    Other,
}

impl Channel {
    /// Channels reported in breakdowns, in display order.
    pub const REPORTED: [Channel; 3] = [Channel::Telephone, Channel::Web, Channel::Email];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Telephone => "Telephone",
            Self::Web => "Web",
            Self::Email => "Email",
            Self::Other => OTHER,
        }
    }

    pub fn is_reported(&self) -> bool {
        !matches!(self, Self::Other)
    }
}

/// Maps a free-text transaction type to a channel, case-insensitively.
pub fn canonical_channel(raw: &str) -> Channel {
    match raw.trim().to_lowercase().as_str() {
        "telephone" | "phone" => Channel::Telephone,
        "web" | "online" => Channel::Web,
        "email" | "e-mail" => Channel::Email,
        _ => Channel::Other,
    }
}

static UNKNOWN_CITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bunknown\b").expect("valid unknown-city pattern"));

/// Trims a city, collapses inner whitespace and title-cases each word.
///
/// Word boundaries are whitespace and hyphens, so "NORRE-SNEDE" becomes
/// "Norre-Snede".
pub fn canonical_city(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut out = String::with_capacity(collapsed.len());
    let mut start_of_word = true;
    for c in collapsed.chars() {
        if start_of_word {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        start_of_word = c == ' ' || c == '-';
    }
    out
}

/// Whether a city must be excluded from city rankings.
///
/// Blank names count as unknown.
pub fn is_unknown_city(city: &str) -> bool {
    city.trim().is_empty() || UNKNOWN_CITY.is_match(city)
}

/// Trims and title-cases a gender label ("female" → "Female").
pub fn canonical_gender(raw: &str) -> Option<String> {
    let titled = canonical_city(raw);
    (!titled.is_empty()).then_some(titled)
}
