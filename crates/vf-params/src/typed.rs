//! Typed, defaulted lookups.
//!
//! Invalid values never abort a run: a warning names the key, the raw value
//! and the default, and the default is returned.

use crate::store::ParameterStore;
use tracing::warn;

/// Parse a base-10 `i32`. The whole trimmed string must be consumed.
pub fn parse_int(raw: &str) -> Option<i32> {
    let value: i64 = raw.trim().parse().ok()?;
    i32::try_from(value).ok()
}

/// Parse an `f64`. The whole trimmed string must be consumed.
///
/// Out-of-range literals are rejected: overflow to infinity, and a nonzero
/// mantissa that underflows to zero. `inf` and `nan` spelled out are accepted.
pub fn parse_double(raw: &str) -> Option<f64> {
    let text = raw.trim();
    let value: f64 = text.parse().ok()?;
    if value.is_infinite() && !text.to_ascii_lowercase().contains("inf") {
        return None;
    }
    if value == 0.0 {
        let mantissa = text.split(['e', 'E']).next().unwrap_or(text);
        if mantissa.bytes().any(|b| (b'1'..=b'9').contains(&b)) {
            return None;
        }
    }
    Some(value)
}

/// Parse a boolean word, case-insensitively.
pub fn parse_bool(raw: &str) -> Option<bool> {
    const TRUE_WORDS: [&str; 4] = ["1", "true", "yes", "on"];
    const FALSE_WORDS: [&str; 4] = ["0", "false", "no", "off"];

    let text = raw.trim();
    if TRUE_WORDS.iter().any(|w| text.eq_ignore_ascii_case(w)) {
        Some(true)
    } else if FALSE_WORDS.iter().any(|w| text.eq_ignore_ascii_case(w)) {
        Some(false)
    } else {
        None
    }
}

impl ParameterStore {
    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        let Some(raw) = self.get(key) else {
            return default;
        };
        parse_int(raw).unwrap_or_else(|| {
            warn!("Invalid int for '{key}' ('{raw}'), using default {default}");
            default
        })
    }

    pub fn get_double(&self, key: &str, default: f64) -> f64 {
        let Some(raw) = self.get(key) else {
            return default;
        };
        parse_double(raw).unwrap_or_else(|| {
            warn!("Invalid double for '{key}' ('{raw}'), using default {default}");
            default
        })
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        let Some(raw) = self.get(key) else {
            return default;
        };
        parse_bool(raw).unwrap_or_else(|| {
            warn!("Invalid bool for '{key}' ('{raw}'), using default {default}");
            default
        })
    }
}
