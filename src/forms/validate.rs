use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,6}$").expect("email pattern"));

static MOBILE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10,15}$").expect("mobile pattern"));

pub const MIN_PASSWORD_LEN: usize = 6;

/// Shape check for `local@domain.tld`, case-insensitive
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(&email.to_lowercase())
}

/// 10 to 15 ASCII digits, nothing else
pub fn is_valid_mobile(mobile: &str) -> bool {
    MOBILE.is_match(mobile)
}

/// Length in UTF-16 code units, the way browser form checks count it
pub fn is_short_password(raw: &str) -> bool {
    raw.encode_utf16().count() < MIN_PASSWORD_LEN
}

/// Transport encoding for password fields.
///
/// Standard Base64 of the UTF-8 text. Reversible on purpose: this only keeps
/// the raw text out of request bodies and logs, it is not a hash.
pub fn encode_password(raw: &str) -> String {
    STANDARD.encode(raw.as_bytes())
}

/// Inverse of [`encode_password`]
pub fn decode_password(encoded: &str) -> Option<String> {
    let bytes = STANDARD.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}

/// Parse an optional port field; blank means "not provided"
pub fn parse_port(raw: &str) -> Result<Option<u16>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<u16>()
        .map(Some)
        .map_err(|_| "Port must be a number between 0 and 65535".to_string())
}

/// Per-field validation messages, keyed by wire field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    /// Record `message` for `field` when `value` is blank; true if it was
    pub fn require(&mut self, field: &'static str, value: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, message);
            return true;
        }
        false
    }

    /// Like [`require`](Self::require) but without trimming, for secrets
    /// where whitespace is content
    pub fn require_present(&mut self, field: &'static str, value: &str, message: &str) -> bool {
        if value.is_empty() {
            self.add(field, message);
            return true;
        }
        false
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Typing into a field clears its message
    pub fn clear_field(&mut self, field: &str) {
        self.fields.remove(field);
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }
}
