//! HTML rendering with maud.

pub mod layout;
pub mod listing;
pub mod status;

use maganghub_core::catalog::ListingQuery;

/// Colour scheme, carried in the `theme` query parameter. Dark unless asked otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(t) if t.eq_ignore_ascii_case("light") => Self::Light,
            _ => Self::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// First letters of the first two words, upper-cased: `"staf administrasi umum"` → `"SA"`.
pub fn initials(title: &str) -> String {
    title
        .split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// `"KOTA BANDUNG"` → `"Kota Bandung"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Link to the catalog page for `query`, keeping the theme.
pub fn listing_href(query: &ListingQuery, theme: Theme) -> String {
    let mut pairs = query.to_pairs();
    if theme == Theme::Light {
        pairs.push(("theme", theme.as_str().to_string()));
    }
    format!("/lowongan?{}", encode_pairs(&pairs))
}

pub fn status_href(email: Option<&str>, theme: Theme) -> String {
    let mut pairs = Vec::new();
    if let Some(email) = email.filter(|e| !e.is_empty()) {
        pairs.push(("email", email.to_string()));
    }
    if theme == Theme::Light {
        pairs.push(("theme", theme.as_str().to_string()));
    }
    if pairs.is_empty() {
        "/status".to_string()
    } else {
        format!("/status?{}", encode_pairs(&pairs))
    }
}

fn encode_pairs(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
