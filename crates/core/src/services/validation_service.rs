use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::models::settings::Settings;

/// Parse an ISO date (`YYYY-MM-DD`, midnight UTC) or an RFC 3339 timestamp.
/// Returns `None` for empty or malformed input.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc())
}

/// Format as the persisted `YYYY-MM-DD` form.
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a money amount as typed into a form.
///
/// Everything but digits and the first `.` is stripped, then the fraction is
/// cut to two decimals. Empty or non-finite input is rejected.
pub fn parse_money(input: &str) -> Option<f64> {
    let mut cleaned = String::with_capacity(input.len());
    let mut seen_dot = false;
    for c in input.chars() {
        if c.is_ascii_digit() {
            cleaned.push(c);
        } else if c == '.' && !seen_dot {
            seen_dot = true;
            cleaned.push(c);
        }
    }

    let clamped = match cleaned.split_once('.') {
        Some((int, frac)) => {
            let frac: String = frac.chars().take(2).collect();
            if frac.is_empty() {
                int.to_string()
            } else {
                format!("{int}.{frac}")
            }
        }
        None => cleaned,
    };
    if clamped.is_empty() || clamped == "." {
        return None;
    }
    let value: f64 = clamped.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// First visible glyph of `input`: one char plus any trailing variation
/// selectors, skin-tone modifiers and ZWJ-joined chars (so "👩‍💻" stays whole).
pub fn first_glyph(input: &str) -> Option<String> {
    let mut chars = input.trim().chars().peekable();
    let mut glyph = String::new();
    glyph.push(chars.next()?);

    while let Some(&c) = chars.peek() {
        if is_glyph_extender(c) {
            glyph.push(c);
            chars.next();
        } else if c == '\u{200D}' {
            glyph.push(c);
            chars.next();
            match chars.next() {
                Some(joined) => glyph.push(joined),
                None => break,
            }
        } else {
            break;
        }
    }
    Some(glyph)
}

fn is_glyph_extender(c: char) -> bool {
    matches!(c,
        '\u{FE00}'..='\u{FE0F}'        // variation selectors
        | '\u{1F3FB}'..='\u{1F3FF}'    // skin tones
        | '\u{20E3}'                   // combining keycap
        | '\u{E0020}'..='\u{E007F}'    // tag sequences
    )
}

/// Asset form input, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetDraft {
    /// Set when editing an existing asset; the id never changes on save
    pub id: Option<String>,
    pub name: String,
    pub icon: String,
    pub price: String,
    pub active_from: String,
    pub active_to: String,
    pub recycle_price: String,
    pub tags: Vec<String>,
}

/// Validate a draft and build the asset to save.
///
/// Rules: name required; price a valid amount; `active_from` required;
/// `active_to`, when given, not before `active_from`; recycle price optional
/// (empty = 0) and not above the price. A new asset takes its trimmed name as id.
pub fn validate(draft: &AssetDraft, settings: &Settings) -> Result<Asset, CoreError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(CoreError::ValidationError("Name is required".into()));
    }

    let price = parse_money(&draft.price).ok_or_else(|| {
        CoreError::ValidationError(format!("Invalid price '{}'", draft.price.trim()))
    })?;

    if draft.active_from.trim().is_empty() {
        return Err(CoreError::ValidationError("Active-from date is required".into()));
    }
    let active_from = parse_date(&draft.active_from).ok_or_else(|| {
        CoreError::ValidationError(format!("Invalid active-from date '{}'", draft.active_from.trim()))
    })?;

    let active_to = if draft.active_to.trim().is_empty() {
        None
    } else {
        let to = parse_date(&draft.active_to).ok_or_else(|| {
            CoreError::ValidationError(format!("Invalid active-to date '{}'", draft.active_to.trim()))
        })?;
        if to < active_from {
            return Err(CoreError::ValidationError(format!(
                "Active-to date ({}) must not be before active-from date ({})",
                format_date(to),
                format_date(active_from)
            )));
        }
        Some(to)
    };

    let recycle_price = if draft.recycle_price.trim().is_empty() {
        0.0
    } else {
        parse_money(&draft.recycle_price).ok_or_else(|| {
            CoreError::ValidationError(format!(
                "Invalid recycle price '{}'",
                draft.recycle_price.trim()
            ))
        })?
    };
    if recycle_price > price {
        return Err(CoreError::ValidationError(format!(
            "Recycle price ({recycle_price}) must not exceed price ({price})"
        )));
    }

    let icon = first_glyph(&draft.icon).unwrap_or_else(|| settings.default_icon.clone());

    let mut tags: Vec<String> = Vec::with_capacity(draft.tags.len());
    for tag in &draft.tags {
        let tag = tag.trim();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }

    let id = draft
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(name)
        .to_string();

    Ok(Asset {
        id,
        name: name.to_string(),
        icon,
        price,
        active_from,
        active_to,
        recycle_price,
        tags,
    })
}
