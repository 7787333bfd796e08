//! `Accept-Language` header parsing.
//!
//! Malformed tokens are dropped and bad quality values are repaired; parsing
//! never fails.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// A language tag advertised by the client, with its quality weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcceptedTag {
    /// Lower-cased tag (e.g., "en-us")
    pub tag: String,

    /// Quality value in `(0, 1]`
    pub quality: f32,
}

// Letters and hyphens only, 1-8 characters per subtag (cached)
static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

fn tag_regex() -> &'static Regex {
    TAG_REGEX.get_or_init(|| {
        Regex::new(r"^[a-z]{1,8}(?:-[a-z]{1,8})*$").expect("tag pattern is valid")
    })
}

/// Parse an `Accept-Language` header into tags ordered by descending quality.
///
/// Ties keep their left-to-right header position. A missing `q` parameter,
/// or one that is not a finite number, counts as `1.0`; numbers outside
/// `[0, 1]` are clamped. Tags weighted `q=0` are "not acceptable" and dropped.
pub fn parse_accept_language(header: Option<&str>) -> Vec<AcceptedTag> {
    let Some(header) = header else {
        return Vec::new();
    };

    let mut tags: Vec<AcceptedTag> = header.split(',').filter_map(parse_token).collect();

    // sort_by is stable, so equal qualities keep header order
    tags.sort_by(|a, b| b.quality.total_cmp(&a.quality));
    tags
}

fn parse_token(token: &str) -> Option<AcceptedTag> {
    let mut parts = token.split(';');
    let tag = parts.next()?.trim().to_lowercase();
    if !tag_regex().is_match(&tag) {
        return None;
    }

    let quality = parts
        .map(str::trim)
        .find_map(|param| param.strip_prefix("q="))
        .map(parse_quality)
        .unwrap_or(1.0);
    if quality <= 0.0 {
        return None;
    }

    Some(AcceptedTag { tag, quality })
}

fn parse_quality(raw: &str) -> f32 {
    match raw.trim().parse::<f32>() {
        Ok(q) if q.is_finite() => q.clamp(0.0, 1.0),
        _ => 1.0,
    }
}
