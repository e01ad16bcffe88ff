//! Parsers for per-part command line overrides.

use common::{CanvasSize, Tint};
use scene::PartCategory;

fn split_assignment(text: &str) -> Result<(&str, &str), String> {
    let (name, value) = text
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", text))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing part name in '{}'", text));
    }
    Ok((name, value.trim()))
}

/// Parse `NAME=N` into a depth override.
pub fn parse_depth(text: &str) -> Result<(String, i32), String> {
    let (name, value) = split_assignment(text)?;
    let depth = value
        .parse::<i32>()
        .map_err(|err| format!("invalid depth '{}': {}", value, err))?;
    Ok((name.to_string(), depth))
}

/// Parse `NAME=R,G,B[,A]` into a tint override.
pub fn parse_tint(text: &str) -> Result<(String, Tint), String> {
    let (name, value) = split_assignment(text)?;
    let tint = Tint::parse(value).ok_or_else(|| format!("invalid tint '{}', expected R,G,B[,A]", value))?;
    Ok((name.to_string(), tint))
}

pub fn parse_category(text: &str) -> Result<PartCategory, String> {
    PartCategory::from_name(text.trim()).ok_or_else(|| {
        let known: Vec<&str> = PartCategory::ALL.iter().map(PartCategory::as_str).collect();
        format!("unknown category '{}', expected one of: {}", text, known.join(", "))
    })
}

/// Parse `WxH`.
pub fn parse_size(text: &str) -> Result<CanvasSize, String> {
    CanvasSize::parse(text).ok_or_else(|| format!("invalid size '{}', expected WIDTHxHEIGHT", text))
}
