//! Custom value parsers for CLI arguments.

use std::time::Duration;

use reqkit::StatusCode;
use serde_json::Value;

/// Parse a duration with unit suffix (e.g., "500ms", "30s", "5m")
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Duration cannot be empty".to_string());
    }

    let (num, unit) = if let Some(num) = s.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = s.strip_suffix('s') {
        (num, "s")
    } else if let Some(num) = s.strip_suffix('m') {
        (num, "m")
    } else {
        (s, "s")
    };

    let value: u64 = num
        .parse()
        .map_err(|_| format!("Invalid number: {num}"))?;

    let factor = match unit {
        "ms" => 1,
        "s" => 1000,
        "m" => 60 * 1000,
        _ => return Err(format!("Unknown unit: {unit}")),
    };
    let millis = value
        .checked_mul(factor)
        .ok_or_else(|| format!("Duration too large: {s}"))?;

    if millis == 0 {
        return Err("Duration must be greater than zero".to_string());
    }
    Ok(Duration::from_millis(millis))
}

/// Parse a key=value pair
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("Invalid key=value pair: {s}"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Parse a `Name: value` header
pub fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("Invalid header, expected `Name: value`: {s}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("Header name cannot be empty: {s}"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Parse an HTTP status code
pub fn parse_status(s: &str) -> Result<StatusCode, String> {
    s.trim()
        .parse::<u16>()
        .ok()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .ok_or_else(|| format!("Invalid status code: {s}"))
}

/// Interpret a parameter value: JSON if it parses, plain string otherwise
pub fn parse_param_value(s: &str) -> Value {
    serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.to_string()))
}
