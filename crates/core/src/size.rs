//! Docker-style size strings.
//!
//! Follows docker's `go-units` RAMInBytes semantics: `K`/`M`/`G`/`T`
//! suffixes are 1024-based, case-insensitive, with an optional `b` or `ib`
//! tail ("64M", "64mb", "64MiB" all mean 64 MiB). A bare number is bytes.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid size string: {0:?}")]
pub struct SizeError(pub String);

/// Parse a size string into bytes.
pub fn parse_size(input: &str) -> Result<u64, SizeError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(SizeError(input.to_string()));
    }

    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (number, suffix) = s.split_at(split);

    let value: f64 = number.parse().map_err(|_| SizeError(input.to_string()))?;

    let multiplier: u64 = match suffix.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" | "kib" => 1 << 10,
        "m" | "mb" | "mib" => 1 << 20,
        "g" | "gb" | "gib" => 1 << 30,
        "t" | "tb" | "tib" => 1 << 40,
        _ => return Err(SizeError(input.to_string())),
    };

    Ok((value * multiplier as f64) as u64)
}
