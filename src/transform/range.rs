//! Range and part-number selection over a transformed object
//!
//! Selection always runs after the transformation, against the transformed
//! length.

use bytes::Bytes;
use std::str::FromStr;
use thiserror::Error;

use super::traits::PostProcessError;
use crate::event::UserRequest;
use crate::request::params;

/// Part size used when none is configured (5 MiB)
pub const DEFAULT_PART_SIZE: u64 = 5 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeParseError {
    #[error("range must use the bytes unit: {0}")]
    UnsupportedUnit(String),
    #[error("multiple ranges are not supported: {0}")]
    MultipleRanges(String),
    #[error("malformed range: {0}")]
    Malformed(String),
}

/// A single `bytes=` range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRange {
    /// `bytes=a-b`, both ends inclusive
    Bounded { start: u64, end: u64 },
    /// `bytes=a-`
    From { start: u64 },
    /// `bytes=-n`, the last n bytes
    Suffix { length: u64 },
}

impl FromStr for ByteRange {
    type Err = RangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let ranges = match trimmed.split_once('=') {
            Some((unit, ranges)) if unit.trim().eq_ignore_ascii_case("bytes") => ranges.trim(),
            _ => return Err(RangeParseError::UnsupportedUnit(s.to_string())),
        };

        if ranges.contains(',') {
            return Err(RangeParseError::MultipleRanges(s.to_string()));
        }

        let malformed = || RangeParseError::Malformed(s.to_string());
        let (first, last) = ranges.split_once('-').ok_or_else(malformed)?;
        let (first, last) = (first.trim(), last.trim());

        match (first.is_empty(), last.is_empty()) {
            (true, true) => Err(malformed()),
            (true, false) => {
                let length = last.parse().map_err(|_| malformed())?;
                Ok(ByteRange::Suffix { length })
            }
            (false, true) => {
                let start = first.parse().map_err(|_| malformed())?;
                Ok(ByteRange::From { start })
            }
            (false, false) => {
                let start: u64 = first.parse().map_err(|_| malformed())?;
                let end: u64 = last.parse().map_err(|_| malformed())?;
                if start > end {
                    return Err(malformed());
                }
                Ok(ByteRange::Bounded { start, end })
            }
        }
    }
}

impl ByteRange {
    /// Byte offsets selected from an object of `len` bytes, `None` when unsatisfiable
    pub fn resolve(&self, len: u64) -> Option<(u64, u64)> {
        match *self {
            ByteRange::Bounded { start, end } if start < len => Some((start, end.min(len - 1) + 1)),
            ByteRange::From { start } if start < len => Some((start, len)),
            ByteRange::Suffix { length } if length > 0 && len > 0 => {
                Some((len.saturating_sub(length), len))
            }
            _ => None,
        }
    }
}

/// Positive, 1-based part number
pub fn parse_part_number(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|n| *n >= 1)
}

/// Number of parts an object of `len` bytes splits into; never zero
pub fn part_count(len: u64, part_size: u64) -> u64 {
    len.div_ceil(part_size.max(1)).max(1)
}

pub fn apply_range(object: Bytes, raw: &str) -> Result<Bytes, PostProcessError> {
    let unsatisfiable = || PostProcessError::InvalidRange(format!("Cannot process specified range: {raw}"));

    let range: ByteRange = raw.parse().map_err(|_| unsatisfiable())?;
    let (start, end) = range.resolve(object.len() as u64).ok_or_else(unsatisfiable)?;

    Ok(object.slice(start as usize..end as usize))
}

pub fn apply_part_number(object: Bytes, raw: &str, part_size: u64) -> Result<Bytes, PostProcessError> {
    let part_size = part_size.max(1);
    let len = object.len() as u64;
    let count = part_count(len, part_size);

    let part = parse_part_number(raw)
        .filter(|n| *n <= count)
        .ok_or_else(|| {
            PostProcessError::InvalidPartNumber(format!(
                "Cannot specify part number: {raw}. Use part number from 1 to {count}."
            ))
        })?;

    let start = (part - 1) * part_size;
    let end = (part * part_size).min(len);
    Ok(object.slice(start as usize..end as usize))
}

/// Apply the caller's part number, else its range, else return the object unchanged
pub fn apply_range_or_part_number(
    object: Bytes,
    request: &UserRequest,
    part_size: u64,
) -> Result<Bytes, PostProcessError> {
    let invalid_target = |e: params::MalformedUrl| PostProcessError::InvalidTarget(e.to_string());

    if let Some(part) = params::part_number(request).map_err(invalid_target)? {
        return apply_part_number(object, &part, part_size);
    }

    if let Some(range) = params::range(request).map_err(invalid_target)? {
        return apply_range(object, &range);
    }

    Ok(object)
}
