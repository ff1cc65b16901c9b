//! core::coords
//!
//! Canonical text form of a latitude/longitude pair.
//!
//! # Format
//!
//! A canonical coordinate string is `"<lat>,<lng>"` where each component is
//! written with exactly [`PRECISION`] fractional digits and no whitespace.
//! Latitude always comes first.
//!
//! ```
//! use pointmap::core::coords::{decode, encode};
//!
//! let text = encode(-7.8, 110.4);
//! assert_eq!(text, "-7.800000000,110.400000000");
//!
//! let coord = decode(&text).unwrap();
//! assert_eq!(coord.lat(), -7.8);
//! assert_eq!(coord.lng(), 110.4);
//!
//! assert!(decode("91,0").is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of fractional digits in the canonical form.
pub const PRECISION: usize = 9;

/// Valid latitude range, inclusive.
pub const LAT_RANGE: (f64, f64) = (-90.0, 90.0);

/// Valid longitude range, inclusive.
pub const LNG_RANGE: (f64, f64) = (-180.0, 180.0);

/// Errors from decoding or constructing a coordinate.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DecodeError {
    #[error("expected \"lat,lng\" with exactly two components, found {0}")]
    WrongArity(usize),

    #[error("component '{0}' is not a number")]
    NotANumber(String),

    #[error("component '{0}' is not finite")]
    NotFinite(String),

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A validated WGS84 position.
///
/// Construction checks bounds, so a `Coordinate` is always displayable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range components.
    pub fn new(lat: f64, lng: f64) -> Result<Self, DecodeError> {
        if !lat.is_finite() {
            return Err(DecodeError::NotFinite(lat.to_string()));
        }
        if !lng.is_finite() {
            return Err(DecodeError::NotFinite(lng.to_string()));
        }
        if lat < LAT_RANGE.0 || lat > LAT_RANGE.1 {
            return Err(DecodeError::LatitudeOutOfRange(lat));
        }
        if lng < LNG_RANGE.0 || lng > LNG_RANGE.1 {
            return Err(DecodeError::LongitudeOutOfRange(lng));
        }
        Ok(Self { lat, lng })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Canonical string for this position.
    pub fn encode(&self) -> String {
        encode(self.lat, self.lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Coordinate {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

impl TryFrom<String> for Coordinate {
    type Error = DecodeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        decode(&s)
    }
}

impl From<Coordinate> for String {
    fn from(c: Coordinate) -> Self {
        c.encode()
    }
}

/// Format a lat/lng pair in canonical form.
///
/// Values that round to zero at the canonical precision are written as
/// `0.000000000`, so `-0.0` never produces a leading minus sign.
pub fn encode(lat: f64, lng: f64) -> String {
    format!(
        "{:.prec$},{:.prec$}",
        normalize_zero(lat),
        normalize_zero(lng),
        prec = PRECISION
    )
}

/// Parse a canonical (or near-canonical) coordinate string.
///
/// Whitespace around each component is tolerated; everything else about the
/// format is strict.
pub fn decode(s: &str) -> Result<Coordinate, DecodeError> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err(DecodeError::WrongArity(parts.len()));
    }

    let lat = parse_component(parts[0])?;
    let lng = parse_component(parts[1])?;
    Coordinate::new(lat, lng)
}

fn parse_component(raw: &str) -> Result<f64, DecodeError> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| DecodeError::NotANumber(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(DecodeError::NotFinite(trimmed.to_string()));
    }
    Ok(value)
}

fn normalize_zero(v: f64) -> f64 {
    let scale = 10f64.powi(PRECISION as i32);
    if (v * scale).round() == 0.0 {
        0.0
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_fixed_precision() {
        assert_eq!(encode(-7.8, 110.4), "-7.800000000,110.400000000");
        assert_eq!(encode(0.0, 0.0), "0.000000000,0.000000000");
        assert_eq!(
            encode(-7.7956, 110.3695),
            "-7.795600000,110.369500000"
        );
    }

    #[test]
    fn encode_never_swaps_components() {
        let text = encode(10.0, 20.0);
        assert!(text.starts_with("10."));
        assert!(text.ends_with("20.000000000"));
    }

    #[test]
    fn encode_normalizes_negative_zero() {
        assert_eq!(encode(-0.0, -0.0000000001), "0.000000000,0.000000000");
    }

    #[test]
    fn decode_canonical() {
        let c = decode("-7.795600000,110.369500000").unwrap();
        assert_eq!(c.lat(), -7.7956);
        assert_eq!(c.lng(), 110.3695);
    }

    #[test]
    fn decode_tolerates_component_whitespace() {
        let c = decode(" 1.5 , 2.5 ").unwrap();
        assert_eq!((c.lat(), c.lng()), (1.5, 2.5));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert_eq!(decode("abc"), Err(DecodeError::WrongArity(1)));
        assert_eq!(decode("1,2,3"), Err(DecodeError::WrongArity(3)));
        assert_eq!(decode("91,0"), Err(DecodeError::LatitudeOutOfRange(91.0)));
        assert_eq!(
            decode("0,180.5"),
            Err(DecodeError::LongitudeOutOfRange(180.5))
        );
        assert!(matches!(decode("x,1"), Err(DecodeError::NotANumber(_))));
        assert!(matches!(decode(",1"), Err(DecodeError::NotANumber(_))));
        assert!(matches!(decode("NaN,1"), Err(DecodeError::NotFinite(_))));
        assert!(matches!(decode("inf,1"), Err(DecodeError::NotFinite(_))));
        assert!(decode("").is_err());
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(decode("90,180").is_ok());
        assert!(decode("-90,-180").is_ok());
    }

    #[test]
    fn coordinate_serde_uses_canonical_string() {
        let c = Coordinate::new(1.0, 2.0).unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"1.000000000,2.000000000\"");

        let back: Coordinate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);

        let bad: Result<Coordinate, _> = serde_json::from_str("\"95,0\"");
        assert!(bad.is_err());
    }

    #[test]
    fn decode_error_display() {
        assert_eq!(
            DecodeError::WrongArity(3).to_string(),
            "expected \"lat,lng\" with exactly two components, found 3"
        );
        assert_eq!(
            DecodeError::LatitudeOutOfRange(91.0).to_string(),
            "latitude 91 is outside [-90, 90]"
        );
    }
}
