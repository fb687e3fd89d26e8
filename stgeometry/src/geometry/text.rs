//! Coordinate-text notation.
//!
//! ```text
//! Point      := "POINT" ["Z"|"M"|"ZM"] "(" Ordinates ")"
//! Polyline   := "LINESTRING" ["Z"|"M"|"ZM"] "(" Ordinates ("," Ordinates)+ ")"
//! Ordinates  := X SP Y [SP Z] [SP M]
//! ```
//!
//! Keywords are case-insensitive and numbers always use `.` as the decimal
//! separator.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

use crate::error::Error;
use crate::header::Dimension;

/// Fractional digits kept when rendering an ordinate.
const RENDERED_DIGITS: u32 = 4;

/// The geometry keyword leading a coordinate-text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Keyword {
    Point,
    LineString,
}

impl Keyword {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Keyword::Point => "POINT",
            Keyword::LineString => "LINESTRING",
        }
    }
}

/// A parsed coordinate-text, before any encoding.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GeometryText {
    pub keyword: Keyword,
    pub dimension: Dimension,
    /// One entry per point, each holding `dimension.ordinates()` values.
    pub points: Vec<Vec<Decimal>>,
}

impl FromStr for GeometryText {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| Error::InvalidText(format!("{reason}: {text:?}"));

        let (head, rest) = text
            .trim()
            .split_once('(')
            .ok_or_else(|| invalid("missing opening parenthesis"))?;
        let inner = rest
            .trim_end()
            .strip_suffix(')')
            .ok_or_else(|| invalid("missing closing parenthesis"))?;
        if inner.contains(['(', ')']) {
            return Err(invalid("nested parentheses"));
        }

        let mut words = head.split_whitespace();
        let keyword = match words.next().map(str::to_ascii_uppercase).as_deref() {
            Some("POINT") => Keyword::Point,
            Some("LINESTRING") => Keyword::LineString,
            _ => return Err(invalid("unknown geometry keyword")),
        };

        let tag: String = words.collect::<String>().to_ascii_uppercase();
        let dimension = match tag.as_str() {
            "" => Dimension::Xy,
            "Z" => Dimension::Xyz,
            "M" => Dimension::Xym,
            "ZM" => Dimension::Xyzm,
            _ => return Err(invalid("unknown dimension tag")),
        };

        let points = inner
            .split(',')
            .map(|tuple| parse_ordinates(tuple, dimension))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GeometryText { keyword, dimension, points })
    }
}

fn parse_ordinates(tuple: &str, dimension: Dimension) -> Result<Vec<Decimal>, Error> {
    let values = tuple
        .split_whitespace()
        .map(|token| Decimal::from_str(token).map_err(|_| Error::InvalidNumber(token.to_string())))
        .collect::<Result<Vec<_>, _>>()?;

    if values.len() != dimension.ordinates() {
        return Err(Error::InvalidText(format!(
            "expected {} ordinates, found {:?}",
            dimension.ordinates(),
            tuple.trim()
        )));
    }
    Ok(values)
}

/// Renders an ordinate with at most 4 fractional digits, trailing zeros
/// trimmed.
pub(crate) fn format_ordinate(value: Decimal) -> String {
    value
        .round_dp_with_strategy(RENDERED_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string()
}

/// Renders the `KEYWORD [TAG]` prefix of a coordinate-text.
pub(crate) fn prefix(keyword: Keyword, dimension: Dimension) -> String {
    match dimension.tag() {
        "" => keyword.as_str().to_string(),
        tag => format!("{} {tag}", keyword.as_str()),
    }
}
