//! Length units
//!
//! Model lengths are always centimeters. A [`LengthUnit`] formats them for
//! dimension lines, room areas and grid spacing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const CENTIMETERS_PER_INCH: f32 = 2.54;
const CENTIMETERS_PER_FOOT: f32 = 2.54 * 12.0;
const SQUARE_CENTIMETERS_PER_SQUARE_FOOT: f32 = 929.0304;

const INCH_FRACTIONS: [char; 7] = ['⅛', '¼', '⅜', '½', '⅝', '¾', '⅞'];

/// Unit used to display lengths and areas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    /// Millimeters, no decimals
    Millimeter,
    /// Centimeters, one optional decimal
    #[default]
    Centimeter,
    /// Meters, two to three decimals
    Meter,
    /// Feet and inches with eighth fractions
    Inch,
    /// Decimal inches
    InchDecimals,
}

impl LengthUnit {
    /// Whether this unit belongs to the metric system.
    pub fn is_metric(&self) -> bool {
        matches!(
            self,
            LengthUnit::Millimeter | LengthUnit::Centimeter | LengthUnit::Meter
        )
    }

    /// Format a length given in centimeters, with its unit suffix.
    pub fn format_length(&self, centimeters: f32) -> String {
        match self {
            LengthUnit::Millimeter => {
                format!("{} mm", format_decimal(centimeters * 10.0, 0, 0))
            }
            LengthUnit::Centimeter => format!("{} cm", format_decimal(centimeters, 0, 1)),
            LengthUnit::Meter => format!("{} m", format_decimal(centimeters / 100.0, 2, 3)),
            LengthUnit::Inch => format_feet_inches(centimeters),
            LengthUnit::InchDecimals => format!(
                "{}\"",
                format_decimal(centimeters / CENTIMETERS_PER_INCH, 0, 3)
            ),
        }
    }

    /// Format an area given in square centimeters, with its unit suffix.
    ///
    /// Metric areas always show two decimals, so a 400 x 300 room reads
    /// `12.00 m²`.
    pub fn format_area(&self, square_centimeters: f32) -> String {
        if self.is_metric() {
            format!("{} m²", format_decimal(square_centimeters / 10_000.0, 2, 2))
        } else {
            format!(
                "{} sq ft",
                format_decimal(square_centimeters / SQUARE_CENTIMETERS_PER_SQUARE_FOOT, 0, 0)
            )
        }
    }

    /// Candidate spacings between grid lines, in centimeters.
    pub fn grid_sizes(&self) -> Vec<f32> {
        if self.is_metric() {
            vec![
                1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 500.0, 1000.0, 2000.0, 5000.0,
                10000.0,
            ]
        } else {
            let mut sizes = vec![2.54, 5.08, 7.62, 15.24];
            sizes.extend(FOOT_MULTIPLES.iter().map(|n| n * CENTIMETERS_PER_FOOT));
            sizes
        }
    }

    /// Candidate spacings between main grid lines, in centimeters.
    pub fn main_grid_sizes(&self) -> Vec<f32> {
        if self.is_metric() {
            vec![100.0, 200.0, 500.0, 1000.0, 2000.0, 5000.0, 10000.0]
        } else {
            FOOT_MULTIPLES
                .iter()
                .map(|n| n * CENTIMETERS_PER_FOOT)
                .collect()
        }
    }

    /// Smallest grid spacing that is at least 10 pixels wide at `scale`.
    pub fn grid_size(&self, scale: f32) -> f32 {
        pick_size(&self.grid_sizes(), scale, 10.0)
    }

    /// Smallest main grid spacing that is at least 50 pixels wide at `scale`.
    pub fn main_grid_size(&self, scale: f32) -> f32 {
        pick_size(&self.main_grid_sizes(), scale, 50.0)
    }
}

const FOOT_MULTIPLES: [f32; 9] = [1.0, 3.0, 6.0, 12.0, 24.0, 48.0, 96.0, 192.0, 384.0];

fn pick_size(sizes: &[f32], scale: f32, min_pixels: f32) -> f32 {
    let mut size = sizes[0];
    for candidate in &sizes[1..] {
        if size * scale >= min_pixels {
            break;
        }
        size = *candidate;
    }
    size
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Millimeter => write!(f, "mm"),
            Self::Centimeter => write!(f, "cm"),
            Self::Meter => write!(f, "m"),
            Self::Inch => write!(f, "inch"),
            Self::InchDecimals => write!(f, "inch decimals"),
        }
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mm" | "millimeter" => Ok(Self::Millimeter),
            "cm" | "centimeter" => Ok(Self::Centimeter),
            "m" | "meter" => Ok(Self::Meter),
            "in" | "inch" => Ok(Self::Inch),
            "inch decimals" | "inch_decimals" => Ok(Self::InchDecimals),
            _ => Err(format!("Unknown length unit: {}", s)),
        }
    }
}

/// Format `value` with grouped thousands and between `min_fraction` and
/// `max_fraction` decimals, trailing zeros beyond the minimum dropped.
pub fn format_decimal(value: f32, min_fraction: usize, max_fraction: usize) -> String {
    let rounded = format!("{:.*}", max_fraction, value.abs());
    let (integer, fraction) = match rounded.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (rounded.clone(), String::new()),
    };
    let mut fraction = fraction;
    while fraction.len() > min_fraction && fraction.ends_with('0') {
        fraction.pop();
    }

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let is_zero = integer.chars().chain(fraction.chars()).all(|c| c == '0');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    if fraction.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, fraction)
    }
}

fn format_feet_inches(centimeters: f32) -> String {
    let absolute = centimeters.abs();
    let mut feet = (absolute / CENTIMETERS_PER_FOOT).floor();
    let mut inches = (absolute - feet * CENTIMETERS_PER_FOOT) / CENTIMETERS_PER_INCH;
    if inches >= 11.9375 {
        feet += 1.0;
        inches -= 12.0;
    }
    let sign = if centimeters < 0.0 { "-" } else { "" };
    let feet_text = format_decimal(feet, 0, 0);
    if inches < 0.0005 {
        return format!("{}{}'", sign, feet_text);
    }
    let whole = inches.floor();
    let eighth = ((inches - whole) * 8.0).round() as usize;
    if eighth == 0 || eighth == 8 {
        let rounded = (inches * 8.0).round() / 8.0;
        format!("{}{}'{}\"", sign, feet_text, format_decimal(rounded, 0, 3))
    } else {
        format!(
            "{}{}'{}{}\"",
            sign, feet_text, whole as i64, INCH_FRACTIONS[eighth - 1]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_lengths() {
        assert_eq!(LengthUnit::Centimeter.format_length(412.0), "412 cm");
        assert_eq!(LengthUnit::Centimeter.format_length(412.26), "412.3 cm");
        assert_eq!(LengthUnit::Millimeter.format_length(412.0), "4,120 mm");
        assert_eq!(LengthUnit::Meter.format_length(412.0), "4.12 m");
    }

    #[test]
    fn test_feet_inches() {
        assert_eq!(LengthUnit::Inch.format_length(30.48), "1'");
        assert_eq!(LengthUnit::Inch.format_length(30.48 + 2.54 * 3.5), "1'3½\"");
        assert_eq!(LengthUnit::Inch.format_length(30.48 + 2.54 * 6.0), "1'6\"");
    }

    #[test]
    fn test_area_two_decimals() {
        assert_eq!(LengthUnit::Centimeter.format_area(120_000.0), "12.00 m²");
        assert_eq!(LengthUnit::Meter.format_area(123_456_789.0), "12,345.68 m²");
        assert_eq!(LengthUnit::Inch.format_area(929.0304 * 120.0), "120 sq ft");
    }

    #[test]
    fn test_grid_sizes() {
        assert_eq!(LengthUnit::Centimeter.grid_size(1.0), 10.0);
        assert_eq!(LengthUnit::Centimeter.grid_size(0.5), 20.0);
        assert_eq!(LengthUnit::Centimeter.main_grid_size(0.5), 100.0);
        assert_eq!(LengthUnit::Centimeter.main_grid_size(0.1), 500.0);
        assert!((LengthUnit::Inch.grid_size(1.0) - 15.24).abs() < 0.001);
    }

    #[test]
    fn test_parse_unit() {
        assert_eq!("cm".parse::<LengthUnit>(), Ok(LengthUnit::Centimeter));
        assert!("furlong".parse::<LengthUnit>().is_err());
    }

    #[test]
    fn test_negative_zero_has_no_sign() {
        assert_eq!(format_decimal(-0.0001, 0, 1), "0");
        assert_eq!(format_decimal(-1234.5, 1, 1), "-1,234.5");
    }
}
