//! Readable forms of a few values whose raw encoding is not meant for display.
//!
//! These work on decoded [`Value`]s and never touch the byte buffer. The helpers on
//! [`Exif`][crate::Exif] look up the right entry and call into this module.

use crate::tiff::{Rational, Value};

/// The Flash (0x9209) bitfield split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Flash {
    /// Bit 0: the flash fired.
    pub fired: bool,
    /// Bits 1 and 2: strobe return light detection, 0 to 3.
    pub return_light: u8,
    /// Bits 3 and 4: 0 unknown, 1 compulsory firing, 2 compulsory suppression, 3 auto.
    pub mode: u8,
    /// Bit 5: the camera has no flash function.
    pub no_function: bool,
    /// Bit 6: red-eye reduction was used.
    pub red_eye_reduction: bool,
}

impl Flash {
    /// Split the raw Flash value.
    pub fn from_bits(bits: u16) -> Self {
        Self {
            fired: bits & 0x0001 != 0,
            return_light: ((bits & 0x0006) >> 1) as u8,
            mode: ((bits & 0x0018) >> 3) as u8,
            no_function: bits & 0x0020 != 0,
            red_eye_reduction: bits & 0x0040 != 0,
        }
    }

    /// The parts as `(name, raw value)` pairs, in bit order.
    pub fn fields(&self) -> [(&'static str, u8); 5] {
        [
            ("FlashFired", self.fired.into()),
            ("FlashReturn", self.return_light),
            ("FlashMode", self.mode),
            ("FlashFunction", self.no_function.into()),
            ("FlashRedEyeMode", self.red_eye_reduction.into()),
        ]
    }
}

/// A version stored as four ASCII digits in an UNDEFINED value, such as ExifVersion `"0232"`.
pub fn version_string(value: &Value) -> Option<String> {
    match value {
        Value::Undefined(bytes) | Value::Byte(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
        Value::Ascii(text) | Value::Utf8(text) => Some(text.clone()),
        _ => None,
    }
}

/// GPSVersionID bytes joined with `.`, e.g. `2.3.0.0`.
pub fn dotted_version(value: &Value) -> Option<String> {
    match value {
        Value::Byte(bytes) | Value::Undefined(bytes) => Some(
            bytes
                .iter()
                .map(|byte| byte.to_string())
                .collect::<Vec<_>>()
                .join("."),
        ),
        _ => None,
    }
}

/// GPSTimeStamp as `hh:mm:ss`, keeping a fractional part where the rational has one.
pub fn clock_time(value: &Value) -> Option<String> {
    let hour = clock_component(value.rational(0)?)?;
    let minute = clock_component(value.rational(1)?)?;
    let second = clock_component(value.rational(2)?)?;
    Some(format!("{hour}:{minute}:{second}"))
}

fn clock_component(value: Rational) -> Option<String> {
    if value.denominator == 0 {
        return None;
    }
    let whole = value.numerator / value.denominator;
    let remainder = value.numerator % value.denominator;
    if remainder == 0 {
        return Some(format!("{whole:02}"));
    }
    // "0.25" -> ".25"
    let fraction = (remainder as f64 / value.denominator as f64).to_string();
    Some(format!("{whole:02}{}", fraction.trim_start_matches('0')))
}
