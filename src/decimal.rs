//! Exact decimal values for prices and quantities
//!
//! Every price and quantity on the wire is kept as a scaled big integer
//! (mantissa + scale) so that fixed-precision rendering and the venue
//! checksum are pure integer operations, with no binary-float rounding
//! anywhere in the path.

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{RecorderError, Result};

/// An exact decimal quantity, immutable once constructed.
///
/// Constructed from a decimal string token or from a JSON numeric
/// literal. With serde_json's `arbitrary_precision` feature the literal's
/// exact text survives decoding, so the venue's own rendering is
/// reproduced byte for byte regardless of magnitude.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct DecimalValue(BigDecimal);

impl DecimalValue {
    /// Parse a decimal token such as `"45283.5"` or `"1E-8"`.
    pub fn parse(token: &str) -> Result<Self> {
        BigDecimal::from_str(token.trim())
            .map(Self)
            .map_err(|e| RecorderError::Decode(format!("bad decimal token '{token}': {e}")))
    }

    /// Construct from a decoded JSON value. Only number and string
    /// tokens are representable; anything else is a decode error.
    pub fn from_wire(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Number(number) => Self::parse(&number.to_string()),
            serde_json::Value::String(token) => Self::parse(token),
            other => Err(RecorderError::Decode(format!(
                "expected decimal number or string, got: {other}"
            ))),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Render with exactly `precision` fractional digits, zero-padded.
    ///
    /// Digits beyond `precision` are truncated toward zero by rescaling
    /// the mantissa, so long-tail fractional values stay correct. The
    /// output is always plain positional notation; `BigDecimal`'s own
    /// `Display` is never used because it switches to scientific
    /// notation for small magnitudes.
    pub fn to_fixed_string(&self, precision: u32) -> String {
        let scaled = self
            .0
            .with_scale_round(i64::from(precision), RoundingMode::Down);
        let (mantissa, scale) = scaled.into_bigint_and_exponent();
        render_plain(mantissa.to_string(), scale)
    }

    /// Feed this value's checksum digits into a running CRC-32.
    ///
    /// The venue digest consumes the digit characters of the
    /// fixed-precision rendering with the decimal point dropped and
    /// leading zero digits stripped. A value whose rendering is all
    /// zeros contributes a single `'0'`.
    pub fn digest(&self, crc: &mut crc32fast::Hasher, precision: u32) {
        let rendered = self.to_fixed_string(precision);
        let mut seen_nonzero = false;
        for byte in rendered.bytes() {
            if !byte.is_ascii_digit() {
                continue;
            }
            if !seen_nonzero {
                if byte == b'0' {
                    continue;
                }
                seen_nonzero = true;
            }
            crc.update(&[byte]);
        }
        if !seen_nonzero {
            crc.update(b"0");
        }
    }
}

/// Positional rendering of a mantissa/scale pair: the mantissa's digits
/// with the decimal point placed `scale` digits from the right,
/// zero-padded on the left as needed. Negative scales append zeros.
fn render_plain(mantissa: String, scale: i64) -> String {
    let (sign, digits) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest.to_string()),
        None => ("", mantissa),
    };

    if scale <= 0 {
        if digits == "0" {
            return digits;
        }
        let zeros = "0".repeat(scale.unsigned_abs() as usize);
        return format!("{sign}{digits}{zeros}");
    }

    let scale = scale as usize;
    let padded = if digits.len() <= scale {
        format!("{}{digits}", "0".repeat(scale - digits.len() + 1))
    } else {
        digits
    };
    let split = padded.len() - scale;
    format!("{sign}{}.{}", &padded[..split], &padded[split..])
}

impl fmt::Display for DecimalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (mantissa, scale) = self.0.as_bigint_and_exponent();
        f.write_str(&render_plain(mantissa.to_string(), scale))
    }
}

impl FromStr for DecimalValue {
    type Err = RecorderError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for DecimalValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DecimalValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        DecimalValue::from_wire(&value).map_err(serde::de::Error::custom)
    }
}
