//! Numerical Reflection: the family of patterns that push integer
//! constants. A number pattern starts with a fixed sign prefix and then
//! spells the magnitude as operations over a running total: `w` adds 1,
//! `q` adds 5, `e` adds 10, `a` doubles and `d` halves. Many strings
//! denote the same number; this module generates one canonical entry per
//! integer (the doubling expansion of the magnitude's binary form) and can
//! decode any well-formed string back to its value.

use crate::{
    hex::{HexDir, HexPattern},
    iota::{Action, Iota, PatternIota},
};
use anyhow::ensure;

/// The largest magnitude Numerical Reflection covers. Anything outside
/// `[-2000, 2000]` is a domain error.
pub const MAX_VALUE: i64 = 2000;

/// The pattern pushing the given integer constant. Errors on non-integral
/// or out-of-range values; this is a construction-time domain error, not a
/// mishap.
pub fn numerical_reflection(value: f64) -> anyhow::Result<PatternIota> {
    ensure!(
        value.fract() == 0.0,
        "Numerical Reflection covers integers only, got {}",
        value
    );
    let value = value as i64;
    ensure!(
        (-MAX_VALUE..=MAX_VALUE).contains(&value),
        "Numerical Reflection covers [{}, {}], got {}",
        -MAX_VALUE,
        MAX_VALUE,
        value
    );

    let pattern = angle_signature(value)
        .parse::<HexPattern>()
        // The generated signature is valid by construction
        .unwrap();
    Ok(PatternIota::new(
        pattern,
        format!("Numerical Reflection: {}", value),
        Action::Push(Box::new(Iota::Double(value as f64))),
        false,
    ))
}

/// The canonical pattern string for an integer: the sign prefix plus a
/// doubling expansion of the magnitude, most significant bit first.
pub fn angle_signature(value: i64) -> String {
    let (start_dir, prefix, magnitude) = if value < 0 {
        (HexDir::Northeast, "dedd", -value)
    } else {
        (HexDir::Southeast, "aqaa", value)
    };

    let mut signature = format!("{},{}", start_dir, prefix);
    if magnitude > 0 {
        let bits = 64 - magnitude.leading_zeros();
        for bit in (0..bits).rev() {
            if bit + 1 < bits {
                signature.push('a');
            }
            if (magnitude >> bit) & 1 == 1 {
                signature.push('w');
            }
        }
    }
    signature
}

/// Evaluate a bare angle signature as a number string. Returns `None` for
/// strings that don't carry the sign prefix or contain a non-number
/// letter. The result can be fractional (`d` halves), in which case it is
/// simply not a valid [numerical_reflection] input.
pub fn decode_signature(signature: &str) -> Option<f64> {
    let (sign, digits) = if let Some(rest) = signature.strip_prefix("aqaa")
    {
        (1.0, rest)
    } else if let Some(rest) = signature.strip_prefix("dedd") {
        (-1.0, rest)
    } else {
        return None;
    };

    let mut value = 0.0_f64;
    for c in digits.chars() {
        match c {
            'w' => value += 1.0,
            'q' => value += 5.0,
            'e' => value += 10.0,
            'a' => value *= 2.0,
            'd' => value /= 2.0,
            _ => return None,
        }
    }
    Some(sign * value)
}

/// Parse a full pattern string and evaluate it as a number, for hosts
/// resolving hand-drawn number patterns.
pub fn decode_pattern(pattern: &HexPattern) -> Option<f64> {
    decode_signature(&pattern.angle_signature())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The generator must agree with the decoder over the whole table
    #[test]
    fn test_encode_decode_agree() {
        for value in [-2000, -37, -1, 0, 1, 2, 3, 5, 17, 256, 1999, 2000]
        {
            let signature = angle_signature(value);
            let (_, bare) = signature.split_once(',').unwrap();
            assert_eq!(
                decode_signature(bare),
                Some(value as f64),
                "{}",
                signature
            );
        }
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(angle_signature(0), "southeast,aqaa");
        assert_eq!(angle_signature(1), "southeast,aqaaw");
        assert_eq!(angle_signature(2), "southeast,aqaawa");
        assert_eq!(angle_signature(5), "southeast,aqaawaaw");
        assert_eq!(angle_signature(-3), "northeast,deddwaw");
    }

    #[test]
    fn test_pattern_pushes_value() {
        let pattern = numerical_reflection(42.0).unwrap();
        assert_eq!(pattern.name(), "Numerical Reflection: 42");
        assert!(!pattern.must_escape());
    }

    #[test]
    fn test_domain_errors() {
        assert!(numerical_reflection(0.5).is_err());
        assert!(numerical_reflection(2001.0).is_err());
        assert!(numerical_reflection(-2001.0).is_err());
        assert!(numerical_reflection(f64::NAN).is_err());
        assert!(numerical_reflection(2000.0).is_ok());
        assert!(numerical_reflection(-2000.0).is_ok());
    }

    #[test]
    fn test_decode_rejects_foreign_strings() {
        assert_eq!(decode_signature("qqq"), None);
        assert_eq!(decode_signature("aqaws"), None);
        assert_eq!(decode_signature("aqaas"), None);
    }
}
