//! Calculator floating-point number encoding.
//!
//! Every real component occupies one 9-byte record:
//!
//! | Offset | Field    | Description                                        |
//! |--------|----------|----------------------------------------------------|
//! | 0      | flags    | `0x80` negative, `0x0C` complex pair, `0x02` undefined |
//! | 1      | exponent | decimal exponent biased by `0x80`                  |
//! | 2-8    | mantissa | 14 BCD digits, most significant first              |
//!
//! A complex value is two consecutive records (real, then imaginary) with the
//! complex flag set in both flag bytes. Mantissas carry at most 14 significant
//! digits; further digits are dropped, not rounded.

use crate::error::{Result, TiError};

/// Length of one real record.
pub const REAL_LENGTH: usize = 9;

/// Length of a real/imaginary record pair.
pub const COMPLEX_LENGTH: usize = REAL_LENGTH * 2;

/// Flag byte bit marking a negative value.
pub const SIGN_FLAG: u8 = 0x80;

/// Flag byte bits marking one half of a complex pair.
pub const COMPLEX_FLAG: u8 = 0x0C;

/// Flag byte bit marking an undefined value.
pub const UNDEFINED_FLAG: u8 = 0x02;

/// Bias added to the decimal exponent.
pub const EXPONENT_BIAS: i32 = 0x80;

/// Number of BCD mantissa digits.
pub const MANTISSA_DIGITS: usize = 14;

/// Encode a real or complex number.
///
/// `None` for `real` produces the undefined sentinel. The imaginary record is
/// appended when `imaginary` is present and non-zero, or when
/// `force_complex` is set (imaginary defaults to zero). A forced undefined
/// value is padded with a zero record so it keeps the complex width.
///
/// # Errors
///
/// Fails for non-finite values and for magnitudes whose decimal exponent does
/// not fit the biased exponent byte.
pub fn encode_number(
    real: Option<f64>,
    imaginary: Option<f64>,
    force_complex: bool,
) -> Result<Vec<u8>> {
    let Some(real) = real else {
        let mut out = vec![0u8; REAL_LENGTH];
        out[0] = UNDEFINED_FLAG;
        if force_complex {
            out.resize(COMPLEX_LENGTH, 0);
        }
        return Ok(out);
    };

    let mut out = Vec::with_capacity(COMPLEX_LENGTH);
    out.extend_from_slice(&encode_real(real)?);

    let has_imaginary = imaginary.is_some_and(|value| value != 0.0);
    if has_imaginary || force_complex {
        out.extend_from_slice(&encode_real(imaginary.unwrap_or(0.0))?);
        out[0] |= COMPLEX_FLAG;
        out[REAL_LENGTH] |= COMPLEX_FLAG;
    }

    Ok(out)
}

/// Decode a real or complex number.
///
/// Returns `(None, None)` for the undefined sentinel. The imaginary part is
/// only read when the complex flag is set and a full second record follows.
///
/// # Errors
///
/// Fails when fewer than 9 bytes are supplied or a mantissa nibble is not a
/// decimal digit.
pub fn decode_number(bytes: &[u8]) -> Result<(Option<f64>, Option<f64>)> {
    let record = bytes
        .get(..REAL_LENGTH)
        .ok_or_else(|| TiError::out_of_bounds("number", 0, REAL_LENGTH, bytes.len()))?;

    if record[0] & UNDEFINED_FLAG != 0 {
        return Ok((None, None));
    }

    let real = decode_real(record)?;
    let imaginary = match bytes.get(REAL_LENGTH..COMPLEX_LENGTH) {
        Some(second) if record[0] & COMPLEX_FLAG != 0 && second[0] & UNDEFINED_FLAG == 0 => {
            Some(decode_real(second)?)
        }
        _ => None,
    };

    Ok((Some(real), imaginary))
}

fn encode_real(value: f64) -> Result<[u8; REAL_LENGTH]> {
    if !value.is_finite() {
        return Err(TiError::validation(
            "number",
            format!("{value} cannot be represented"),
        ));
    }

    let (digits, exponent) = decimal_digits(value.abs())?;
    let biased = exponent + EXPONENT_BIAS;
    let biased = u8::try_from(biased).map_err(|_| TiError::ExponentOutOfRange { value, exponent })?;

    let mut record = [0u8; REAL_LENGTH];
    if value < 0.0 {
        record[0] = SIGN_FLAG;
    }
    record[1] = biased;
    for (slot, pair) in record[2..].iter_mut().zip(digits.chunks_exact(2)) {
        *slot = (pair[0] << 4) | pair[1];
    }
    Ok(record)
}

/// Split a non-negative finite value into mantissa digits and a decimal exponent.
///
/// Uses the shortest round-tripping decimal form, so any value with at most
/// 14 significant digits survives encode/decode unchanged.
fn decimal_digits(magnitude: f64) -> Result<([u8; MANTISSA_DIGITS], i32)> {
    let mut digits = [0u8; MANTISSA_DIGITS];
    if magnitude == 0.0 {
        return Ok((digits, 0));
    }

    let formatted = format!("{magnitude:e}");
    let unexpected = || {
        TiError::validation(
            "number",
            format!("unexpected scientific form {formatted:?}"),
        )
    };
    let (mantissa, exponent) = formatted.split_once('e').ok_or_else(unexpected)?;
    let exponent = exponent.parse::<i32>().map_err(|_| unexpected())?;

    let significant = mantissa.bytes().filter(u8::is_ascii_digit);
    for (slot, digit) in digits.iter_mut().zip(significant) {
        *slot = digit - b'0';
    }
    Ok((digits, exponent))
}

fn decode_real(record: &[u8]) -> Result<f64> {
    let mut digits = String::with_capacity(MANTISSA_DIGITS);
    for (offset, byte) in record[2..REAL_LENGTH].iter().enumerate() {
        for nibble in [byte >> 4, byte & 0x0F] {
            if nibble > 9 {
                return Err(TiError::invalid_format(format!(
                    "mantissa byte {} holds non-decimal digit 0x{nibble:X}",
                    offset + 2
                )));
            }
            digits.push(char::from(b'0' + nibble));
        }
    }

    let exponent = i32::from(record[1]) - EXPONENT_BIAS;
    let sign = if record[0] & SIGN_FLAG != 0 { "-" } else { "" };
    let text = format!("{sign}{}.{}e{exponent}", &digits[..1], &digits[1..]);

    text.parse::<f64>()
        .map_err(|_| TiError::invalid_format(format!("unparsable mantissa {text}")))
}
