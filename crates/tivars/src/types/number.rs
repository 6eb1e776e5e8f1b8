//! Real and complex numbers.

use std::fmt;

use super::TypeTag;

/// A real or complex value.
///
/// `real == None` is the undefined value. A zero imaginary part is stored as
/// `None`, so a value is complex exactly when it carries a non-zero
/// imaginary part.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Number {
    real: Option<f64>,
    imaginary: Option<f64>,
}

impl Number {
    /// The undefined value.
    #[must_use]
    pub const fn undefined() -> Self {
        Self {
            real: None,
            imaginary: None,
        }
    }

    /// A real value.
    #[must_use]
    pub const fn real(value: f64) -> Self {
        Self {
            real: Some(value),
            imaginary: None,
        }
    }

    /// A complex value.
    #[must_use]
    pub fn complex(real: f64, imaginary: f64) -> Self {
        Self::from_parts(Some(real), Some(imaginary))
    }

    /// Build from decoded components.
    #[must_use]
    pub fn from_parts(real: Option<f64>, imaginary: Option<f64>) -> Self {
        match real {
            Some(real) => Self {
                real: Some(real),
                imaginary: imaginary.filter(|value| *value != 0.0),
            },
            None => Self::undefined(),
        }
    }

    /// Real component, `None` when undefined.
    #[must_use]
    pub const fn real_part(&self) -> Option<f64> {
        self.real
    }

    /// Imaginary component, `None` when zero or undefined.
    #[must_use]
    pub const fn imaginary_part(&self) -> Option<f64> {
        self.imaginary
    }

    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        self.real.is_none()
    }

    #[must_use]
    pub const fn is_complex(&self) -> bool {
        self.imaginary.is_some()
    }

    /// Real or Complex, derived from the imaginary part.
    #[must_use]
    pub const fn type_tag(&self) -> TypeTag {
        if self.is_complex() {
            TypeTag::Complex
        } else {
            TypeTag::Real
        }
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::real(value)
    }
}

impl From<(f64, f64)> for Number {
    fn from((real, imaginary): (f64, f64)) -> Self {
        Self::complex(real, imaginary)
    }
}

/// Renders as an expression: `3`, `2+i`, `1-2.5i`, `-i`, `undefined`.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(real) = self.real else {
            return f.write_str("undefined");
        };
        let Some(imaginary) = self.imaginary else {
            return write!(f, "{real}");
        };
        let imaginary_text = match imaginary {
            1.0 => "i".to_string(),
            -1.0 => "-i".to_string(),
            other => format!("{other}i"),
        };
        if real == 0.0 {
            f.write_str(&imaginary_text)
        } else if imaginary < 0.0 {
            write!(f, "{real}{imaginary_text}")
        } else {
            write!(f, "{real}+{imaginary_text}")
        }
    }
}
