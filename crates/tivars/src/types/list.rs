//! Real and complex lists.

use crate::error::{Result, TiError};

use super::{Number, TypeTag};

/// Ordered list of real or complex elements.
///
/// The list is complex as soon as one element carries a non-zero imaginary
/// part; every element is then written with the complex record width.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListVariable {
    elements: Vec<Number>,
}

impl ListVariable {
    /// Longest list the `u16` element count can describe.
    pub const MAX_LENGTH: usize = u16::MAX as usize;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from any sequence of numbers.
    pub fn from_elements<I, T>(elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Number>,
    {
        Self {
            elements: elements.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    pub fn elements(&self) -> &[Number] {
        &self.elements
    }

    /// Element at `index`.
    pub fn get(&self, index: usize) -> Result<Number> {
        self.elements
            .get(index)
            .copied()
            .ok_or_else(|| self.index_error(index))
    }

    /// Replace the element at an existing `index`.
    pub fn set(&mut self, index: usize, value: impl Into<Number>) -> Result<()> {
        let error = self.index_error(index);
        let slot = self.elements.get_mut(index).ok_or(error)?;
        *slot = value.into();
        Ok(())
    }

    /// Set the element at `index`, growing the list with real zeros first.
    pub fn set_extending(&mut self, index: usize, value: impl Into<Number>) -> Result<()> {
        if index >= Self::MAX_LENGTH {
            return Err(TiError::index_out_of_range(
                "list",
                index,
                format!("max length {}", Self::MAX_LENGTH),
            ));
        }
        if index >= self.elements.len() {
            self.elements.resize(index + 1, Number::real(0.0));
        }
        self.elements[index] = value.into();
        Ok(())
    }

    /// Append an element.
    pub fn push(&mut self, value: impl Into<Number>) {
        self.elements.push(value.into());
    }

    /// Drop every element from `len` onwards.
    pub fn truncate(&mut self, len: usize) {
        self.elements.truncate(len);
    }

    /// Whether any element is complex.
    #[must_use]
    pub fn is_complex(&self) -> bool {
        self.elements.iter().any(Number::is_complex)
    }

    /// RealList or ComplexList, derived from the elements.
    #[must_use]
    pub fn type_tag(&self) -> TypeTag {
        if self.is_complex() {
            TypeTag::ComplexList
        } else {
            TypeTag::RealList
        }
    }

    fn index_error(&self, index: usize) -> TiError {
        TiError::index_out_of_range("list", index, format!("len {}", self.elements.len()))
    }
}

impl FromIterator<Number> for ListVariable {
    fn from_iter<I: IntoIterator<Item = Number>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_type_tag_derivation() {
        let real = ListVariable::from_elements([1.0, 2.0]);
        assert_eq!(real.type_tag(), TypeTag::RealList);

        let mixed = ListVariable::from_elements([Number::real(1.0), Number::complex(0.0, 1.0)]);
        assert_eq!(mixed.type_tag(), TypeTag::ComplexList);
    }

    #[test]
    fn test_get_and_set_are_bounds_checked() {
        let mut list = ListVariable::from_elements([1.0]);
        assert_eq!(list.get(0).unwrap(), Number::real(1.0));
        assert_eq!(list.get(1).unwrap_err().kind(), ErrorKind::Bounds);
        assert!(list.set(3, 4.0).is_err());
        list.set(0, 9.0).unwrap();
        assert_eq!(list.elements(), &[Number::real(9.0)]);
    }

    #[test]
    fn test_set_extending_fills_with_zero() {
        let mut list = ListVariable::new();
        list.set_extending(3, (1.0, 2.0)).unwrap();
        assert_eq!(list.len(), 4);
        assert_eq!(list.get(0).unwrap(), Number::real(0.0));
        assert_eq!(list.get(3).unwrap(), Number::complex(1.0, 2.0));
        assert!(list.set_extending(ListVariable::MAX_LENGTH, 1.0).is_err());
    }

    #[test]
    fn test_truncate_and_push() {
        let mut list = ListVariable::from_elements([1.0, 2.0, 3.0]);
        list.truncate(1);
        list.push(5.0);
        assert_eq!(list.elements(), &[Number::real(1.0), Number::real(5.0)]);
    }
}
