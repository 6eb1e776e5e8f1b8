//! Byte-string variables: application variables, programs and placeholders
//! for unrecognized type tags.

use super::TypeTag;

/// Application variable: an opaque byte string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppVar {
    pub data: Vec<u8>,
}

impl AppVar {
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

/// Program body as a tokenized byte stream.
///
/// Tokens are kept verbatim; translating them to or from source text is the
/// job of a tokenizer outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub tokens: Vec<u8>,
    pub locked: bool,
}

impl Program {
    #[must_use]
    pub fn new(tokens: impl Into<Vec<u8>>) -> Self {
        Self {
            tokens: tokens.into(),
            locked: false,
        }
    }

    /// Mark the program as edit-locked.
    #[must_use]
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    #[must_use]
    pub const fn type_tag(&self) -> TypeTag {
        if self.locked {
            TypeTag::ProtectedProgram
        } else {
            TypeTag::Program
        }
    }
}

/// Entry whose type tag is not recognized, kept so the container round-trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariable {
    pub type_tag: u8,
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_tag_follows_lock() {
        assert_eq!(Program::new(vec![0xDE]).type_tag(), TypeTag::Program);
        assert_eq!(
            Program::new(vec![0xDE]).locked().type_tag(),
            TypeTag::ProtectedProgram
        );
    }
}
