//! A named calculator variable and its typed value.

use crate::error::{Result, TiError};

use super::{
    AppVar, ListVariable, Matrix, Number, Picture, Program, Series, TypeTag, UnknownVariable,
    VarName, VariableKind,
};

/// Archived bit in the enhanced entry header.
pub const ARCHIVED_FLAG: u8 = 0x80;

/// Typed payload of a variable.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableValue {
    Number(Number),
    List(ListVariable),
    Matrix(Matrix),
    Picture(Picture),
    AppVar(AppVar),
    Program(Program),
    /// Entry with an unrecognized type tag, carried verbatim.
    Unknown(UnknownVariable),
}

impl VariableValue {
    /// The type tag byte written to the entry header.
    #[must_use]
    pub fn type_byte(&self) -> u8 {
        match self {
            Self::Unknown(unknown) => unknown.type_tag,
            _ => self.type_tag().map_or(0, TypeTag::as_byte),
        }
    }

    /// The recognized type tag, `None` for unknown placeholders.
    #[must_use]
    pub fn type_tag(&self) -> Option<TypeTag> {
        match self {
            Self::Number(number) => Some(number.type_tag()),
            Self::List(list) => Some(list.type_tag()),
            Self::Matrix(_) => Some(TypeTag::Matrix),
            Self::Picture(_) => Some(TypeTag::Picture),
            Self::AppVar(_) => Some(TypeTag::AppVar),
            Self::Program(program) => Some(program.type_tag()),
            Self::Unknown(_) => None,
        }
    }

    /// The variable family, `None` for unknown placeholders.
    #[must_use]
    pub fn kind(&self) -> Option<VariableKind> {
        self.type_tag().map(TypeTag::kind)
    }
}

macro_rules! impl_from_value {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for VariableValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_value!(
    Number(Number),
    List(ListVariable),
    Matrix(Matrix),
    Picture(Picture),
    AppVar(AppVar),
    Program(Program),
    Unknown(UnknownVariable),
);

/// A variable as stored in one container entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Name; must be set before the variable is written.
    pub name: Option<VarName>,
    /// Header format the entry is written with.
    pub series: Series,
    /// Archived flag (enhanced headers only).
    pub archived: bool,
    /// Format version byte (enhanced headers only).
    pub version: u8,
    pub value: VariableValue,
}

impl Variable {
    /// An unnamed variable for the default series.
    pub fn new(value: impl Into<VariableValue>) -> Self {
        Self {
            name: None,
            series: Series::default(),
            archived: false,
            version: 0,
            value: value.into(),
        }
    }

    /// A variable named with the readable naming rules of its kind.
    pub fn named(name: &str, value: impl Into<VariableValue>) -> Result<Self> {
        let mut variable = Self::new(value);
        variable.set_name(name)?;
        Ok(variable)
    }

    /// Parse and set a readable name (`A`, `L1`, `[B]`, `Pic2`, ...).
    ///
    /// Unknown placeholders accept the text as raw bytes.
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        let parsed = match self.value.kind() {
            Some(kind) => VarName::parse(kind, name)?,
            None => VarName::from_bytes(name.as_bytes())?,
        };
        self.name = Some(parsed);
        Ok(())
    }

    /// Set an already encoded name.
    #[must_use]
    pub fn with_name(mut self, name: VarName) -> Self {
        self.name = Some(name);
        self
    }

    #[must_use]
    pub fn with_series(mut self, series: Series) -> Self {
        self.series = series;
        self
    }

    #[must_use]
    pub fn archived(mut self, archived: bool) -> Self {
        self.archived = archived;
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn type_byte(&self) -> u8 {
        self.value.type_byte()
    }

    #[must_use]
    pub fn kind(&self) -> Option<VariableKind> {
        self.value.kind()
    }

    /// Name rendered for display, `<unnamed>` when unset.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (&self.name, self.kind()) {
            (Some(name), Some(kind)) => name.display(kind),
            (Some(name), None) => name.to_string(),
            (None, _) => "<unnamed>".to_string(),
        }
    }

    /// The name, or a validation error when it was never set.
    pub fn require_name(&self) -> Result<&VarName> {
        self.name
            .as_ref()
            .ok_or_else(|| TiError::validation("name", "variable has no name"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_uses_kind_rules() {
        let variable = Variable::named("L2", ListVariable::from_elements([1.0])).unwrap();
        assert_eq!(variable.name.as_ref().unwrap().as_bytes(), &[0x5D, 1]);
        assert_eq!(variable.display_name(), "L2");
        assert!(Variable::named("L2", Number::real(1.0)).is_err());
    }

    #[test]
    fn test_type_byte() {
        assert_eq!(Variable::new(Number::complex(1.0, 1.0)).type_byte(), 0x0C);
        assert_eq!(Variable::new(Program::new(vec![]).locked()).type_byte(), 0x06);
        let unknown = UnknownVariable {
            type_tag: 0x17,
            data: vec![1, 2],
        };
        let variable = Variable::new(unknown);
        assert_eq!(variable.type_byte(), 0x17);
        assert_eq!(variable.kind(), None);
    }

    #[test]
    fn test_require_name() {
        let variable = Variable::new(AppVar::new(vec![1]));
        assert!(variable.require_name().is_err());
        assert_eq!(variable.display_name(), "<unnamed>");
    }

    #[test]
    fn test_builders() {
        let variable = Variable::new(Number::real(1.0))
            .with_series(Series::Ti83)
            .archived(true)
            .with_version(4);
        assert_eq!(variable.series, Series::Ti83);
        assert!(variable.archived);
        assert_eq!(variable.version, 4);
    }
}
