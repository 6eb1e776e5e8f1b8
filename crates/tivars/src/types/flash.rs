//! Flash application model.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::{Result, TiError};

use super::FlashSeries;

/// Largest flash page in bytes (addresses 0x4000..=0xFFFF).
pub const MAX_PAGE_SIZE: usize = 0xC000;

/// Longest application name.
pub const APP_NAME_LENGTH: usize = 8;

/// Application revision `major.minor`, each a single decimal digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Revision {
    major: u8,
    minor: u8,
}

impl Revision {
    pub fn new(major: u8, minor: u8) -> Result<Self> {
        if major > 9 || minor > 9 {
            return Err(TiError::validation(
                "revision",
                format!("{major}.{minor} is outside 0.0..=9.9"),
            ));
        }
        Ok(Self { major, minor })
    }

    #[must_use]
    pub const fn major(self) -> u8 {
        self.major
    }

    #[must_use]
    pub const fn minor(self) -> u8 {
        self.minor
    }
}

impl Default for Revision {
    fn default() -> Self {
        Self { major: 1, minor: 0 }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Revision {
    type Err = TiError;

    fn from_str(text: &str) -> Result<Self> {
        let invalid = || TiError::validation("revision", format!("{text:?} is not of the form D.D"));
        let (major, minor) = text.split_once('.').ok_or_else(invalid)?;
        match (major.as_bytes(), minor.as_bytes()) {
            ([major @ b'0'..=b'9'], [minor @ b'0'..=b'9']) => {
                Self::new(major - b'0', minor - b'0')
            }
            _ => Err(invalid()),
        }
    }
}

/// A flash application: header metadata plus memory pages by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashApplication {
    name: String,
    pub revision: Revision,
    pub series: FlashSeries,
    pub timestamp: NaiveDate,
    pages: BTreeMap<u16, Vec<u8>>,
}

impl FlashApplication {
    /// A new empty application stamped with today's local date.
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self {
            name: validate_app_name(name)?,
            revision: Revision::default(),
            series: FlashSeries::default(),
            timestamp: chrono::Local::now().date_naive(),
            pages: BTreeMap::new(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.name = validate_app_name(name)?;
        Ok(())
    }

    #[must_use]
    pub fn with_revision(mut self, revision: Revision) -> Self {
        self.revision = revision;
        self
    }

    #[must_use]
    pub fn with_series(mut self, series: FlashSeries) -> Self {
        self.series = series;
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: NaiveDate) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Contents of page `index`.
    #[must_use]
    pub fn page(&self, index: u16) -> Option<&[u8]> {
        self.pages.get(&index).map(Vec::as_slice)
    }

    /// Mutable contents of page `index`, created empty when missing.
    pub fn page_mut(&mut self, index: u16) -> &mut Vec<u8> {
        self.pages.entry(index).or_default()
    }

    /// Store page `index`, replacing any previous contents.
    pub fn set_page(&mut self, index: u16, data: impl Into<Vec<u8>>) -> Result<()> {
        let data = data.into();
        if data.len() > MAX_PAGE_SIZE {
            return Err(TiError::validation(
                "page",
                format!(
                    "page {index} holds {} bytes, limit is {MAX_PAGE_SIZE}",
                    data.len()
                ),
            ));
        }
        self.pages.insert(index, data);
        Ok(())
    }

    /// Remove and return page `index`.
    pub fn remove_page(&mut self, index: u16) -> Option<Vec<u8>> {
        self.pages.remove(&index)
    }

    /// Pages in ascending index order.
    pub fn pages(&self) -> impl Iterator<Item = (u16, &[u8])> {
        self.pages
            .iter()
            .map(|(index, data)| (*index, data.as_slice()))
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

fn validate_app_name(name: &str) -> Result<String> {
    if name.is_empty() || name.len() > APP_NAME_LENGTH || !name.is_ascii() {
        return Err(TiError::validation(
            "name",
            format!("application name {name:?} must be 1 to {APP_NAME_LENGTH} ASCII bytes"),
        ));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_parse() {
        let revision: Revision = "2.5".parse().unwrap();
        assert_eq!((revision.major(), revision.minor()), (2, 5));
        assert_eq!(revision.to_string(), "2.5");
        assert!("10.0".parse::<Revision>().is_err());
        assert!("1".parse::<Revision>().is_err());
        assert!(Revision::new(1, 10).is_err());
    }

    #[test]
    fn test_pages_are_ordered() {
        let mut app = FlashApplication::new("DEMO").unwrap();
        app.set_page(2, vec![2]).unwrap();
        app.set_page(0, vec![0]).unwrap();
        let indices: Vec<u16> = app.pages().map(|(index, _)| index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(app.remove_page(2), Some(vec![2]));
        assert_eq!(app.page(2), None);
        assert!(app.set_page(1, vec![0; MAX_PAGE_SIZE + 1]).is_err());
    }

    #[test]
    fn test_name_limits() {
        assert!(FlashApplication::new("").is_err());
        assert!(FlashApplication::new("TOOLONGNAME").is_err());
        let mut app = FlashApplication::new("A").unwrap();
        app.set_name("ABCDEFGH").unwrap();
        assert_eq!(app.name(), "ABCDEFGH");
    }
}
