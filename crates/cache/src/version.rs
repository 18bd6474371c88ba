//! Product versions
//!
//! A product version is `major.minor[.patch]` with an optional `-qualifier`
//! such as `5.0-rc-1`. Missing components count as zero, so `4.5` and
//! `4.5.0` are the same version. A qualified version sorts before the plain
//! release with the same numbers.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use workplan_core::{Error, Result};

#[derive(Debug, Clone)]
pub struct ProductVersion {
    text: String,
    numbers: [u32; 3],
    qualifier: Option<String>,
}

impl ProductVersion {
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let (base, qualifier) = match trimmed.split_once('-') {
            Some((base, qualifier)) if !qualifier.is_empty() => (base, Some(qualifier.to_string())),
            Some(_) => return Err(Error::invalid_version(text, "empty qualifier")),
            None => (trimmed, None),
        };

        let parts: Vec<&str> = base.split('.').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(Error::invalid_version(
                text,
                "expected major.minor or major.minor.patch",
            ));
        }
        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::invalid_version(
                    text,
                    format!("'{part}' is not a number"),
                ));
            }
            *slot = part
                .parse()
                .map_err(|e| Error::invalid_version(text, format!("'{part}': {e}")))?;
        }

        Ok(Self {
            text: trimmed.to_string(),
            numbers,
            qualifier,
        })
    }

    pub fn major(&self) -> u32 {
        self.numbers[0]
    }

    pub fn minor(&self) -> u32 {
        self.numbers[1]
    }

    pub fn patch(&self) -> u32 {
        self.numbers[2]
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    pub fn is_release(&self) -> bool {
        self.qualifier.is_none()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl FromStr for ProductVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ProductVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Ord for ProductVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.numbers
            .cmp(&other.numbers)
            .then_with(|| match (&self.qualifier, &other.qualifier) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for ProductVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ProductVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ProductVersion {}

impl Hash for ProductVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.numbers.hash(state);
        self.qualifier.hash(state);
    }
}
