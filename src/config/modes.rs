//! Change-detection policy and course selection definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// How a resource kind decides whether its remote copy changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerPolicy {
    /// Compare the date shown on the listing page; download only on change.
    #[default]
    Displayed,
    /// Download first, then compare the MD5 digest of the content.
    Checksum,
}

impl fmt::Display for MarkerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerPolicy::Displayed => write!(f, "displayed"),
            MarkerPolicy::Checksum => write!(f, "checksum"),
        }
    }
}

impl FromStr for MarkerPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "displayed" | "date" => Ok(MarkerPolicy::Displayed),
            "checksum" | "md5" => Ok(MarkerPolicy::Checksum),
            _ => Err(format!("Unknown marker policy: {}", s)),
        }
    }
}

/// Which of the enrolled courses to process.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CourseSelection {
    #[default]
    All,
    /// Zero-based positions in the listed course order.
    Indices(Vec<usize>),
}

impl CourseSelection {
    /// Apply the selection to the discovered course list.
    ///
    /// Out-of-range indices are dropped silently and repeated indices
    /// are only taken once; the requested order is kept.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Vec<T> {
        match self {
            CourseSelection::All => items.to_vec(),
            CourseSelection::Indices(indices) => {
                let mut seen = HashSet::new();
                indices
                    .iter()
                    .filter(|&&i| i < items.len() && seen.insert(i))
                    .map(|&i| items[i].clone())
                    .collect()
            }
        }
    }
}

impl fmt::Display for CourseSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourseSelection::All => write!(f, "all"),
            CourseSelection::Indices(indices) => {
                let parts: Vec<String> = indices.iter().map(|i| i.to_string()).collect();
                write!(f, "{}", parts.join(" "))
            }
        }
    }
}

impl FromStr for CourseSelection {
    type Err = String;

    /// Parse `all`/`y` or a list of indices separated by spaces or commas.
    /// Tokens that are not plain numbers are ignored.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") || trimmed.eq_ignore_ascii_case("y") {
            return Ok(CourseSelection::All);
        }

        let indices = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()))
            .filter_map(|token| token.parse::<usize>().ok())
            .collect();

        Ok(CourseSelection::Indices(indices))
    }
}

impl TryFrom<String> for CourseSelection {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CourseSelection> for String {
    fn from(selection: CourseSelection) -> Self {
        selection.to_string()
    }
}
