//! Course and resource representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of portal content handled by a site adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Lecture slides and documents from the resources tool.
    Courseware,
    /// Recorded lectures from the course video tool.
    Video,
    /// Assignment submission status.
    Homework,
}

impl ResourceKind {
    /// Fixed folder the kind is stored under inside a course folder, if any.
    pub fn folder_name(&self) -> Option<&'static str> {
        match self {
            ResourceKind::Courseware => None,
            ResourceKind::Video => Some("Videos"),
            ResourceKind::Homework => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Courseware => write!(f, "courseware"),
            ResourceKind::Video => write!(f, "video"),
            ResourceKind::Homework => write!(f, "homework"),
        }
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "courseware" | "coursewares" => Ok(ResourceKind::Courseware),
            "video" | "videos" => Ok(ResourceKind::Video),
            "homework" | "homeworks" => Ok(ResourceKind::Homework),
            _ => Err(format!("Unknown resource kind: {}", s)),
        }
    }
}

/// An enrolled course as listed on the portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Display name of the course site.
    pub name: String,

    /// URL of the course site's main page.
    pub url: String,
}

impl Course {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A downloadable resource discovered on the portal.
///
/// Produced by discovery and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Name of the course the resource belongs to.
    pub course: String,

    /// Folder names from the course root down to the resource.
    pub subdir: Vec<String>,

    /// URL-decoded file name.
    pub file_name: String,

    /// Absolute download URL.
    pub url: String,

    /// Remote change marker (displayed date, or empty for checksum policy).
    pub marker: String,

    pub kind: ResourceKind,
}

impl ResourceDescriptor {
    /// Stable ledger key: `course/subfolder.../file name`.
    pub fn key(&self) -> String {
        let mut parts = Vec::with_capacity(self.subdir.len() + 2);
        parts.push(self.course.as_str());
        parts.extend(self.subdir.iter().map(String::as_str));
        parts.push(self.file_name.as_str());
        parts.join("/")
    }
}
