//! Dotted numeric versions as declared in `modinfo.xml`.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::ManifestError;

/// A `major[.minor[.build[.revision]]]` version. Missing components compare as 0,
/// so `1.0` equals `1.0.0`, while `Display` keeps the components as written.
#[derive(Debug, Clone, Copy)]
pub struct ModVersion {
    parts: [u32; 4],
    len: usize,
}

impl PartialEq for ModVersion {
    fn eq(&self, other: &Self) -> bool {
        self.parts == other.parts
    }
}

impl Eq for ModVersion {}

impl Hash for ModVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parts.hash(state);
    }
}

impl Ord for ModVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parts.cmp(&other.parts)
    }
}

impl PartialOrd for ModVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for ModVersion {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ManifestError::InvalidVersion(s.to_string());

        let fields: Vec<&str> = s.trim().split('.').collect();
        if fields.len() > 4 {
            return Err(invalid());
        }

        let mut parts = [0u32; 4];
        for (part, field) in parts.iter_mut().zip(&fields) {
            *part = field.parse().map_err(|_| invalid())?;
        }

        Ok(Self {
            parts,
            len: fields.len(),
        })
    }
}

impl fmt::Display for ModVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: Vec<String> = self.parts[..self.len].iter().map(u32::to_string).collect();
        f.write_str(&text.join("."))
    }
}
