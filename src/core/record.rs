//! In-memory waypoint mapping and its line format.
//!
//! A [`Waypoints`] value is the whole store held in memory: an ordered list of
//! [`WaypointRecord`]s with unique names.  Insertion order is kept so that
//! listing is deterministic and matches the order of lines in the file.

use crate::error::{Result, WaypointError};

/// Separator between name and path on each store line.
pub const SEPARATOR: &str = " => ";

// ───────────────────────────────────────── record ────────────

/// One named bookmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaypointRecord {
    pub name: String,
    /// Absolute path captured at `set` time.  Opaque: never checked for
    /// existence.
    pub target_path: String,
}

impl WaypointRecord {
    pub fn new(name: impl Into<String>, target_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_path: target_path.into(),
        }
    }

    /// `name => target_path` without the trailing newline.
    pub fn to_line(&self) -> String {
        format!("{}{SEPARATOR}{}", self.name, self.target_path)
    }

    /// Split a single non-empty line on the first separator.
    pub fn parse_line(line: &str) -> Option<Self> {
        let (name, path) = line.split_once(SEPARATOR)?;
        Some(Self::new(name, path))
    }
}

// ───────────────────────────────────────── mapping ───────────

/// Ordered name → path mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Waypoints {
    records: Vec<WaypointRecord>,
}

impl Waypoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.records.iter().position(|r| r.name == name)
    }

    /// Stored path for `name`.
    pub fn get(&self, name: &str) -> Result<&str> {
        self.records
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.target_path.as_str())
            .ok_or_else(|| WaypointError::NotFound {
                name: name.to_string(),
            })
    }

    /// Insert or overwrite.  An overwritten record keeps its position.
    ///
    /// Only rejects what the line format cannot represent; the reserved-name
    /// check lives in [`crate::core::policy`].
    pub fn set(&mut self, name: &str, target_path: &str) -> Result<()> {
        if name.is_empty() {
            return Err(WaypointError::InvalidArgument(
                "name must not be empty".into(),
            ));
        }
        if name.contains(SEPARATOR) || name.chars().any(char::is_control) {
            return Err(WaypointError::InvalidArgument(format!(
                "name must not contain '{}' or control characters",
                SEPARATOR.trim()
            )));
        }
        // Control characters would be acted on by the terminal when typed back.
        if target_path.chars().any(char::is_control) {
            return Err(WaypointError::InvalidArgument(
                "path must not contain control characters".into(),
            ));
        }

        match self.position(name) {
            Some(idx) => self.records[idx].target_path = target_path.to_string(),
            None => self.records.push(WaypointRecord::new(name, target_path)),
        }
        Ok(())
    }

    /// Remove `name`, returning its old path.  Absent names are reported as
    /// [`WaypointError::NotFound`] rather than silently ignored.
    pub fn remove(&mut self, name: &str) -> Result<String> {
        match self.position(name) {
            Some(idx) => Ok(self.records.remove(idx).target_path),
            None => Err(WaypointError::NotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Names in listing order.
    pub fn list(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    /// Serialise every record as `name => path\n`.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&record.to_line());
            out.push('\n');
        }
        out
    }

    /// Parse store text.  Returns the 1-based number and content of the first
    /// malformed line on failure.
    ///
    /// Duplicate names collapse onto the first occurrence, last value wins.
    pub fn parse(text: &str) -> std::result::Result<Self, (usize, String)> {
        text.lines()
            .enumerate()
            .filter(|(_, raw)| !raw.is_empty())
            .map(|(idx, raw)| WaypointRecord::parse_line(raw).ok_or((idx + 1, raw.to_string())))
            .collect()
    }
}

impl FromIterator<WaypointRecord> for Waypoints {
    fn from_iter<I: IntoIterator<Item = WaypointRecord>>(iter: I) -> Self {
        let mut waypoints = Self::new();
        for record in iter {
            match waypoints.position(&record.name) {
                Some(pos) => waypoints.records[pos] = record,
                None => waypoints.records.push(record),
            }
        }
        waypoints
    }
}
