//! Capabilities a variant claims to provide.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A `(group, name, version)` capability coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Capability {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl Capability {
    pub fn new(group: &str, name: &str, version: &str) -> Self {
        Self {
            group: group.to_string(),
            name: name.to_string(),
            version: version.to_string(),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

/// Capabilities deduplicated by coordinate, kept in first-declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Capability>", into = "Vec<Capability>")]
pub struct CapabilitySet {
    capabilities: Vec<Capability>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from any sequence, dropping repeated coordinates.
    pub fn of(capabilities: impl IntoIterator<Item = Capability>) -> Self {
        capabilities.into_iter().fold(Self::new(), Self::with)
    }

    /// Returns a set that also contains `capability`.
    pub fn with(mut self, capability: Capability) -> Self {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
        self
    }

    /// Returns a set without `capability`.
    pub fn without(mut self, capability: &Capability) -> Self {
        self.capabilities.retain(|c| c != capability);
        self
    }

    pub fn contains(&self, capability: &Capability) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.capabilities.iter()
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

impl From<Vec<Capability>> for CapabilitySet {
    fn from(capabilities: Vec<Capability>) -> Self {
        Self::of(capabilities)
    }
}

impl From<CapabilitySet> for Vec<Capability> {
    fn from(set: CapabilitySet) -> Self {
        set.capabilities
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self::of(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of_deduplicates_by_coordinate() {
        let set = CapabilitySet::of([
            Capability::new("g", "a", "1"),
            Capability::new("g", "b", "1"),
            Capability::new("g", "a", "1"),
        ]);
        assert_eq!(set.len(), 2);
        let names: Vec<&str> = set.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn version_is_part_of_the_coordinate() {
        let set = CapabilitySet::of([Capability::new("g", "a", "1"), Capability::new("g", "a", "2")]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn without_removes_coordinate() {
        let cap = Capability::new("g", "a", "1");
        let set = CapabilitySet::new().with(cap.clone()).without(&cap);
        assert!(set.is_empty());
    }
}
