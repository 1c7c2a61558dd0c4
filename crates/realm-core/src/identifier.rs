//! Component and module identifiers, and the factory that builds module identifiers.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// `(group, module, version)` identity of a resolved component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentIdentifier {
    pub group: String,
    pub module: String,
    pub version: String,
}

impl ComponentIdentifier {
    pub fn new(group: &str, module: &str, version: &str) -> Self {
        Self {
            group: group.to_string(),
            module: module.to_string(),
            version: version.to_string(),
        }
    }

    /// Parse `"group:module:version"`.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() == 3 && parts.iter().all(|p| !p.is_empty()) {
            Some(Self::new(parts[0], parts[1], parts[2]))
        } else {
            None
        }
    }
}

impl fmt::Display for ComponentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.module, self.version)
    }
}

/// `(group, module)` identity of a module, independent of version.
///
/// Both parts are shared strings so that an interning factory can hand out
/// identifiers that point at the same storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleIdentifier {
    pub group: Arc<str>,
    pub name: Arc<str>,
}

impl ModuleIdentifier {
    pub fn new(group: &str, name: &str) -> Self {
        Self {
            group: Arc::from(group),
            name: Arc::from(name),
        }
    }

    /// Parse `"group:module"`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.split_once(':') {
            Some((group, name)) if !group.is_empty() && !name.is_empty() && !name.contains(':') => {
                Some(Self::new(group, name))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ModuleIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)
    }
}

/// Builds module identifiers from `(group, module)` pairs.
pub trait ModuleIdentifierFactory: Send + Sync {
    fn module(&self, group: &str, name: &str) -> ModuleIdentifier;
}

/// Allocates a fresh identifier on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultModuleIdentifierFactory;

impl ModuleIdentifierFactory for DefaultModuleIdentifierFactory {
    fn module(&self, group: &str, name: &str) -> ModuleIdentifier {
        ModuleIdentifier::new(group, name)
    }
}

/// Hands out one shared identifier per distinct `(group, module)` pair.
#[derive(Debug, Default)]
pub struct InterningModuleIdentifierFactory {
    interned: Mutex<HashSet<ModuleIdentifier>>,
}

impl InterningModuleIdentifierFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct identifiers handed out so far.
    pub fn len(&self) -> usize {
        self.interned.lock().map(|set| set.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ModuleIdentifierFactory for InterningModuleIdentifierFactory {
    fn module(&self, group: &str, name: &str) -> ModuleIdentifier {
        let candidate = ModuleIdentifier::new(group, name);
        // Poisoned lock: fall back to an unshared identifier.
        let Ok(mut interned) = self.interned.lock() else {
            return candidate;
        };
        if let Some(existing) = interned.get(&candidate) {
            return existing.clone();
        }
        interned.insert(candidate.clone());
        candidate
    }
}
