//! Platform detection: decides whether a variant's dependencies are forced.

use realm_core::config::PlatformConfig;
use realm_core::variant::ComponentVariant;

/// Decides whether every dependency of a variant must be forced.
pub trait PlatformSupport: Send + Sync {
    fn is_forced_dependency_source(&self, variant: &ComponentVariant) -> bool;
}

impl<F> PlatformSupport for F
where
    F: Fn(&ComponentVariant) -> bool + Send + Sync,
{
    fn is_forced_dependency_source(&self, variant: &ComponentVariant) -> bool {
        self(variant)
    }
}

/// Forces dependencies of variants whose declared category is an enforced platform.
///
/// Looks at the variant as declared, before attribute rules run.
#[derive(Debug, Clone)]
pub struct CategoryPlatformSupport {
    attribute: String,
    forced_categories: Vec<String>,
}

impl CategoryPlatformSupport {
    pub fn new(config: &PlatformConfig) -> Self {
        Self {
            attribute: config.category_attribute.clone(),
            forced_categories: config.forced_categories.clone(),
        }
    }
}

impl Default for CategoryPlatformSupport {
    fn default() -> Self {
        Self::new(&PlatformConfig::default())
    }
}

impl PlatformSupport for CategoryPlatformSupport {
    fn is_forced_dependency_source(&self, variant: &ComponentVariant) -> bool {
        variant
            .attributes
            .get(&self.attribute)
            .and_then(|v| v.as_str())
            .is_some_and(|category| self.forced_categories.iter().any(|c| c == category))
    }
}
