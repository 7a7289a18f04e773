use super::path::PathPattern;
use super::policy::CorsPolicy;
use crate::error::CorsError;
use std::sync::Arc;

/// Immutable table mapping path patterns to CORS policies.
///
/// Cloning is cheap; all clones share the same registrations.
#[derive(Debug, Clone, Default)]
pub struct CorsRegistry {
    entries: Arc<Vec<(PathPattern, CorsPolicy)>>,
}

impl CorsRegistry {
    pub fn builder() -> CorsRegistryBuilder {
        CorsRegistryBuilder::default()
    }

    /// First registered policy whose pattern matches `path`
    pub fn policy_for(&self, path: &str) -> Option<&CorsPolicy> {
        self.entries
            .iter()
            .find(|(pattern, _)| pattern.matches(path))
            .map(|(_, policy)| policy)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects registrations during startup
#[derive(Debug, Default)]
pub struct CorsRegistryBuilder {
    entries: Vec<(PathPattern, CorsPolicy)>,
}

impl CorsRegistryBuilder {
    /// Register `policy` for requests whose path matches `pattern`.
    ///
    /// Re-registering a pattern replaces the earlier policy but keeps its position.
    pub fn register(mut self, pattern: &str, policy: CorsPolicy) -> Result<Self, CorsError> {
        let pattern = PathPattern::new(pattern)?;
        tracing::debug!(pattern = %pattern, "Registering CORS policy");

        match self.entries.iter_mut().find(|(existing, _)| *existing == pattern) {
            Some(entry) => entry.1 = policy,
            None => self.entries.push((pattern, policy)),
        }
        Ok(self)
    }

    pub fn build(self) -> CorsRegistry {
        CorsRegistry {
            entries: Arc::new(self.entries),
        }
    }
}
