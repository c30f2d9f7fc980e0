//! Backend registry used by commands to pick backends by id.

use super::Backend;

/// Ordered set of backends a command operates on.
#[derive(Debug, Clone)]
pub struct BackendRegistry {
    backends: Vec<Backend>,
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_default_backends()
    }
}

impl BackendRegistry {
    /// Create a registry with every supported backend.
    pub fn with_default_backends() -> Self {
        Self {
            backends: Backend::ALL.to_vec(),
        }
    }

    /// Get all registered backends.
    pub fn all(&self) -> &[Backend] {
        &self.backends
    }

    /// Get a backend by id.
    pub fn get(&self, id: &str) -> Option<Backend> {
        self.backends.iter().copied().find(|b| b.id() == id)
    }

    /// Either the single requested backend or all of them.
    pub fn selected(&self, backend: Option<Backend>) -> Vec<Backend> {
        match backend {
            Some(b) => vec![b],
            None => self.backends.clone(),
        }
    }

    pub fn backend_ids(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.id()).collect()
    }
}
