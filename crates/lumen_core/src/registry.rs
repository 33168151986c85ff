//! Scoped name registries.
//!
//! Every named GUI or scene object registers its name at construction and
//! releases it on deletion. A registry is an explicit object handed to each
//! context, so independent GUIs never collide.
//!
//! The handle is cheap to clone; clones share the same name sets. The lock
//! only makes sharing safe, registration order across threads is still the
//! caller's business.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{GfxError, GfxResult};

/// The per-type namespaces a registry keeps apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Leaf widgets (buttons, checkboxes, text, images).
    Widget,
    /// Containers (panels, tab panels).
    Container,
    /// Cameras.
    Camera,
    /// Point, spot and directional lights.
    Light,
    /// Lens flares attached to lights.
    LensFlare,
    /// Billboards.
    Billboard,
}

impl EntityKind {
    /// Lowercase display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Widget => "widget",
            Self::Container => "container",
            Self::Camera => "camera",
            Self::Light => "light",
            Self::LensFlare => "lens flare",
            Self::Billboard => "billboard",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared handle to a set of per-kind name registries.
#[derive(Clone, Default)]
pub struct NameRegistry {
    names: Arc<Mutex<HashMap<EntityKind, HashSet<String>>>>,
}

impl NameRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `name` within `kind`.
    pub fn register(&self, kind: EntityKind, name: &str) -> GfxResult<()> {
        if name.is_empty() {
            return Err(GfxError::EmptyName);
        }

        let mut names = self.names.lock();
        let set = names.entry(kind).or_default();
        if set.contains(name) {
            tracing::debug!(%kind, name, "rejected duplicate name");
            return Err(GfxError::DuplicateName {
                kind,
                name: name.to_owned(),
            });
        }

        set.insert(name.to_owned());
        tracing::trace!(%kind, name, "registered");
        Ok(())
    }

    /// Releases `name`. Returns false if it was not registered.
    pub fn unregister(&self, kind: EntityKind, name: &str) -> bool {
        let removed = self
            .names
            .lock()
            .get_mut(&kind)
            .is_some_and(|set| set.remove(name));
        if removed {
            tracing::trace!(%kind, name, "unregistered");
        }
        removed
    }

    /// Returns true if `name` is currently taken within `kind`.
    #[must_use]
    pub fn contains(&self, kind: EntityKind, name: &str) -> bool {
        self.names
            .lock()
            .get(&kind)
            .is_some_and(|set| set.contains(name))
    }

    /// Number of names registered for `kind`.
    #[must_use]
    pub fn len(&self, kind: EntityKind) -> usize {
        self.names.lock().get(&kind).map_or(0, HashSet::len)
    }

    /// Returns true if no names are registered at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.lock().values().all(HashSet::is_empty)
    }
}

impl fmt::Debug for NameRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names.lock();
        let mut counts: Vec<_> = names.iter().map(|(k, v)| (k.as_str(), v.len())).collect();
        counts.sort_unstable();
        f.debug_struct("NameRegistry").field("counts", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_rejected() {
        let registry = NameRegistry::new();
        registry.register(EntityKind::Widget, "ok").unwrap();

        let err = registry.register(EntityKind::Widget, "ok").unwrap_err();
        assert!(matches!(err, GfxError::DuplicateName { kind: EntityKind::Widget, .. }));
        assert_eq!(registry.len(EntityKind::Widget), 1);
    }

    #[test]
    fn test_kinds_are_separate_namespaces() {
        let registry = NameRegistry::new();
        registry.register(EntityKind::Widget, "main").unwrap();
        registry.register(EntityKind::Container, "main").unwrap();
        registry.register(EntityKind::Camera, "main").unwrap();

        assert!(registry.contains(EntityKind::Container, "main"));
        assert!(!registry.contains(EntityKind::Light, "main"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let registry = NameRegistry::new();
        assert_eq!(registry.register(EntityKind::Light, ""), Err(GfxError::EmptyName));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unregister_frees_name() {
        let registry = NameRegistry::new();
        registry.register(EntityKind::Billboard, "tree").unwrap();
        assert!(registry.unregister(EntityKind::Billboard, "tree"));
        assert!(!registry.unregister(EntityKind::Billboard, "tree"));
        registry.register(EntityKind::Billboard, "tree").unwrap();
    }

    #[test]
    fn test_clones_share_names() {
        let a = NameRegistry::new();
        let b = a.clone();
        a.register(EntityKind::Camera, "main").unwrap();
        assert!(b.register(EntityKind::Camera, "main").is_err());
    }
}
