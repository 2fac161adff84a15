//! Entity registry.
//!
//! Holds declared entities by canonical name. The first declaration of a name
//! wins; later declarations are logged and ignored for resolution.
//!
//! Names that were never declared can still resolve through entity
//! transformers, which map a canonical name to a synthesized (usually
//! external) entity. [`ExternalEntityPattern`] is the common case: names
//! matching a regex link into another documentation site.

use std::borrow::Cow;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use regex::Regex;
use yd_tree::EntityAnchor;

use crate::entity::{Entity, validate_anchor_name};
use crate::error::ProjectError;

/// Maps a canonical name to an entity that was not declared explicitly.
pub type EntityTransformer<D> = Box<dyn Fn(&str) -> Option<Entity<D>> + Send + Sync>;

/// Registry of declared entities, keyed by canonical name.
pub struct EntityRegistry<D = ()> {
    entities: HashMap<String, Entity<D>>,
    transformers: Vec<EntityTransformer<D>>,
    duplicate_warning: bool,
}

impl<D> Default for EntityRegistry<D> {
    fn default() -> Self {
        Self {
            entities: HashMap::new(),
            transformers: Vec::new(),
            duplicate_warning: true,
        }
    }
}

impl<D> std::fmt::Debug for EntityRegistry<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("entities", &self.entities.len())
            .field("transformers", &self.transformers.len())
            .field("duplicate_warning", &self.duplicate_warning)
            .finish()
    }
}

impl<D> EntityRegistry<D> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log duplicate declarations at warn level (default) or debug level.
    pub fn set_duplicate_warning(&mut self, enabled: bool) {
        self.duplicate_warning = enabled;
    }

    /// Register a transformer consulted for names that were not declared.
    ///
    /// Transformers run in registration order; the first match wins.
    pub fn add_transformer(
        &mut self,
        transformer: impl Fn(&str) -> Option<Entity<D>> + Send + Sync + 'static,
    ) {
        self.transformers.push(Box::new(transformer));
    }

    /// Register an external entity pattern.
    pub fn add_external_pattern(&mut self, pattern: ExternalEntityPattern)
    where
        D: 'static,
    {
        self.add_transformer(move |name| pattern.entity_for(name));
    }

    /// Declare an entity and return the anchor to embed on its page.
    ///
    /// The entity is registered before its anchor name is checked, so an
    /// entity with an invalid anchor still resolves links even though the
    /// caller gets [`ProjectError::InvalidAnchor`]. Redeclaring a name keeps
    /// the first entity and still returns an anchor for the new declaration.
    pub fn declare(&mut self, entity: Entity<D>) -> Result<EntityAnchor, ProjectError> {
        let anchor = EntityAnchor {
            anchor_name: entity.anchor_name.clone(),
            canonical_name: entity.canonical_name.clone(),
        };

        match self.entities.entry(entity.canonical_name.clone()) {
            Entry::Occupied(existing) => {
                let existing = existing.get();
                if self.duplicate_warning {
                    tracing::warn!(
                        canonical_name = %entity.canonical_name,
                        first = %existing.url(),
                        duplicate = %entity.url(),
                        "Duplicate entity declaration, keeping the first"
                    );
                } else {
                    tracing::debug!(
                        canonical_name = %entity.canonical_name,
                        "Duplicate entity declaration, keeping the first"
                    );
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(entity);
            }
        }

        validate_anchor_name(&anchor.anchor_name, &anchor.canonical_name)?;
        Ok(anchor)
    }

    /// Declared entity with the given name.
    #[must_use]
    pub fn get(&self, canonical_name: &str) -> Option<&Entity<D>> {
        self.entities.get(canonical_name)
    }

    /// True if the name was declared.
    #[must_use]
    pub fn contains(&self, canonical_name: &str) -> bool {
        self.entities.contains_key(canonical_name)
    }

    /// Declared entities sorted by canonical name.
    #[must_use]
    pub fn entities(&self) -> Vec<&Entity<D>> {
        let mut entities: Vec<_> = self.entities.values().collect();
        entities.sort_by(|a, b| a.canonical_name.cmp(&b.canonical_name));
        entities
    }

    /// Number of declared entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<D: Clone> EntityRegistry<D> {
    /// Look up a link target: declared entities first, then transformers.
    #[must_use]
    pub fn resolve(&self, canonical_name: &str) -> Option<Cow<'_, Entity<D>>> {
        if let Some(entity) = self.entities.get(canonical_name) {
            return Some(Cow::Borrowed(entity));
        }
        self.transformers
            .iter()
            .find_map(|transform| transform(canonical_name))
            .map(Cow::Owned)
    }
}

/// Links canonical names matching a regex to an external documentation site.
///
/// The page URI is `to_prefix`, the canonical name with `.` replaced by `/`,
/// then `to_suffix`: with prefix `https://docs.oracle.com/javase/8/docs/api/`
/// and suffix `.html`, `java.lang.String` maps to
/// `https://docs.oracle.com/javase/8/docs/api/java/lang/String.html`.
#[derive(Debug, Clone)]
pub struct ExternalEntityPattern {
    from: Regex,
    to_prefix: String,
    to_suffix: String,
}

impl ExternalEntityPattern {
    /// Compile a pattern.
    pub fn new(
        from: &str,
        to_prefix: impl Into<String>,
        to_suffix: Option<&str>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            from: Regex::new(from)?,
            to_prefix: to_prefix.into(),
            to_suffix: to_suffix.unwrap_or_default().to_owned(),
        })
    }

    /// External entity for `canonical_name`, if the pattern matches.
    #[must_use]
    pub fn entity_for<D>(&self, canonical_name: &str) -> Option<Entity<D>> {
        if !self.from.is_match(canonical_name) {
            return None;
        }
        let page_uri = format!(
            "{}{}{}",
            self.to_prefix,
            canonical_name.replace('.', "/"),
            self.to_suffix
        );
        Some(Entity::external(canonical_name, page_uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;

    #[test]
    fn test_declare_and_resolve() {
        let mut registry: EntityRegistry = EntityRegistry::new();
        let anchor = registry.declare(Entity::new("b", "/c", "b")).unwrap();

        assert_eq!(anchor.anchor_name, "b");
        assert_eq!(anchor.canonical_name, "b");
        assert_eq!(registry.resolve("b").unwrap().url(), "/c#b");
        assert!(registry.resolve("missing").is_none());
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let mut registry: EntityRegistry = EntityRegistry::new();
        registry.declare(Entity::new("b", "/first", "b")).unwrap();
        let anchor = registry.declare(Entity::new("b", "/second", "b2")).unwrap();

        // Still returns an anchor for the duplicate declaration
        assert_eq!(anchor.anchor_name, "b2");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("b").unwrap().page_uri, "/first");
    }

    #[test]
    fn test_invalid_anchor_is_registered_but_reported() {
        let mut registry: EntityRegistry = EntityRegistry::new();
        let result = registry.declare(Entity::new("bad", "/p", "has space"));

        assert!(matches!(result, Err(ProjectError::InvalidAnchor { .. })));
        assert!(registry.contains("bad"));
    }

    #[test]
    fn test_entities_sorted() {
        let mut registry: EntityRegistry = EntityRegistry::new();
        for name in ["zeta", "alpha", "mu"] {
            registry.declare(Entity::new(name, "/p", name)).unwrap();
        }
        let names: Vec<_> = registry
            .entities()
            .iter()
            .map(|e| e.canonical_name.as_str())
            .collect();
        assert_eq!(names, vec!["alpha", "mu", "zeta"]);
    }

    #[test]
    fn test_transformer_used_for_undeclared_names() {
        let mut registry: EntityRegistry = EntityRegistry::new();
        registry.add_transformer(|name| {
            name.starts_with("std::")
                .then(|| Entity::external(name, format!("https://doc.rust-lang.org/{name}")))
        });

        let entity = registry.resolve("std::vec").unwrap();
        assert_eq!(entity.kind, EntityKind::External);
        assert_eq!(entity.url(), "https://doc.rust-lang.org/std::vec");
        assert!(registry.resolve("core::mem").is_none());
        assert!(!registry.contains("std::vec"));
    }

    #[test]
    fn test_declared_entity_wins_over_transformer() {
        let mut registry: EntityRegistry = EntityRegistry::new();
        registry.add_transformer(|name| Some(Entity::external(name, "https://elsewhere")));
        registry.declare(Entity::new("local", "/local", "local")).unwrap();

        assert_eq!(registry.resolve("local").unwrap().url(), "/local#local");
    }

    #[test]
    fn test_external_pattern() {
        let pattern = ExternalEntityPattern::new(
            r"^java\.",
            "https://docs.oracle.com/javase/8/docs/api/",
            Some(".html"),
        )
        .unwrap();
        let mut registry: EntityRegistry = EntityRegistry::new();
        registry.add_external_pattern(pattern);

        let entity = registry.resolve("java.lang.String").unwrap();
        assert_eq!(
            entity.url(),
            "https://docs.oracle.com/javase/8/docs/api/java/lang/String.html"
        );
        assert!(registry.resolve("com.example.Widget").is_none());
    }

    #[test]
    fn test_external_pattern_without_suffix() {
        let pattern = ExternalEntityPattern::new("^org\\.", "https://example.org/", None).unwrap();
        let entity: Entity = pattern.entity_for("org.example.Thing").unwrap();
        assert_eq!(entity.page_uri, "https://example.org/org/example/Thing");
        assert!(entity.anchor_name.is_empty());
    }

    #[test]
    fn test_external_pattern_rejects_bad_regex() {
        assert!(ExternalEntityPattern::new("(", "https://x/", None).is_err());
    }
}
