//! Link resolution over a page's tree.
//!
//! Links are never edited field by field: a resolvable or terminal link node
//! is replaced at its position with a new node in the next state.

use yd_tree::{EntityLink, Node, Page};

use crate::registry::EntityRegistry;

/// Every link on the page still awaiting resolution, in document order.
#[must_use]
pub fn find_pending_links(page: &Page) -> Vec<&EntityLink> {
    page.pending_links()
}

/// Resolve every pending link whose target the registry knows.
///
/// Returns only the links resolved by this call. Links that are already
/// resolved or broken are left alone, so calling this again is a no-op.
pub fn resolve_links<D: Clone>(page: &mut Page, registry: &EntityRegistry<D>) -> Vec<EntityLink> {
    let mut resolved = Vec::new();
    page.root.walk_mut(&mut |node| {
        let Node::LinkToEntity(link) = node else {
            return;
        };
        if !link.is_pending() || link.is_broken() {
            return;
        }
        let Some(entity) = registry.resolve(&link.target_canonical_name) else {
            return;
        };
        let link = link.to_resolved(entity.url(), None);
        resolved.push(link.clone());
        *node = Node::LinkToEntity(link);
    });
    resolved
}

/// Replace every still-pending link with its broken form.
///
/// Returns the links broken by this call.
pub fn break_pending_links(page: &mut Page) -> Vec<EntityLink> {
    let mut broken = Vec::new();
    page.root.walk_mut(&mut |node| {
        let Node::LinkToEntity(link) = node else {
            return;
        };
        if !link.is_pending() || link.is_broken() {
            return;
        }
        let link = link.to_broken();
        broken.push(link.clone());
        *node = Node::LinkToEntity(link);
    });
    broken
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use pretty_assertions::assert_eq;
    use yd_tree::{LinkState, builder as md};

    fn page_linking(targets: &[&str]) -> Page {
        let links = targets
            .iter()
            .map(|t| md::link_to_entity(*t, None))
            .collect();
        Page::new("/p", md::root(vec![md::paragraph(links)])).unwrap()
    }

    #[test]
    fn test_find_pending_links() {
        let page = page_linking(&["a", "b"]);
        let names: Vec<_> = find_pending_links(&page)
            .iter()
            .map(|l| l.target_canonical_name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_resolves_known_targets_only() {
        let mut registry: EntityRegistry = EntityRegistry::new();
        registry.declare(Entity::new("a", "/pages/a", "a")).unwrap();
        let mut page = page_linking(&["a", "b"]);

        let resolved = resolve_links(&mut page, &registry);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].url(), Some("/pages/a#a"));
        let remaining: Vec<_> = find_pending_links(&page)
            .iter()
            .map(|l| l.target_canonical_name.clone())
            .collect();
        assert_eq!(remaining, vec!["b".to_owned()]);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let mut registry: EntityRegistry = EntityRegistry::new();
        registry.declare(Entity::new("a", "/a", "a")).unwrap();
        let mut page = page_linking(&["a"]);

        resolve_links(&mut page, &registry);
        let after_first = page.clone();
        let resolved_again = resolve_links(&mut page, &registry);

        assert!(resolved_again.is_empty());
        assert_eq!(page, after_first);
    }

    #[test]
    fn test_empty_anchor_omits_fragment() {
        let mut registry: EntityRegistry = EntityRegistry::new();
        registry.add_transformer(|name| Some(Entity::external(name, "https://example.org/x")));
        let mut page = page_linking(&["x"]);

        let resolved = resolve_links(&mut page, &registry);

        assert_eq!(resolved[0].url(), Some("https://example.org/x"));
    }

    #[test]
    fn test_nested_links_resolved() {
        let mut registry: EntityRegistry = EntityRegistry::new();
        registry.declare(Entity::new("deep", "/d", "deep")).unwrap();
        let mut page = Page::new(
            "/p",
            md::root(vec![md::list(
                false,
                vec![md::list_item(vec![md::paragraph(vec![md::emphasis(vec![
                    md::link_to_entity("deep", Some("Deep")),
                ])])])],
            )]),
        )
        .unwrap();

        assert_eq!(resolve_links(&mut page, &registry).len(), 1);
        assert_eq!(page.pending_link_count(), 0);
    }

    #[test]
    fn test_break_pending_links_keeps_name_and_text() {
        let mut page = Page::new(
            "/x",
            md::root(vec![md::paragraph(vec![md::link_to_entity(
                "never",
                Some("Never"),
            )])]),
        )
        .unwrap();

        let broken = break_pending_links(&mut page);

        assert_eq!(
            broken,
            vec![EntityLink {
                target_canonical_name: "never".to_owned(),
                link_text: "Never".to_owned(),
                state: LinkState::Broken,
            }]
        );
        assert_eq!(page.pending_link_count(), 0);
        // Broken links are terminal
        assert!(break_pending_links(&mut page).is_empty());
    }

    #[test]
    fn test_broken_links_are_not_resolved_later() {
        let mut page = page_linking(&["late"]);
        break_pending_links(&mut page);

        let mut registry: EntityRegistry = EntityRegistry::new();
        registry.declare(Entity::new("late", "/late", "late")).unwrap();

        assert!(resolve_links(&mut page, &registry).is_empty());
    }
}
