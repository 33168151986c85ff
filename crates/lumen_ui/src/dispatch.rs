//! Event-bubbling dispatcher.
//!
//! Resolves which single element owns the pointer and routes mouse and key
//! input to it.
//!
//! ## Resolution
//!
//! ```text
//! top-level containers, z desc (ties: first registered)
//!   └─ first visible one containing p
//!        └─ its first visible child containing p (z desc, ties: first inserted)
//!             └─ ... until a widget, or a container with no such child
//! ```
//!
//! Hidden elements are skipped. Disabled elements are still resolved (they
//! occlude what lies beneath) but never receive clicks or keys.
//!
//! ## State
//!
//! The dispatcher owns two references into the tree: the hovered element
//! (pointer) and the focused element (keyboard). At most one element carries
//! the hovered flag at any time. Hover is changed by [`mouse_move`] and
//! released when the hovered element is hidden or deleted.
//!
//! [`mouse_move`]: EventDispatcher::mouse_move

use crate::input::{EventKind, UiEvent};
use crate::layout::Position;
use crate::widget::{ElementId, ElementTree, Focusable, Visible};

/// Routes pointer and key input across a forest of top-level containers.
#[derive(Debug, Default)]
pub struct EventDispatcher {
    /// Top-level containers in registration order.
    containers: Vec<ElementId>,
    /// Element under the pointer.
    hovered: Option<ElementId>,
    /// Element receiving keys.
    focused: Option<ElementId>,
}

impl EventDispatcher {
    /// Creates a dispatcher with no containers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a top-level container. Returns false if it was already registered.
    pub fn add_container(&mut self, id: ElementId) -> bool {
        if self.containers.contains(&id) {
            return false;
        }
        self.containers.push(id);
        true
    }

    /// Unregisters a top-level container. Returns false if it was not registered.
    pub fn remove_container(&mut self, id: ElementId) -> bool {
        let before = self.containers.len();
        self.containers.retain(|&c| c != id);
        before != self.containers.len()
    }

    /// Top-level containers in registration order.
    #[must_use]
    pub fn containers(&self) -> &[ElementId] {
        &self.containers
    }

    /// Element currently under the pointer.
    #[must_use]
    pub fn hovered(&self) -> Option<ElementId> {
        self.hovered
    }

    /// Element currently holding keyboard focus.
    #[must_use]
    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    /// Finds the element that owns point `p`, without touching any state.
    #[must_use]
    pub fn resolve(&self, tree: &ElementTree, p: Position) -> Option<ElementId> {
        let mut roots: Vec<(usize, ElementId)> = self
            .containers
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, id)| tree.get(*id).is_some_and(|el| el.state().parent.is_none()))
            .collect();
        // Stable sort: equal z keeps registration order.
        roots.sort_by_key(|(_, id)| {
            tree.get(*id)
                .map_or(std::cmp::Reverse(i32::MIN), |el| std::cmp::Reverse(el.state().z))
        });

        for (_, root) in roots {
            let Some(el) = tree.get(root) else {
                continue;
            };
            if !el.is_visible() {
                continue;
            }
            let rect = el.state().rect;
            if rect.contains(p) {
                return Some(Self::descend(tree, root, rect.position(), p));
            }
        }
        None
    }

    /// Walks down from a container that contains `p` to the innermost owner.
    fn descend(tree: &ElementTree, root: ElementId, root_origin: Position, p: Position) -> ElementId {
        let mut current = root;
        let mut origin = root_origin;

        'outer: loop {
            let Some(el) = tree.get(current) else {
                return current;
            };
            let content = origin.offset(el.padding(), el.padding());

            for &child in el.children() {
                let Some(child_el) = tree.get(child) else {
                    continue;
                };
                if !child_el.is_visible() {
                    continue;
                }
                let abs = child_el.state().rect.translate(content);
                if abs.contains(p) {
                    current = child;
                    origin = abs.position();
                    continue 'outer;
                }
            }
            return current;
        }
    }

    /// Updates hover state for a pointer at `p`.
    ///
    /// Fires `MouseLeave` on the previously hovered element and `MouseEnter`
    /// on the new one when they differ, then `MouseMove` on whatever is
    /// hovered. Returns the hovered element.
    pub fn mouse_move(&mut self, tree: &mut ElementTree, p: Position) -> Option<ElementId> {
        let target = self.resolve(tree, p);

        if target != self.hovered {
            if let Some(old) = self.hovered.take() {
                tracing::trace!(id = old.raw(), "mouse leave");
                tree.set_hovered(old, false, Some(p));
            }
            if let Some(new) = target {
                tracing::trace!(id = new.raw(), "mouse enter");
                tree.set_hovered(new, true, Some(p));
            }
            self.hovered = target;
        }

        if let Some(id) = target {
            if let Some(name) = tree.get(id).map(|el| el.name().to_owned()) {
                tree.notify(id, &UiEvent::new(EventKind::MouseMove, id, &name).at(p));
            }
        }
        target
    }

    /// Delivers a left click at `p`.
    ///
    /// Resolves like [`mouse_move`](Self::mouse_move) but leaves hover alone.
    /// The click only lands on a visible, enabled, focusable element, which
    /// also takes keyboard focus. Clicking empty space clears focus. Returns
    /// true if click listeners ran.
    pub fn mouse_left_click(&mut self, tree: &mut ElementTree, p: Position) -> bool {
        let Some(target) = self.resolve(tree, p) else {
            self.clear_focus(tree);
            return false;
        };

        if !self.is_interactive(tree, target) {
            return false;
        }

        self.set_focus(tree, target);
        tree.activate(target);
        if let Some(name) = tree.get(target).map(|el| el.name().to_owned()) {
            tree.notify(target, &UiEvent::new(EventKind::Click, target, &name).at(p));
        }
        true
    }

    /// Delivers a key to the focused element. Returns true if it was delivered.
    pub fn key_pressed(&mut self, tree: &mut ElementTree, key: char) -> bool {
        let Some(focused) = self.focused else {
            return false;
        };
        if !self.is_interactive(tree, focused) {
            return false;
        }

        tree.apply_key(focused, key);
        if let Some(name) = tree.get(focused).map(|el| el.name().to_owned()) {
            tree.notify(focused, &UiEvent::new(EventKind::KeyPressed, focused, &name).with_key(key));
        }
        true
    }

    /// Moves keyboard focus to `id`. Returns false if it cannot take focus.
    pub fn set_focus(&mut self, tree: &mut ElementTree, id: ElementId) -> bool {
        if self.focused == Some(id) {
            return true;
        }
        if !self.is_interactive(tree, id) {
            return false;
        }

        if let Some(old) = self.focused.take() {
            tree.set_focused(old, false);
        }
        tracing::debug!(id = id.raw(), "focus changed");
        tree.set_focused(id, true);
        self.focused = Some(id);
        true
    }

    /// Drops keyboard focus, firing `FocusLost` if something held it.
    pub fn clear_focus(&mut self, tree: &mut ElementTree) {
        if let Some(old) = self.focused.take() {
            tracing::debug!(id = old.raw(), "focus cleared");
            tree.set_focused(old, false);
        }
    }

    /// Releases hover and focus held by elements that became unreachable.
    ///
    /// Call after hiding, disabling or re-parenting. A hovered element that
    /// is no longer visible gets exactly one `MouseLeave`.
    pub fn release_unreachable(&mut self, tree: &mut ElementTree) {
        if let Some(hovered) = self.hovered {
            if !tree.is_effectively_visible(hovered) {
                self.hovered = None;
                tracing::trace!(id = hovered.raw(), "hover released");
                tree.set_hovered(hovered, false, None);
            }
        }
        if let Some(focused) = self.focused {
            if !self.is_interactive(tree, focused) {
                self.clear_focus(tree);
            }
        }
    }

    /// Releases hover, focus and registration held inside a subtree about to
    /// be deleted.
    pub fn release_subtree(&mut self, tree: &mut ElementTree, root: ElementId) {
        if let Some(hovered) = self.hovered {
            if tree.is_ancestor_or_self(root, hovered) {
                self.hovered = None;
                tree.set_hovered(hovered, false, None);
            }
        }
        if let Some(focused) = self.focused {
            if tree.is_ancestor_or_self(root, focused) {
                self.clear_focus(tree);
            }
        }
        let doomed = tree.subtree(root);
        self.containers.retain(|c| !doomed.contains(c));
    }

    fn is_interactive(&self, tree: &ElementTree, id: ElementId) -> bool {
        tree.get(id).is_some_and(Focusable::is_focusable)
            && tree.is_effectively_visible(id)
            && tree.is_effectively_enabled(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Rect;
    use crate::widget::{ElementKind, NewElement};
    use lumen_core::{NameRegistry, NullBackend};
    use std::sync::Arc;

    fn setup() -> (ElementTree, EventDispatcher) {
        (
            ElementTree::new(NameRegistry::new(), Arc::new(NullBackend)),
            EventDispatcher::new(),
        )
    }

    fn root(tree: &mut ElementTree, d: &mut EventDispatcher, name: &str, rect: Rect, z: i32) -> ElementId {
        let id = tree
            .insert(NewElement {
                z,
                ..NewElement::new(name, ElementKind::Panel, rect)
            })
            .unwrap();
        d.add_container(id);
        id
    }

    fn hovered_count(tree: &ElementTree) -> usize {
        tree.iter().filter(|el| el.state().flags.has(crate::widget::ElementFlags::HOVERED)).count()
    }

    #[test]
    fn test_duplicate_container_is_ignored() {
        let (mut tree, mut d) = setup();
        let a = root(&mut tree, &mut d, "a", Rect::new(0, 0, 10, 10), 0);
        assert!(!d.add_container(a));
        assert_eq!(d.containers(), &[a]);
    }

    #[test]
    fn test_equal_z_first_registered_wins() {
        let (mut tree, mut d) = setup();
        let a = root(&mut tree, &mut d, "a", Rect::new(0, 0, 50, 50), 0);
        let _b = root(&mut tree, &mut d, "b", Rect::new(0, 0, 50, 50), 0);

        assert_eq!(d.mouse_move(&mut tree, Position::new(10, 10)), Some(a));
    }

    #[test]
    fn test_higher_z_occludes() {
        let (mut tree, mut d) = setup();
        let a = root(&mut tree, &mut d, "a", Rect::new(0, 0, 50, 50), 0);
        let b = root(&mut tree, &mut d, "b", Rect::new(25, 25, 50, 50), 1);

        assert_eq!(d.mouse_move(&mut tree, Position::new(30, 30)), Some(b));
        assert!(!tree.get(a).unwrap().state().flags.has(crate::widget::ElementFlags::HOVERED));
        assert_eq!(d.mouse_move(&mut tree, Position::new(5, 5)), Some(a));
        assert_eq!(hovered_count(&tree), 1);
    }

    #[test]
    fn test_outside_clears_hover() {
        let (mut tree, mut d) = setup();
        root(&mut tree, &mut d, "a", Rect::new(0, 0, 50, 50), 0);

        d.mouse_move(&mut tree, Position::new(10, 10));
        assert_eq!(d.mouse_move(&mut tree, Position::new(100, 100)), None);
        assert_eq!(d.hovered(), None);
        assert_eq!(hovered_count(&tree), 0);
    }

    #[test]
    fn test_hidden_root_skipped() {
        let (mut tree, mut d) = setup();
        let a = root(&mut tree, &mut d, "a", Rect::new(0, 0, 50, 50), 0);
        let b = root(&mut tree, &mut d, "b", Rect::new(0, 0, 50, 50), 5);
        tree.set_visible(b, false).unwrap();

        assert_eq!(d.resolve(&tree, Position::new(1, 1)), Some(a));
    }

    #[test]
    fn test_descends_to_innermost() {
        let (mut tree, mut d) = setup();
        let a = root(&mut tree, &mut d, "a", Rect::new(10, 10, 100, 100), 0);
        let inner = tree
            .insert(NewElement {
                parent: Some(a),
                ..NewElement::new("inner", ElementKind::Panel, Rect::new(10, 10, 50, 50))
            })
            .unwrap();
        let ok = tree
            .insert(NewElement {
                parent: Some(inner),
                ..NewElement::new("ok", ElementKind::Button { text: "OK".into() }, Rect::new(0, 0, 10, 10))
            })
            .unwrap();

        assert_eq!(d.resolve(&tree, Position::new(25, 25)), Some(ok));
        assert_eq!(d.resolve(&tree, Position::new(35, 35)), Some(inner));
        assert_eq!(d.resolve(&tree, Position::new(15, 15)), Some(a));
    }
}
