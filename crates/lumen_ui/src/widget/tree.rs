//! Element tree for hierarchical GUI management.
//!
//! Containers exclusively own their children: deleting a container deletes
//! its whole subtree. Children keep a parent ID for lookup only. Sibling
//! lists are kept in hit-test order (higher z first, older first on ties).

use std::collections::HashMap;

use lumen_core::{EntityKind, Font, GfxError, GfxResult, NameRegistry, SharedBackend};

use super::core::{
    ElementFlags, ElementId, ElementKind, ElementState, Focusable, Hoverable, Positionable,
    Sizeable, Visible,
};
use crate::input::{EventKind, Listener, Listeners, UiEvent, BACKSPACE};
use crate::layout::{Position, Rect, Size};
use crate::style::{MaterialSet, VisualState};

/// A widget or container.
#[derive(Debug)]
pub struct Element {
    state: ElementState,
    kind: ElementKind,
    children: Vec<ElementId>,
    padding: i32,
    materials: MaterialSet,
    font: Option<Font>,
    listeners: Listeners,
}

impl Element {
    /// Element ID.
    #[must_use]
    pub fn id(&self) -> ElementId {
        self.state.id
    }

    /// Element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// Shared state (rect, flags, z, parent).
    #[must_use]
    pub fn state(&self) -> &ElementState {
        &self.state
    }

    /// What the element is.
    #[must_use]
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Children in hit-test order (empty for widgets).
    #[must_use]
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// Inner padding applied to children's coordinates.
    #[must_use]
    pub fn padding(&self) -> i32 {
        self.padding
    }

    /// Material set.
    #[must_use]
    pub fn materials(&self) -> &MaterialSet {
        &self.materials
    }

    /// Font, if one was assigned.
    #[must_use]
    pub fn font(&self) -> Option<&Font> {
        self.font.as_ref()
    }

    /// Text for text-bearing widgets.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.kind.text()
    }

    /// Checkbox state; false for every other kind.
    #[must_use]
    pub fn is_checked(&self) -> bool {
        matches!(self.kind, ElementKind::CheckBox { checked: true, .. })
    }

    /// Number of listeners registered for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.count(kind)
    }

    fn visual_state(&self) -> VisualState {
        VisualState {
            enabled: self.state.is_enabled(),
            hovered: self.state.is_hovered(),
            focused: self.state.is_focused(),
            checked: self.is_checked(),
        }
    }
}

impl Positionable for Element {
    fn position(&self) -> Position {
        self.state.position()
    }

    fn set_position(&mut self, position: Position) {
        self.state.set_position(position);
    }
}

impl Sizeable for Element {
    fn size(&self) -> Size {
        self.state.size()
    }

    fn set_size(&mut self, size: Size) {
        self.state.set_size(size);
    }
}

impl Visible for Element {
    fn is_visible(&self) -> bool {
        self.state.is_visible()
    }
}

impl Focusable for Element {
    fn is_focusable(&self) -> bool {
        self.state.is_focusable()
    }

    fn is_focused(&self) -> bool {
        self.state.is_focused()
    }
}

impl Hoverable for Element {
    fn is_hovered(&self) -> bool {
        self.state.is_hovered()
    }
}

/// Everything needed to insert a new element.
#[derive(Debug, Clone)]
pub struct NewElement {
    /// Unique name within the element's registry kind.
    pub name: String,
    /// What to create.
    pub kind: ElementKind,
    /// Parent-relative rectangle.
    pub rect: Rect,
    /// Owning container, if any.
    pub parent: Option<ElementId>,
    /// Hit-test priority among siblings.
    pub z: i32,
    /// Inner padding (containers).
    pub padding: i32,
    /// Materials.
    pub materials: MaterialSet,
    /// Font for text-bearing widgets.
    pub font: Option<Font>,
    /// Accepts focus and clicks.
    pub focusable: bool,
    /// Starts enabled.
    pub enabled: bool,
    /// Starts visible.
    pub visible: bool,
}

impl NewElement {
    /// Defaults for `kind`: visible, enabled, focusable per kind.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ElementKind, rect: Rect) -> Self {
        let focusable = kind.focusable_by_default();
        Self {
            name: name.into(),
            kind,
            rect,
            parent: None,
            z: 0,
            padding: 0,
            materials: MaterialSet::default(),
            font: None,
            focusable,
            enabled: true,
            visible: true,
        }
    }
}

/// Owns every element of one GUI.
pub struct ElementTree {
    elements: HashMap<ElementId, Element>,
    names: HashMap<(EntityKind, String), ElementId>,
    next_id: u64,
    registry: NameRegistry,
    backend: SharedBackend,
}

impl ElementTree {
    /// Creates an empty tree registering names in `registry`.
    #[must_use]
    pub fn new(registry: NameRegistry, backend: SharedBackend) -> Self {
        Self {
            elements: HashMap::with_capacity(64),
            names: HashMap::with_capacity(64),
            next_id: 1,
            registry,
            backend,
        }
    }

    /// The registry names are claimed in.
    #[must_use]
    pub fn registry(&self) -> &NameRegistry {
        &self.registry
    }

    /// Number of live elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the tree holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterates all live elements in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> + '_ {
        self.elements.values()
    }

    /// Gets an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Gets an element by ID or fails with [`GfxError::UnknownElement`].
    pub fn expect(&self, id: ElementId) -> GfxResult<&Element> {
        self.elements.get(&id).ok_or_else(|| unknown(id))
    }

    fn expect_mut(&mut self, id: ElementId) -> GfxResult<&mut Element> {
        self.elements.get_mut(&id).ok_or_else(|| unknown(id))
    }

    /// Looks up an element by registry kind and name.
    #[must_use]
    pub fn find(&self, kind: EntityKind, name: &str) -> Option<ElementId> {
        self.names.get(&(kind, name.to_owned())).copied()
    }

    /// Looks up a widget by name, then a container.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ElementId> {
        self.find(EntityKind::Widget, name)
            .or_else(|| self.find(EntityKind::Container, name))
    }

    /// Inserts a new element, claiming its name.
    pub fn insert(&mut self, new: NewElement) -> GfxResult<ElementId> {
        if let Some(parent) = new.parent {
            let parent_el = self.expect(parent)?;
            if !parent_el.kind.is_container() {
                return Err(GfxError::NotAContainer(parent_el.state.name.clone()));
            }
        }

        let entity_kind = new.kind.entity_kind();
        self.registry.register(entity_kind, &new.name)?;

        let id = ElementId::new(self.next_id);
        self.next_id += 1;

        let mut state = ElementState::new(id, new.name, new.rect);
        state.z = new.z;
        state.flags.assign(ElementFlags::FOCUSABLE, new.focusable);
        state.flags.assign(ElementFlags::ENABLED, new.enabled);
        state.flags.assign(ElementFlags::VISIBLE, new.visible);

        self.names.insert((entity_kind, state.name.clone()), id);
        self.elements.insert(
            id,
            Element {
                state,
                kind: new.kind,
                children: Vec::new(),
                padding: new.padding,
                materials: new.materials,
                font: new.font,
                listeners: Listeners::default(),
            },
        );

        if let Some(parent) = new.parent {
            self.link(parent, id);
            self.inherit_parent_state(id);
        }

        self.push_initial_state(id);
        tracing::debug!(id = id.raw(), kind = entity_kind.as_str(), "element created");
        Ok(id)
    }

    /// Moves `child` under `parent`, detaching it from any previous parent.
    ///
    /// The child keeps its parent-relative rectangle and z-order.
    pub fn attach(&mut self, parent: ElementId, child: ElementId) -> GfxResult<()> {
        let parent_el = self.expect(parent)?;
        if !parent_el.kind.is_container() {
            return Err(GfxError::NotAContainer(parent_el.state.name.clone()));
        }
        self.expect(child)?;
        if self.is_ancestor_or_self(child, parent) {
            return Err(GfxError::invalid(
                "parent",
                "an element cannot be attached inside its own subtree",
            ));
        }

        self.unlink(child);
        self.link(parent, child);
        self.inherit_parent_state(child);
        self.push_positions(child);
        Ok(())
    }

    /// Removes `id` from its parent's child list; it becomes a detached root.
    pub fn detach(&mut self, id: ElementId) {
        self.unlink(id);
    }

    /// Returns true if `ancestor` is `id` or one of its ancestors.
    #[must_use]
    pub fn is_ancestor_or_self(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.elements.get(&cur).and_then(|e| e.state.parent);
        }
        false
    }

    /// Returns `id` and every descendant, parents before children.
    #[must_use]
    pub fn subtree(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(el) = self.elements.get(&cur) {
                out.push(cur);
                stack.extend(el.children.iter().rev().copied());
            }
        }
        out
    }

    /// Absolute screen rectangle, summed from ancestors.
    #[must_use]
    pub fn absolute_rect(&self, id: ElementId) -> Option<Rect> {
        let el = self.elements.get(&id)?;
        let origin = match el.state.parent {
            Some(parent) => self.content_origin(parent)?,
            None => Position::ZERO,
        };
        Some(el.state.rect.translate(origin))
    }

    /// Absolute origin that a container's children are positioned from.
    #[must_use]
    pub fn content_origin(&self, id: ElementId) -> Option<Position> {
        let rect = self.absolute_rect(id)?;
        let padding = self.elements.get(&id)?.padding;
        Some(rect.position().offset(padding, padding))
    }

    /// True if the element and all of its ancestors are visible.
    #[must_use]
    pub fn is_effectively_visible(&self, id: ElementId) -> bool {
        self.all_ancestors(id, |s| s.is_visible())
    }

    /// True if the element and all of its ancestors are enabled.
    #[must_use]
    pub fn is_effectively_enabled(&self, id: ElementId) -> bool {
        self.all_ancestors(id, ElementState::is_enabled)
    }

    fn all_ancestors(&self, id: ElementId, pred: impl Fn(&ElementState) -> bool) -> bool {
        let mut current = Some(id);
        let mut seen_any = false;
        while let Some(cur) = current {
            let Some(el) = self.elements.get(&cur) else {
                return false;
            };
            if !pred(&el.state) {
                return false;
            }
            seen_any = true;
            current = el.state.parent;
        }
        seen_any
    }

    /// Changes an element's z-order and re-sorts its siblings.
    pub fn set_z(&mut self, id: ElementId, z: i32) -> GfxResult<()> {
        let parent = {
            let el = self.expect_mut(id)?;
            el.state.z = z;
            el.state.parent
        };
        if let Some(parent) = parent {
            self.sort_children(parent);
        }
        Ok(())
    }

    /// Shows or hides an element and its whole subtree.
    ///
    /// Showing a tab panel only shows its selected tab. The backend hears
    /// about a show only once the element is actually on screen, so showing
    /// under a hidden ancestor updates the flags silently.
    pub fn set_visible(&mut self, id: ElementId, visible: bool) -> GfxResult<()> {
        let parent = self.expect(id)?.state.parent;
        let notify = !visible || parent.map_or(true, |p| self.is_effectively_visible(p));

        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            let Some(el) = self.elements.get_mut(&node) else {
                continue;
            };
            el.state.flags.assign(ElementFlags::VISIBLE, visible);
            if notify {
                self.backend
                    .set_visible_impl(el.kind.entity_kind(), &el.state.name, visible);
            }
            let shown_tab = match el.kind {
                ElementKind::TabPanel { selected: Some(tab) } if visible => Some(tab),
                _ => None,
            };
            match shown_tab {
                // The other tabs were hidden with their subtrees by `select_tab`.
                Some(tab) => stack.push(tab),
                None => stack.extend(el.children.iter().rev().copied()),
            }
        }
        Ok(())
    }

    /// Enables or disables an element and its whole subtree.
    pub fn set_enabled(&mut self, id: ElementId, enabled: bool) -> GfxResult<()> {
        self.expect(id)?;
        for node in self.subtree(id) {
            if let Some(el) = self.elements.get_mut(&node) {
                el.state.flags.assign(ElementFlags::ENABLED, enabled);
            }
            self.refresh_material(node);
        }
        Ok(())
    }

    /// Moves an element within its parent.
    pub fn set_position(&mut self, id: ElementId, position: Position) -> GfxResult<()> {
        self.expect_mut(id)?.state.set_position(position);
        self.push_positions(id);
        Ok(())
    }

    /// Resizes an element.
    pub fn set_size(&mut self, id: ElementId, size: Size) -> GfxResult<()> {
        let el = self.elements.get_mut(&id).ok_or_else(|| unknown(id))?;
        el.state.set_size(size);
        self.backend.set_size_impl(
            el.kind.entity_kind(),
            &el.state.name,
            size.width,
            size.height,
        );
        Ok(())
    }

    /// Replaces the text of a text-bearing widget.
    pub fn set_text(&mut self, id: ElementId, text: &str) -> GfxResult<()> {
        let el = self.elements.get_mut(&id).ok_or_else(|| unknown(id))?;
        if let ElementKind::TextInput { max_length: Some(max), .. } = &el.kind {
            if text.chars().count() > *max {
                return Err(GfxError::invalid(
                    "text",
                    format!("{} characters exceed max length {max}", text.chars().count()),
                ));
            }
        }
        match &mut el.kind {
            ElementKind::Button { text: t }
            | ElementKind::CheckBox { text: t, .. }
            | ElementKind::Label { text: t }
            | ElementKind::TextInput { text: t, .. } => {
                text.clone_into(t);
            }
            other => {
                return Err(GfxError::Unsupported {
                    kind: other.label(),
                    operation: "set_text",
                })
            }
        }
        self.backend
            .set_text_impl(el.kind.entity_kind(), &el.state.name, text);
        Ok(())
    }

    /// Changes the font of an element.
    pub fn set_font(&mut self, id: ElementId, font: Font) -> GfxResult<()> {
        let el = self.elements.get_mut(&id).ok_or_else(|| unknown(id))?;
        self.backend
            .set_font_impl(el.kind.entity_kind(), &el.state.name, &font);
        el.font = Some(font);
        Ok(())
    }

    /// Replaces the material set and re-applies the current material.
    pub fn set_materials(&mut self, id: ElementId, materials: MaterialSet) -> GfxResult<()> {
        self.expect_mut(id)?.materials = materials;
        self.refresh_material(id);
        Ok(())
    }

    /// Registers a listener.
    pub fn add_listener(&mut self, id: ElementId, kind: EventKind, listener: Listener) -> GfxResult<()> {
        self.expect_mut(id)?.listeners.add(kind, listener);
        Ok(())
    }

    /// Shows `tab` and hides every other child of the tab panel.
    pub fn select_tab(&mut self, panel: ElementId, tab: ElementId) -> GfxResult<()> {
        let el = self.expect(panel)?;
        if !matches!(el.kind, ElementKind::TabPanel { .. }) {
            return Err(GfxError::Unsupported {
                kind: el.kind.label(),
                operation: "select_tab",
            });
        }
        if !el.children.contains(&tab) {
            return Err(GfxError::UnknownElement(format!(
                "#{} is not a tab of {}",
                tab.raw(),
                el.state.name
            )));
        }
        let tab_el = self.expect(tab)?;
        if !tab_el.kind.is_container() {
            return Err(GfxError::NotAContainer(tab_el.state.name.clone()));
        }

        let siblings = el.children.clone();
        for child in siblings {
            self.set_visible(child, child == tab)?;
        }
        if let ElementKind::TabPanel { selected } = &mut self.expect_mut(panel)?.kind {
            *selected = Some(tab);
        }
        Ok(())
    }

    /// Deletes an element and its subtree, releasing every name.
    ///
    /// Returns the number of elements removed.
    pub fn remove(&mut self, id: ElementId) -> GfxResult<usize> {
        self.expect(id)?;
        self.unlink(id);

        let doomed = self.subtree(id);
        // Children first, so the backend never sees an orphan.
        for node in doomed.iter().rev() {
            if let Some(el) = self.elements.remove(node) {
                let kind = el.kind.entity_kind();
                self.names.remove(&(kind, el.state.name.clone()));
                self.registry.unregister(kind, &el.state.name);
                self.backend.remove_impl(kind, &el.state.name);
            }
        }
        tracing::debug!(id = id.raw(), removed = doomed.len(), "element deleted");
        Ok(doomed.len())
    }

    pub(crate) fn set_hovered(&mut self, id: ElementId, hovered: bool, at: Option<Position>) {
        let Some(el) = self.elements.get_mut(&id) else {
            return;
        };
        el.state.flags.assign(ElementFlags::HOVERED, hovered);
        let kind = if hovered {
            EventKind::MouseEnter
        } else {
            EventKind::MouseLeave
        };
        let mut event = UiEvent::new(kind, id, &el.state.name);
        if let Some(p) = at {
            event = event.at(p);
        }
        self.refresh_material(id);
        self.notify(id, &event);
    }

    pub(crate) fn set_focused(&mut self, id: ElementId, focused: bool) {
        let Some(el) = self.elements.get_mut(&id) else {
            return;
        };
        el.state.flags.assign(ElementFlags::FOCUSED, focused);
        let kind = if focused {
            EventKind::FocusGained
        } else {
            EventKind::FocusLost
        };
        let event = UiEvent::new(kind, id, &el.state.name);
        self.refresh_material(id);
        self.notify(id, &event);
    }

    /// Widget-specific reaction to a click, run before click listeners.
    pub(crate) fn activate(&mut self, id: ElementId) {
        let Some(el) = self.elements.get_mut(&id) else {
            return;
        };
        if let ElementKind::CheckBox { checked, .. } = &mut el.kind {
            *checked = !*checked;
            tracing::trace!(id = id.raw(), checked = *checked, "checkbox toggled");
            self.refresh_material(id);
        }
    }

    /// Widget-specific reaction to a key, run before key listeners.
    pub(crate) fn apply_key(&mut self, id: ElementId, key: char) {
        let Some(el) = self.elements.get_mut(&id) else {
            return;
        };
        let ElementKind::TextInput { text, max_length } = &mut el.kind else {
            return;
        };

        let changed = if key == BACKSPACE {
            text.pop().is_some()
        } else if !key.is_control() && (*max_length).map_or(true, |max| text.chars().count() < max) {
            text.push(key);
            true
        } else {
            false
        };

        if changed {
            self.backend
                .set_text_impl(EntityKind::Widget, &el.state.name, text);
        }
    }

    pub(crate) fn notify(&mut self, id: ElementId, event: &UiEvent) {
        if let Some(el) = self.elements.get_mut(&id) {
            el.listeners.notify(event);
        }
    }

    fn link(&mut self, parent: ElementId, child: ElementId) {
        if let Some(el) = self.elements.get_mut(&child) {
            el.state.parent = Some(parent);
        }
        if let Some(p) = self.elements.get_mut(&parent) {
            p.children.push(child);
        }
        self.sort_children(parent);
    }

    fn unlink(&mut self, id: ElementId) {
        let parent = self
            .elements
            .get_mut(&id)
            .and_then(|el| el.state.parent.take());
        if let Some(parent) = parent {
            if let Some(p) = self.elements.get_mut(&parent) {
                p.children.retain(|&c| c != id);
                if let ElementKind::TabPanel { selected } = &mut p.kind {
                    if *selected == Some(id) {
                        *selected = None;
                    }
                }
            }
        }
    }

    fn sort_children(&mut self, parent: ElementId) {
        let Some(mut children) = self.elements.get_mut(&parent).map(|p| std::mem::take(&mut p.children)) else {
            return;
        };
        children.sort_by_key(|c| {
            self.elements
                .get(c)
                .map_or((std::cmp::Reverse(i32::MIN), u64::MAX), |e| e.state.hit_order())
        });
        if let Some(p) = self.elements.get_mut(&parent) {
            p.children = children;
        }
    }

    /// A child under a hidden or disabled parent takes on that state.
    fn inherit_parent_state(&mut self, id: ElementId) {
        let Some(parent) = self.elements.get(&id).and_then(|e| e.state.parent) else {
            return;
        };
        if !self.is_effectively_visible(parent) {
            // Parent exists, so these cannot fail.
            let _ = self.set_visible(id, false);
        }
        if !self.is_effectively_enabled(parent) {
            let _ = self.set_enabled(id, false);
        }
    }

    fn push_initial_state(&mut self, id: ElementId) {
        let Some(el) = self.elements.get(&id) else {
            return;
        };
        let kind = el.kind.entity_kind();
        let name = &el.state.name;
        let size = el.state.size();

        self.backend.set_size_impl(kind, name, size.width, size.height);
        if let Some(text) = el.kind.text() {
            self.backend.set_text_impl(kind, name, text);
        }
        if let Some(font) = &el.font {
            self.backend.set_font_impl(kind, name, font);
        }
        if let ElementKind::Image { material } = &el.kind {
            self.backend.set_material_impl(kind, name, material);
        }
        if !el.state.is_visible() {
            self.backend.set_visible_impl(kind, name, false);
        }
        self.push_positions(id);
        self.refresh_material(id);
    }

    /// Sends absolute positions for `id` and its descendants.
    fn push_positions(&self, id: ElementId) {
        for node in self.subtree(id) {
            if let (Some(el), Some(rect)) = (self.elements.get(&node), self.absolute_rect(node)) {
                self.backend
                    .set_position_impl(el.kind.entity_kind(), &el.state.name, rect.left, rect.top);
            }
        }
    }

    fn refresh_material(&self, id: ElementId) {
        let Some(el) = self.elements.get(&id) else {
            return;
        };
        if let Some(material) = el.materials.pick(el.visual_state()) {
            self.backend
                .set_material_impl(el.kind.entity_kind(), &el.state.name, material);
        }
    }
}

fn unknown(id: ElementId) -> GfxError {
    GfxError::UnknownElement(format!("#{}", id.raw()))
}

impl std::fmt::Debug for ElementTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementTree")
            .field("elements", &self.elements.len())
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}
