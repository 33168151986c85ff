//! The GUI context.
//!
//! A [`Gui`] bundles one element tree, one dispatcher, the screen metrics and
//! the render backend. Several independent GUIs may coexist; they only share
//! what the caller shares (a registry handle, a backend).
//!
//! Every mutation that can hide, disable or delete an element also releases
//! any hover or focus the dispatcher holds inside it.

use std::sync::Arc;

use lumen_core::{EntityKind, Font, GfxError, GfxResult, GuiConfig, NameRegistry, NullBackend, SharedBackend};

use crate::dispatch::EventDispatcher;
use crate::input::{EventKind, UiEvent};
use crate::layout::{Position, Rect, Size};
use crate::style::MaterialSet;
use crate::widget::{Element, ElementId, ElementTree, NewElement};

/// A self-contained GUI instance.
#[derive(Debug)]
pub struct Gui {
    config: GuiConfig,
    tree: ElementTree,
    dispatcher: EventDispatcher,
}

impl Gui {
    /// Creates an empty GUI.
    #[must_use]
    pub fn new(config: GuiConfig, registry: NameRegistry, backend: SharedBackend) -> Self {
        tracing::debug!(
            width = config.screen_width,
            height = config.screen_height,
            "gui created"
        );
        Self {
            config,
            tree: ElementTree::new(registry, backend),
            dispatcher: EventDispatcher::new(),
        }
    }

    /// Creates a GUI with default screen metrics, a private registry and no renderer.
    #[must_use]
    pub fn headless() -> Self {
        Self::new(GuiConfig::default(), NameRegistry::new(), Arc::new(NullBackend))
    }

    /// Screen metrics.
    #[must_use]
    pub fn config(&self) -> &GuiConfig {
        &self.config
    }

    /// Read access to the element tree.
    #[must_use]
    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    /// Read access to the dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    /// Inserts a validated element. Parentless containers become top-level.
    pub(crate) fn insert(&mut self, new: NewElement) -> GfxResult<ElementId> {
        let top_level = new.parent.is_none() && new.kind.is_container();
        let id = self.tree.insert(new)?;
        if top_level {
            self.dispatcher.add_container(id);
        }
        Ok(id)
    }

    /// Registers a container as a top-level hit-test root.
    ///
    /// A container that currently has a parent is detached first. Returns
    /// false if it was already registered.
    pub fn add_container(&mut self, id: ElementId) -> GfxResult<bool> {
        let el = self.tree.expect(id)?;
        if !el.kind().is_container() {
            return Err(GfxError::NotAContainer(el.name().to_owned()));
        }
        let (parent, position) = (el.state().parent, el.state().rect.position());
        if parent.is_some() {
            self.tree.detach(id);
            // Same relative rect, new origin: re-push absolute positions.
            self.tree.set_position(id, position)?;
        }
        Ok(self.dispatcher.add_container(id))
    }

    /// Moves `child` into `parent`, keeping its parent-relative rectangle.
    pub fn add_child(&mut self, parent: ElementId, child: ElementId) -> GfxResult<()> {
        self.tree.attach(parent, child)?;
        self.dispatcher.remove_container(child);
        self.dispatcher.release_unreachable(&mut self.tree);
        Ok(())
    }

    /// Changes hit-test priority among siblings (or among top-level containers).
    pub fn set_z(&mut self, id: ElementId, z: i32) -> GfxResult<()> {
        self.tree.set_z(id, z)
    }

    /// Shows an element and its subtree.
    pub fn show(&mut self, id: ElementId) -> GfxResult<()> {
        self.tree.set_visible(id, true)
    }

    /// Hides an element and its subtree, releasing hover and focus inside it.
    pub fn hide(&mut self, id: ElementId) -> GfxResult<()> {
        self.tree.set_visible(id, false)?;
        self.dispatcher.release_unreachable(&mut self.tree);
        Ok(())
    }

    /// Enables an element and its subtree.
    pub fn enable(&mut self, id: ElementId) -> GfxResult<()> {
        self.tree.set_enabled(id, true)
    }

    /// Disables an element and its subtree, releasing focus inside it.
    pub fn disable(&mut self, id: ElementId) -> GfxResult<()> {
        self.tree.set_enabled(id, false)?;
        self.dispatcher.release_unreachable(&mut self.tree);
        Ok(())
    }

    /// Moves an element within its parent.
    pub fn set_position(&mut self, id: ElementId, position: Position) -> GfxResult<()> {
        self.tree.set_position(id, position)
    }

    /// Resizes an element.
    pub fn set_size(&mut self, id: ElementId, size: Size) -> GfxResult<()> {
        self.tree.set_size(id, size)
    }

    /// Replaces a widget's text.
    pub fn set_text(&mut self, id: ElementId, text: &str) -> GfxResult<()> {
        self.tree.set_text(id, text)
    }

    /// Changes a widget's font.
    pub fn set_font(&mut self, id: ElementId, font: Font) -> GfxResult<()> {
        self.tree.set_font(id, font)
    }

    /// Replaces an element's materials.
    pub fn set_materials(&mut self, id: ElementId, materials: MaterialSet) -> GfxResult<()> {
        self.tree.set_materials(id, materials)
    }

    /// Registers a listener for `kind` on an element.
    pub fn on<F>(&mut self, id: ElementId, kind: EventKind, listener: F) -> GfxResult<()>
    where
        F: FnMut(&UiEvent) + 'static,
    {
        self.tree.add_listener(id, kind, Box::new(listener))
    }

    /// Shows one tab of a tab panel and hides the others.
    pub fn select_tab(&mut self, panel: ElementId, tab: ElementId) -> GfxResult<()> {
        self.tree.select_tab(panel, tab)?;
        self.dispatcher.release_unreachable(&mut self.tree);
        Ok(())
    }

    /// Deletes an element and its subtree. Returns the number of elements removed.
    pub fn delete(&mut self, id: ElementId) -> GfxResult<usize> {
        self.tree.expect(id)?;
        self.dispatcher.release_subtree(&mut self.tree, id);
        self.tree.remove(id)
    }

    /// Gives keyboard focus to a widget. Returns false if it cannot take focus.
    pub fn set_focus(&mut self, id: ElementId) -> GfxResult<bool> {
        self.tree.expect(id)?;
        Ok(self.dispatcher.set_focus(&mut self.tree, id))
    }

    /// Drops keyboard focus.
    pub fn clear_focus(&mut self) {
        self.dispatcher.clear_focus(&mut self.tree);
    }

    /// Feeds a pointer position (absolute screen pixels).
    pub fn mouse_move(&mut self, p: Position) -> Option<ElementId> {
        self.dispatcher.mouse_move(&mut self.tree, p)
    }

    /// Feeds a left click (absolute screen pixels).
    pub fn mouse_left_click(&mut self, p: Position) -> bool {
        self.dispatcher.mouse_left_click(&mut self.tree, p)
    }

    /// Feeds a key press.
    pub fn key_pressed(&mut self, key: char) -> bool {
        self.dispatcher.key_pressed(&mut self.tree, key)
    }

    /// Element under the pointer.
    #[must_use]
    pub fn hovered(&self) -> Option<ElementId> {
        self.dispatcher.hovered()
    }

    /// Element holding keyboard focus.
    #[must_use]
    pub fn focused(&self) -> Option<ElementId> {
        self.dispatcher.focused()
    }

    /// Absolute screen rectangle of an element.
    #[must_use]
    pub fn absolute_rect(&self, id: ElementId) -> Option<Rect> {
        self.tree.absolute_rect(id)
    }

    /// Gets an element by ID.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.tree.get(id)
    }

    /// Looks up a widget, then a container, by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ElementId> {
        self.tree.lookup(name)
    }

    /// Looks up an element by registry kind and name.
    #[must_use]
    pub fn find(&self, kind: EntityKind, name: &str) -> Option<ElementId> {
        self.tree.find(kind, name)
    }
}
