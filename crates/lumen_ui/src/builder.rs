//! Fluent element builders.
//!
//! `build` is the only way to create an element. It validates everything
//! (name, geometry, parent, kind-specific arguments) before the name is
//! claimed, so a failed build leaves the GUI untouched.
//!
//! ```ignore
//! let window = ElementBuilder::panel()
//!     .name("options")
//!     .relative(0.25, 0.25, 0.5, 0.5)
//!     .padding(8)
//!     .build(&mut gui)?;
//!
//! let ok = ElementBuilder::button()
//!     .name("options_ok")
//!     .text("OK")
//!     .rect(Rect::new(0, 0, 80, 24))
//!     .parent(window)
//!     .build(&mut gui)?;
//! ```

use lumen_core::{Font, GfxError, GfxResult, Material};

use crate::gui::Gui;
use crate::layout::{Coordinates, Position, Rect, Size};
use crate::style::MaterialSet;
use crate::widget::{ElementId, ElementKind, NewElement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Button,
    CheckBox,
    Label,
    TextInput,
    Image,
    Panel,
    TabPanel,
}

/// Configures one widget or container.
#[derive(Debug, Clone)]
#[must_use = "builders do nothing until `build` is called"]
pub struct ElementBuilder {
    kind: Kind,
    name: Option<String>,
    coordinates: Option<Coordinates>,
    text: String,
    checked: bool,
    max_length: Option<usize>,
    image: Option<Material>,
    materials: MaterialSet,
    font: Option<Font>,
    padding: i32,
    parent: Option<ElementId>,
    z: i32,
    focusable: Option<bool>,
    enabled: bool,
    visible: bool,
}

impl ElementBuilder {
    fn of(kind: Kind) -> Self {
        Self {
            kind,
            name: None,
            coordinates: None,
            text: String::new(),
            checked: false,
            max_length: None,
            image: None,
            materials: MaterialSet::default(),
            font: None,
            padding: 0,
            parent: None,
            z: 0,
            focusable: None,
            enabled: true,
            visible: true,
        }
    }

    /// A clickable button.
    pub fn button() -> Self {
        Self::of(Kind::Button)
    }

    /// A two-state checkbox.
    pub fn checkbox() -> Self {
        Self::of(Kind::CheckBox)
    }

    /// Static text.
    pub fn label() -> Self {
        Self::of(Kind::Label)
    }

    /// Editable single-line text.
    pub fn text_input() -> Self {
        Self::of(Kind::TextInput)
    }

    /// A picture. Requires [`material`](Self::material).
    pub fn image() -> Self {
        Self::of(Kind::Image)
    }

    /// A plain container.
    pub fn panel() -> Self {
        Self::of(Kind::Panel)
    }

    /// A container showing one child at a time.
    pub fn tab_panel() -> Self {
        Self::of(Kind::TabPanel)
    }

    /// Unique name (required).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Absolute or screen-relative placement (required).
    pub fn coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    /// Pixel rectangle relative to the parent.
    pub fn rect(self, rect: Rect) -> Self {
        self.coordinates(Coordinates::Absolute(rect))
    }

    /// Fractions of the screen.
    pub fn relative(self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.coordinates(Coordinates::Relative { x, y, width, height })
    }

    /// Top-left corner in pixels, keeping any size already set.
    pub fn position(self, position: Position) -> Self {
        let size = self.pixel_rect().size();
        self.rect(Rect::from_pos_size(position, size))
    }

    /// Size in pixels, keeping any position already set.
    pub fn size(self, size: Size) -> Self {
        let position = self.pixel_rect().position();
        self.rect(Rect::from_pos_size(position, size))
    }

    /// Caption or initial contents.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Initial checkbox state.
    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Maximum text input length, in characters.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Picture shown by an image.
    pub fn material(mut self, material: impl Into<Material>) -> Self {
        self.image = Some(material.into());
        self
    }

    /// State-dependent materials.
    pub fn materials(mut self, materials: MaterialSet) -> Self {
        self.materials = materials;
        self
    }

    /// Text font.
    pub fn font(mut self, font: Font) -> Self {
        self.font = Some(font);
        self
    }

    /// Inner padding for containers.
    pub fn padding(mut self, padding: i32) -> Self {
        self.padding = padding;
        self
    }

    /// Owning container. Required for widgets.
    pub fn parent(mut self, parent: ElementId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Hit-test priority among siblings.
    pub fn z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    /// Overrides whether the element accepts focus and clicks.
    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = Some(focusable);
        self
    }

    /// Initial enabled state.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Initial visibility.
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    fn pixel_rect(&self) -> Rect {
        match self.coordinates {
            Some(Coordinates::Absolute(rect)) => rect,
            _ => Rect::ZERO,
        }
    }

    /// Validates and creates the element.
    ///
    /// Parentless containers are registered as top-level hit-test roots.
    pub fn build(self, gui: &mut Gui) -> GfxResult<ElementId> {
        let name = self.name.ok_or(GfxError::MissingArgument("name"))?;
        if name.is_empty() {
            return Err(GfxError::EmptyName);
        }
        let rect = self
            .coordinates
            .ok_or(GfxError::MissingArgument("coordinates"))?
            .resolve(gui.config())?;
        if self.padding < 0 {
            return Err(GfxError::invalid("padding", format!("{} is negative", self.padding)));
        }

        let kind = match self.kind {
            Kind::Button => ElementKind::Button { text: self.text },
            Kind::CheckBox => ElementKind::CheckBox {
                text: self.text,
                checked: self.checked,
            },
            Kind::Label => ElementKind::Label { text: self.text },
            Kind::TextInput => {
                if let Some(max) = self.max_length {
                    let len = self.text.chars().count();
                    if len > max {
                        return Err(GfxError::invalid(
                            "text",
                            format!("{len} characters exceed max length {max}"),
                        ));
                    }
                }
                ElementKind::TextInput {
                    text: self.text,
                    max_length: self.max_length,
                }
            }
            Kind::Image => ElementKind::Image {
                material: self.image.ok_or(GfxError::MissingArgument("material"))?,
            },
            Kind::Panel => ElementKind::Panel,
            Kind::TabPanel => ElementKind::TabPanel { selected: None },
        };
        if !kind.is_container() && self.parent.is_none() {
            return Err(GfxError::MissingArgument("parent"));
        }

        let focusable = self.focusable.unwrap_or_else(|| kind.focusable_by_default());
        gui.insert(NewElement {
            name,
            kind,
            rect,
            parent: self.parent,
            z: self.z,
            padding: self.padding,
            materials: self.materials,
            font: self.font,
            focusable,
            enabled: self.enabled,
            visible: self.visible,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::Focusable;
    use lumen_core::EntityKind;

    fn window(gui: &mut Gui) -> ElementId {
        ElementBuilder::panel()
            .name("window")
            .rect(Rect::new(0, 0, 100, 100))
            .build(gui)
            .unwrap()
    }

    #[test]
    fn test_missing_name() {
        let mut gui = Gui::headless();
        let err = ElementBuilder::panel().rect(Rect::ZERO).build(&mut gui);
        assert_eq!(err, Err(GfxError::MissingArgument("name")));
    }

    #[test]
    fn test_widget_requires_parent() {
        let mut gui = Gui::headless();
        let err = ElementBuilder::button().name("ok").rect(Rect::ZERO).build(&mut gui);
        assert_eq!(err, Err(GfxError::MissingArgument("parent")));
        assert!(gui.tree().registry().is_empty());
    }

    #[test]
    fn test_image_requires_material() {
        let mut gui = Gui::headless();
        let w = window(&mut gui);
        let err = ElementBuilder::image().name("logo").rect(Rect::ZERO).parent(w).build(&mut gui);
        assert_eq!(err, Err(GfxError::MissingArgument("material")));

        ElementBuilder::image()
            .name("logo")
            .rect(Rect::ZERO)
            .material("logo_mat")
            .parent(w)
            .build(&mut gui)
            .unwrap();
    }

    #[test]
    fn test_relative_coordinates_resolve_against_screen() {
        let mut gui = Gui::headless();
        let w = ElementBuilder::panel()
            .name("hud")
            .relative(0.5, 0.5, 0.25, 0.5)
            .build(&mut gui)
            .unwrap();
        assert_eq!(gui.absolute_rect(w), Some(Rect::new(640, 360, 320, 360)));

        let err = ElementBuilder::panel()
            .name("bad")
            .relative(0.0, 0.0, -1.0, 0.5)
            .build(&mut gui);
        assert!(matches!(err, Err(GfxError::InvalidSize { .. })));
        assert!(!gui.tree().registry().contains(EntityKind::Container, "bad"));
    }

    #[test]
    fn test_position_and_size_compose() {
        let mut gui = Gui::headless();
        let w = ElementBuilder::panel()
            .name("w")
            .position(Position::new(3, 4))
            .size(Size::new(5, 6))
            .build(&mut gui)
            .unwrap();
        assert_eq!(gui.element(w).unwrap().state().rect, Rect::new(3, 4, 5, 6));
    }

    #[test]
    fn test_initial_text_checked_against_max_length() {
        let mut gui = Gui::headless();
        let w = window(&mut gui);
        let err = ElementBuilder::text_input()
            .name("pin")
            .text("12345")
            .max_length(4)
            .rect(Rect::ZERO)
            .parent(w)
            .build(&mut gui);
        assert!(matches!(err, Err(GfxError::InvalidValue { .. })));
    }

    #[test]
    fn test_label_not_focusable_unless_asked() {
        let mut gui = Gui::headless();
        let w = window(&mut gui);
        let plain = ElementBuilder::label().name("a").rect(Rect::ZERO).parent(w).build(&mut gui).unwrap();
        let forced = ElementBuilder::label()
            .name("b")
            .rect(Rect::ZERO)
            .focusable(true)
            .parent(w)
            .build(&mut gui)
            .unwrap();

        assert!(!gui.element(plain).unwrap().is_focusable());
        assert!(gui.element(forced).unwrap().is_focusable());
    }
}
