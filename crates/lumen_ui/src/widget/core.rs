//! Core element types and capability traits.

use lumen_core::{EntityKind, Material};

use crate::layout::{Position, Rect, Size};

/// Unique identifier for an element within one [`ElementTree`](super::ElementTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl ElementId {
    /// Creates a new element ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Element state flags (bitfield).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementFlags(u32);

impl ElementFlags {
    /// Element is visible.
    pub const VISIBLE: u32 = 1 << 0;
    /// Element is enabled (can receive clicks and keys).
    pub const ENABLED: u32 = 1 << 1;
    /// Element may take keyboard focus and receive clicks.
    pub const FOCUSABLE: u32 = 1 << 2;
    /// Pointer is over the element.
    pub const HOVERED: u32 = 1 << 3;
    /// Element holds keyboard focus.
    pub const FOCUSED: u32 = 1 << 4;

    /// Default flags for a new element.
    pub const DEFAULT: Self = Self(Self::VISIBLE | Self::ENABLED);

    /// Creates new flags with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Returns true if the flag is set.
    #[inline]
    #[must_use]
    pub const fn has(self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    /// Sets a flag.
    #[inline]
    pub fn set(&mut self, flag: u32) {
        self.0 |= flag;
    }

    /// Clears a flag.
    #[inline]
    pub fn clear(&mut self, flag: u32) {
        self.0 &= !flag;
    }

    /// Sets or clears a flag.
    #[inline]
    pub fn assign(&mut self, flag: u32, on: bool) {
        if on {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What an element is.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// Clickable button with a caption.
    Button {
        /// Caption.
        text: String,
    },
    /// Two-state toggle with a caption.
    CheckBox {
        /// Caption.
        text: String,
        /// Current state.
        checked: bool,
    },
    /// Static text.
    Label {
        /// Displayed text.
        text: String,
    },
    /// Editable single-line text.
    TextInput {
        /// Current contents.
        text: String,
        /// Maximum number of characters, if bounded.
        max_length: Option<usize>,
    },
    /// Static picture.
    Image {
        /// Displayed material.
        material: Material,
    },
    /// Plain container.
    Panel,
    /// Container showing one child container at a time.
    TabPanel {
        /// Currently shown tab.
        selected: Option<ElementId>,
    },
}

impl ElementKind {
    /// Returns true for kinds that own children.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Panel | Self::TabPanel { .. })
    }

    /// Registry namespace for this kind.
    #[must_use]
    pub const fn entity_kind(&self) -> EntityKind {
        if self.is_container() {
            EntityKind::Container
        } else {
            EntityKind::Widget
        }
    }

    /// Whether new elements of this kind take focus and clicks by default.
    #[must_use]
    pub const fn focusable_by_default(&self) -> bool {
        matches!(
            self,
            Self::Button { .. } | Self::CheckBox { .. } | Self::TextInput { .. }
        )
    }

    /// Text content, for text-bearing kinds.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Button { text }
            | Self::CheckBox { text, .. }
            | Self::Label { text }
            | Self::TextInput { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Short lowercase name for logs and errors.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Button { .. } => "button",
            Self::CheckBox { .. } => "checkbox",
            Self::Label { .. } => "label",
            Self::TextInput { .. } => "text input",
            Self::Image { .. } => "image",
            Self::Panel => "panel",
            Self::TabPanel { .. } => "tab panel",
        }
    }
}

/// Common element state.
#[derive(Debug, Clone)]
pub struct ElementState {
    /// Element identifier.
    pub id: ElementId,
    /// Unique name within its registry kind.
    pub name: String,
    /// Rectangle relative to the parent's content origin.
    pub rect: Rect,
    /// State flags.
    pub flags: ElementFlags,
    /// Hit-test priority among siblings, higher first.
    pub z: i32,
    /// Parent container (None for top-level containers and detached widgets).
    pub parent: Option<ElementId>,
    /// Creation sequence, the tie-break for equal z.
    pub(crate) seq: u64,
}

impl ElementState {
    /// Creates a new element state.
    #[must_use]
    pub fn new(id: ElementId, name: impl Into<String>, rect: Rect) -> Self {
        Self {
            id,
            name: name.into(),
            rect,
            flags: ElementFlags::DEFAULT,
            z: 0,
            parent: None,
            seq: id.raw(),
        }
    }

    /// Returns true if the element is enabled.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.flags.has(ElementFlags::ENABLED)
    }

    /// Sort key for hit-test order: higher z first, then older first.
    #[must_use]
    pub(crate) fn hit_order(&self) -> (std::cmp::Reverse<i32>, u64) {
        (std::cmp::Reverse(self.z), self.seq)
    }
}

/// Something placed at a parent-relative position.
pub trait Positionable {
    /// Parent-relative top-left corner.
    fn position(&self) -> Position;
    /// Moves the element within its parent.
    fn set_position(&mut self, position: Position);
}

/// Something with a size.
pub trait Sizeable {
    /// Current size.
    fn size(&self) -> Size;
    /// Resizes the element.
    fn set_size(&mut self, size: Size);
}

/// Something that can be shown or hidden.
pub trait Visible {
    /// Own visibility flag.
    fn is_visible(&self) -> bool;
}

/// Something that can hold keyboard focus.
pub trait Focusable {
    /// Whether the element accepts focus and clicks.
    fn is_focusable(&self) -> bool;
    /// Whether the element holds focus right now.
    fn is_focused(&self) -> bool;
}

/// Something the pointer can be over.
pub trait Hoverable {
    /// The `mouseOver` state.
    fn is_hovered(&self) -> bool;
}

impl Positionable for ElementState {
    fn position(&self) -> Position {
        self.rect.position()
    }

    fn set_position(&mut self, position: Position) {
        self.rect.left = position.x;
        self.rect.top = position.y;
    }
}

impl Sizeable for ElementState {
    fn size(&self) -> Size {
        self.rect.size()
    }

    fn set_size(&mut self, size: Size) {
        self.rect.width = size.width;
        self.rect.height = size.height;
    }
}

impl Visible for ElementState {
    fn is_visible(&self) -> bool {
        self.flags.has(ElementFlags::VISIBLE)
    }
}

impl Focusable for ElementState {
    fn is_focusable(&self) -> bool {
        self.flags.has(ElementFlags::FOCUSABLE)
    }

    fn is_focused(&self) -> bool {
        self.flags.has(ElementFlags::FOCUSED)
    }
}

impl Hoverable for ElementState {
    fn is_hovered(&self) -> bool {
        self.flags.has(ElementFlags::HOVERED)
    }
}
