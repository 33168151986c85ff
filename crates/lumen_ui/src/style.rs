//! Widget material sets.
//!
//! A widget shows exactly one material at a time; which one depends on its
//! state. The backend receives the chosen handle, never the set.

pub use lumen_core::{Color, Font, Material};

/// Materials a widget switches between.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialSet {
    /// Idle material.
    pub background: Option<Material>,
    /// Shown while the pointer is over the widget.
    pub hover: Option<Material>,
    /// Shown by a checked checkbox.
    pub checked: Option<Material>,
    /// Shown while the widget holds keyboard focus.
    pub highlight: Option<Material>,
    /// Shown while the widget is disabled.
    pub inactive: Option<Material>,
}

/// The visual state a material is picked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualState {
    /// Element is enabled.
    pub enabled: bool,
    /// Pointer is over the element.
    pub hovered: bool,
    /// Element holds keyboard focus.
    pub focused: bool,
    /// Checkbox is checked.
    pub checked: bool,
}

impl MaterialSet {
    /// Creates a set with only a background.
    #[must_use]
    pub fn with_background(background: impl Into<Material>) -> Self {
        Self {
            background: Some(background.into()),
            ..Self::default()
        }
    }

    /// Picks the material for a state, falling back to the background.
    ///
    /// Priority: inactive, hover, highlight, checked, background.
    #[must_use]
    pub fn pick(&self, state: VisualState) -> Option<&Material> {
        if !state.enabled {
            return self.inactive.as_ref().or(self.background.as_ref());
        }
        let hover = self.hover.as_ref().filter(|_| state.hovered);
        let highlight = self.highlight.as_ref().filter(|_| state.focused);
        let checked = self.checked.as_ref().filter(|_| state.checked);
        hover.or(highlight).or(checked).or(self.background.as_ref())
    }
}
