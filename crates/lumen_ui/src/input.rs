//! Input events delivered to element listeners.
//!
//! Listeners are plain closures. Several may be registered for the same
//! event kind; they run in registration order, synchronously, before the
//! dispatching call returns.

use std::fmt;

use crate::layout::Position;
use crate::widget::ElementId;

/// Backspace as delivered by `key_pressed`.
pub const BACKSPACE: char = '\u{8}';

/// Kinds of notification an element can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer started hovering the element.
    MouseEnter,
    /// Pointer stopped hovering the element.
    MouseLeave,
    /// Pointer moved while over the element.
    MouseMove,
    /// Left click landed on the element.
    Click,
    /// Key pressed while the element holds focus.
    KeyPressed,
    /// Element took keyboard focus.
    FocusGained,
    /// Element lost keyboard focus.
    FocusLost,
}

/// A notification passed to listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct UiEvent {
    /// What happened.
    pub kind: EventKind,
    /// Element being notified.
    pub element: ElementId,
    /// That element's name.
    pub name: String,
    /// Pointer position for pointer events (absolute screen pixels).
    pub position: Option<Position>,
    /// Character for key events.
    pub key: Option<char>,
}

impl UiEvent {
    pub(crate) fn new(kind: EventKind, element: ElementId, name: &str) -> Self {
        Self {
            kind,
            element,
            name: name.to_owned(),
            position: None,
            key: None,
        }
    }

    pub(crate) fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub(crate) fn with_key(mut self, key: char) -> Self {
        self.key = Some(key);
        self
    }
}

/// Boxed listener callback.
pub type Listener = Box<dyn FnMut(&UiEvent)>;

/// Per-element listener list.
#[derive(Default)]
pub struct Listeners {
    entries: Vec<(EventKind, Listener)>,
}

impl Listeners {
    /// Appends a listener for `kind`.
    pub fn add(&mut self, kind: EventKind, listener: Listener) {
        self.entries.push((kind, listener));
    }

    /// Invokes every listener registered for `event.kind`, in order.
    pub fn notify(&mut self, event: &UiEvent) {
        for (kind, listener) in &mut self.entries {
            if *kind == event.kind {
                listener(event);
            }
        }
    }

    /// Number of listeners for `kind`.
    #[must_use]
    pub fn count(&self, kind: EventKind) -> usize {
        self.entries.iter().filter(|(k, _)| *k == kind).count()
    }

    /// Removes every listener.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
