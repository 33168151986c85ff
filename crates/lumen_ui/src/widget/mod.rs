//! Widgets and containers.
//!
//! Every element lives in one [`ElementTree`] arena and is addressed by
//! [`ElementId`]. Containers own their children; widgets are leaves.

mod core;
mod tree;

pub use self::core::{
    ElementFlags, ElementId, ElementKind, ElementState, Focusable, Hoverable, Positionable,
    Sizeable, Visible,
};
pub use self::tree::{Element, ElementTree, NewElement};
