//! # LUMEN UI
//!
//! Retained-mode GUI layer over a native renderer:
//! - Containers own widgets; siblings are z-ordered
//! - A dispatcher resolves the single element under the pointer
//! - Keyboard focus is tracked separately from hover
//! - Every visual change leaves through `RenderBackend` hooks
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                         GUI PIPELINE                        │
//! ├────────────────────────────────────────────────────────────┤
//! │  Input → EventDispatcher → ElementTree → RenderBackend hook │
//! │    ↓            ↓               ↓                ↓          │
//! │ move/click   hit testing   state + listeners   native draw  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! let mut gui = Gui::headless();
//! let window = ElementBuilder::panel()
//!     .name("window")
//!     .rect(Rect::new(0, 0, 320, 200))
//!     .build(&mut gui)?;
//! let ok = ElementBuilder::button()
//!     .name("ok")
//!     .text("OK")
//!     .rect(Rect::new(10, 10, 80, 24))
//!     .parent(window)
//!     .build(&mut gui)?;
//! gui.on(ok, EventKind::Click, |_| println!("clicked"))?;
//! gui.mouse_left_click(Position::new(20, 20));
//! ```

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod builder;
pub mod dispatch;
pub mod gui;
pub mod input;
pub mod layout;
pub mod style;
pub mod widget;

pub use builder::ElementBuilder;
pub use dispatch::EventDispatcher;
pub use gui::Gui;
pub use input::{EventKind, UiEvent, BACKSPACE};
pub use layout::{Coordinates, Position, Rect, Size};
pub use style::{Color, Font, Material, MaterialSet};
pub use widget::{Element, ElementId, ElementKind, ElementTree};
