//! # Error Types
//!
//! All errors raised by GUI and scene mutations.
//!
//! Every error is raised before any state changes. Deliberate absorptions
//! (a locked fixed camera, a duplicate top-level container) are not errors.

use thiserror::Error;

use crate::registry::EntityKind;

/// Errors that can occur while building or mutating GUI and scene objects.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GfxError {
    /// A name is already taken within its registry kind.
    #[error("duplicate {kind} name: {name:?}")]
    DuplicateName {
        /// Registry the name was rejected by.
        kind: EntityKind,
        /// The rejected name.
        name: String,
    },

    /// Names must not be empty.
    #[error("name must not be empty")]
    EmptyName,

    /// A required builder argument was never supplied.
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    /// Width or height out of range.
    #[error("invalid size {width}x{height}")]
    InvalidSize {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },

    /// A value failed validation (non-finite vector, bad clip range, ...).
    #[error("invalid {what}: {reason}")]
    InvalidValue {
        /// What was being set.
        what: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// No element, camera, light or billboard with this name.
    #[error("unknown element: {0:?}")]
    UnknownElement(String),

    /// The element exists but cannot own children.
    #[error("element {0:?} is not a container")]
    NotAContainer(String),

    /// The operation does not apply to this kind of object.
    #[error("{operation} is not supported by {kind}")]
    Unsupported {
        /// Kind of object the call was made on.
        kind: &'static str,
        /// Rejected operation.
        operation: &'static str,
    },

    /// Invalid configuration file or value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GfxError {
    /// Shorthand for [`GfxError::InvalidValue`].
    #[must_use]
    pub fn invalid(what: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            what,
            reason: reason.into(),
        }
    }
}

/// Result type for GUI and scene operations.
pub type GfxResult<T> = Result<T, GfxError>;

/// Rejects vectors with NaN or infinite components.
pub fn ensure_finite(what: &'static str, v: glam::Vec3) -> GfxResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(GfxError::invalid(what, format!("non-finite vector {v}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GfxError::DuplicateName {
            kind: EntityKind::Widget,
            name: "ok".into(),
        };
        assert_eq!(err.to_string(), "duplicate widget name: \"ok\"");

        let err = GfxError::InvalidSize { width: 0.0, height: 2.0 };
        assert_eq!(err.to_string(), "invalid size 0x2");
    }

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite("position", glam::Vec3::ONE).is_ok());
        assert!(ensure_finite("position", glam::Vec3::new(f32::NAN, 0.0, 0.0)).is_err());
    }
}
