//! Error types raised by the component runtime.

use core::fmt::Debug;

use thiserror::Error;

/// Errors raised synchronously by construction, rendering or dispatch.
///
/// None of these are recoverable: they signal a contract violation in the
/// component definition (a typo in a binding, a missing initial state) and are
/// returned to whatever host call triggered them.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid command shape: field `{field}` {reason}")]
    InvalidCommandShape { field: String, reason: &'static str },

    #[error("[{component}] undefined binding for prop `{property}` on element `{element}`")]
    UndefinedBinding {
        component: String,
        element: String,
        property: String,
    },

    #[error("[{component}] invalid event prop `{property}` on element `{element}`")]
    InvalidBindingSyntax {
        component: String,
        element: String,
        property: String,
    },

    #[error("[{component}] prop `{property}` on element `{element}` {reason}")]
    InvalidBindingValue {
        component: String,
        element: String,
        property: String,
        reason: &'static str,
    },

    #[error("[{component}] init produced no state command")]
    MissingInitialState { component: String },

    #[error("reducer contract violation: {0}")]
    ReducerContractViolation(String),
}

impl Error {
    /// Build a [`Error::ReducerContractViolation`] for an action a reducer
    /// refuses to handle.
    pub fn unhandled_action(action: &impl Debug) -> Self {
        Error::ReducerContractViolation(format!("unhandled action {action:?}"))
    }
}

/// Result type alias
pub type Result<T> = core::result::Result<T, Error>;
