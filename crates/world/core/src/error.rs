//! Common error infrastructure for world-core.
//!
//! Domain-specific errors (e.g. `RoomNameError`, `PositionError`) are defined
//! in their respective modules alongside the types they validate. This module
//! only holds the shared classification used to route them.
//!
//! # Design Principles
//!
//! - **Fail fast**: malformed input is rejected where it is parsed or constructed
//! - **No recovery**: nothing in this crate retries or degrades; callers decide
//! - **Stable codes**: every variant exposes a static identifier for tests and logs

/// Severity level of an error, used for categorization by callers.
///
/// - **Validation**: malformed input (room names, axis values, corners, buffers)
/// - **Logic**: a well-formed but meaningless query (direction between identical cells)
/// - **Internal**: an invariant of a stored value was found broken
/// - **External**: a collaborator (terrain source) failed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input, should not retry without changes.
    ///
    /// Examples: `"X1Y2"` as a room name, local axis value 50
    Validation,

    /// Domain-math misuse by the caller.
    ///
    /// Examples: `direction_to` on identical or non-adjacent positions
    Logic,

    /// Stored data violates an invariant.
    ///
    /// Examples: wire buffer with non-zero padding bits
    Internal,

    /// Failure reported by an external collaborator.
    ///
    /// Examples: terrain source could not produce a room
    External,
}

/// Common trait for all world-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity by cause, not by impact
pub trait GridError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
