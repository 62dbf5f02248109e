//! Request validation utilities for consistent validation across handlers
//!
//! This module provides a `RequestValidation` trait and helper macros to
//! centralize validation logic and ensure consistent error messages.

use crate::error::ApiError;

/// Trait for validating request payloads
///
/// Implement this trait for all create/update request types so handlers
/// can call one `validate()` before touching storage. Validation stops at
/// the first failing field; handlers that want every failure at once (the
/// contact form does) collect messages themselves.
pub trait RequestValidation {
    /// Returns `Ok(())` if validation passes, or `Err(ApiError)` with
    /// a validation error message if validation fails.
    fn validate(&self) -> Result<(), ApiError>;
}

/// Macro for validating fields with custom predicates
///
/// # Usage
///
/// ```text
/// validate_field!(self.email, !self.email.trim().is_empty(), "Email is required");
/// validate_field!(self.budget, self.budget > 0.0, "Budget must be positive");
/// ```
#[macro_export]
macro_rules! validate_field {
    ($field:expr, $predicate:expr, $message:expr) => {
        if !$predicate {
            return Err($crate::error::ApiError::validation($message));
        }
    };
}

/// Macro for validating required fields (non-empty strings)
///
/// # Usage
///
/// ```text
/// validate_required!(self.title, "Title is required");
/// ```
#[macro_export]
macro_rules! validate_required {
    ($field:expr, $message:expr) => {
        $crate::validate_field!($field, !$field.trim().is_empty(), $message);
    };
}

/// Macro for validating UUID fields (non-nil)
///
/// # Usage
///
/// ```text
/// validate_uuid!(self.tender_id, "Tender ID is required");
/// ```
#[macro_export]
macro_rules! validate_uuid {
    ($field:expr, $message:expr) => {
        $crate::validate_field!($field, !$field.is_nil(), $message);
    };
}

/// Macro for validating string length
///
/// # Usage
///
/// ```text
/// validate_length!(self.title, 3, 200, "Title must be between 3 and 200 characters");
/// ```
#[macro_export]
macro_rules! validate_length {
    ($field:expr, $min:expr, $max:expr, $message:expr) => {
        let len = $field.len();
        $crate::validate_field!($field, len >= $min && len <= $max, $message);
    };
}

/// Macro for validating email format (basic check)
///
/// # Usage
///
/// ```text
/// validate_email!(self.email, "Invalid email format");
/// ```
#[macro_export]
macro_rules! validate_email {
    ($field:expr, $message:expr) => {
        $crate::validate_field!($field, $field.contains('@') && $field.contains('.'), $message);
    };
}

/// Macro for validating numeric ranges
///
/// # Usage
///
/// ```text
/// validate_range!(self.amount, 0.0, 1_000_000_000.0, "Amount is out of range");
/// ```
#[macro_export]
macro_rules! validate_range {
    ($field:expr, $min:expr, $max:expr, $message:expr) => {
        $crate::validate_field!($field, $field >= $min && $field <= $max, $message);
    };
}
