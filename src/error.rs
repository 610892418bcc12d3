/*!
# Error types

This module holds the error types returned by the various functions of this
crate.
*/
use std::error;
use std::fmt;
use std::result::Result as StdResult;

use crate::event::EventKind;

/// Error types which may be returned from narrowing operations.
///
/// All errors signal a logic defect in the calling stage, not malformed
/// input data; they are propagated to the caller and never substituted by a
/// default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
	/// An event was narrowed to a kind it does not have.
	///
	/// `expected` names the kind (or group of kinds) the accessor is valid
	/// for; `actual` is the kind of the event the accessor was called on.
	TypeMismatch {
		expected: &'static str,
		actual: EventKind,
	},
}

pub type Result<T> = StdResult<T, Error>;

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::TypeMismatch { expected, actual } => {
				write!(f, "type mismatch: expected {}, got {}", expected, actual)
			}
		}
	}
}

impl error::Error for Error {}
