//! Container error taxonomy

use thiserror::Error;

/// Result alias used throughout the crate.
pub type CartonResult<T> = Result<T, CartonError>;

/// Failures surfaced by the container and the resolution engine.
///
/// Nothing is caught internally: every failure propagates synchronously to
/// the immediate caller, and a resolution either fully succeeds with a
/// complete argument list or fails without invoking the target.
#[derive(Debug, Error)]
pub enum CartonError {
	/// Identifier absent from the full registry chain.
	#[error("container item not found: \"{id}\"")]
	NotFound {
		/// The identifier that was looked up
		id: String,
	},

	/// Target type cannot be described or instantiated.
	#[error("class \"{class}\" cannot be resolved: {reason}")]
	ClassResolution {
		/// Registered name of the type
		class: String,
		/// Why resolution failed
		reason: String,
	},

	/// A formal parameter was satisfied by no resolution rule.
	#[error("unable to resolve parameter \"{parameter}\" for \"{target}\"")]
	ParameterResolution {
		/// Name of the unresolved parameter
		parameter: String,
		/// The constructor, function, or method owning the parameter
		target: String,
	},

	/// Input matched no recognized callable shape.
	#[error("callable cannot be resolved: {reason}")]
	CallableResolution {
		/// Why normalization failed
		reason: String,
	},

	/// A registered provider does not satisfy the provider contract.
	#[error("{message}")]
	Container {
		/// Description of the contract violation
		message: String,
	},

	/// A typed [`Args`](crate::Args) accessor was used against an
	/// argument of a different runtime type.
	#[error("argument {index} is not a {expected} (got {actual})")]
	ArgumentType {
		/// Position of the argument
		index: usize,
		/// Requested type
		expected: &'static str,
		/// Actual contained type
		actual: &'static str,
	},

	/// A type's construction recursed into itself.
	#[error("circular dependency detected: {class}\n  path: {path}")]
	CircularDependency {
		/// The type that closed the cycle
		class: String,
		/// Rendered cycle, `A -> B -> A`
		path: String,
	},

	/// Construction recursed deeper than the engine allows.
	#[error("maximum resolution depth exceeded: {0}")]
	MaxDepthExceeded(usize),
}
