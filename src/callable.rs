//! Callable shapes and their normalization
//!
//! `call` and `get_arguments` accept a variety of callable-like inputs.
//! The normalizer turns each of them into a single introspectable form,
//! an [`Invocable`], that the resolution engine can read parameters from
//! and the container can invoke.

use std::any::Any;
use std::sync::Arc;

use crate::container::Container;
use crate::error::{CartonError, CartonResult};
use crate::hints::Hints;
use crate::metadata::{Args, FunctionMetadata, MethodMetadata, Param};
use crate::value::Value;

/// A callable-like input to [`Container::call`](crate::Container::call).
///
/// String inputs (via `From<&str>`) are expressions: `"Type@method"`
/// constructs `Type` and binds `method`; a bare `"Type"` constructs the
/// type and requires its invoke capability.
pub enum Callable {
	/// A free function registered under a name.
	Function(String),
	/// An inline closure with an explicit parameter list.
	Closure(Arc<FunctionMetadata>),
	/// A bound pair: an instance plus one of its described methods.
	Method {
		/// The receiver instance
		instance: Value,
		/// The method's declared name
		method: String,
	},
	/// An instance of a type with an invoke capability.
	Invocable(Value),
	/// A `"Type@method"` or `"Type"` expression.
	Expression(String),
}

impl Callable {
	/// Refers to a registered free function by name.
	pub fn function(name: impl Into<String>) -> Self {
		Self::Function(name.into())
	}

	/// Wraps an inline closure with an explicit parameter list.
	pub fn closure<F>(params: Vec<Param>, f: F) -> Self
	where
		F: Fn(&Args) -> CartonResult<Value> + Send + Sync + 'static,
	{
		Self::Closure(Arc::new(FunctionMetadata::new("<closure>", params, f)))
	}

	/// Binds a method name to an instance.
	pub fn method<T: Any + Send + Sync>(instance: T, method: impl Into<String>) -> Self {
		Self::method_on(Value::new(instance), method)
	}

	/// Binds a method name to an already-erased instance.
	pub fn method_on(instance: Value, method: impl Into<String>) -> Self {
		Self::Method {
			instance,
			method: method.into(),
		}
	}

	/// Treats an instance as an invocable object.
	pub fn invocable<T: Any + Send + Sync>(instance: T) -> Self {
		Self::Invocable(Value::new(instance))
	}
}

impl From<&str> for Callable {
	fn from(expression: &str) -> Self {
		Self::Expression(expression.to_string())
	}
}

impl From<String> for Callable {
	fn from(expression: String) -> Self {
		Self::Expression(expression)
	}
}

/// The normalized, introspectable form every callable shape reduces to.
pub(crate) struct Invocable {
	target: String,
	kind: InvokeKind,
}

enum InvokeKind {
	Free(Arc<FunctionMetadata>),
	Bound {
		receiver: Value,
		method: Arc<MethodMetadata>,
	},
}

impl Invocable {
	/// Diagnostic label for the target (function name or `Class::method`).
	pub(crate) fn target(&self) -> &str {
		&self.target
	}

	/// The target's formal parameters.
	pub(crate) fn params(&self) -> &[Param] {
		match &self.kind {
			InvokeKind::Free(function) => function.params(),
			InvokeKind::Bound { method, .. } => method.params(),
		}
	}

	/// Invokes the target with an already-resolved argument list.
	pub(crate) fn invoke(&self, args: &Args) -> CartonResult<Value> {
		match &self.kind {
			InvokeKind::Free(function) => function.invoke(args),
			InvokeKind::Bound { receiver, method } => method.invoke(receiver, args),
		}
	}
}

/// Normalizes a callable-like input into an [`Invocable`].
///
/// Expression forms construct their type via `make`, using the caller's
/// hints as constructor hints. Inputs matching no recognized shape fail
/// with `CallableResolution`.
pub(crate) fn normalize(
	container: &Container,
	callable: Callable,
	hints: &Hints,
) -> CartonResult<Invocable> {
	match callable {
		Callable::Function(name) => {
			let function = container.function_metadata(&name).ok_or_else(|| {
				CartonError::CallableResolution {
					reason: format!("unknown function \"{name}\""),
				}
			})?;
			Ok(Invocable {
				target: name,
				kind: InvokeKind::Free(function),
			})
		}
		Callable::Closure(function) => Ok(Invocable {
			target: function.name().to_string(),
			kind: InvokeKind::Free(function),
		}),
		Callable::Method { instance, method } => bind(container, instance, &method),
		Callable::Invocable(instance) => bind_invocable(container, instance),
		Callable::Expression(expression) => match expression.split_once('@') {
			Some((class, method)) => {
				let instance = container.make(class, hints)?;
				bind(container, instance, method)
			}
			None => {
				let instance = container.make(&expression, hints)?;
				bind_invocable(container, instance)
			}
		},
	}
}

/// Normalizes a bound pair by introspecting the instance's class.
fn bind(container: &Container, instance: Value, method: &str) -> CartonResult<Invocable> {
	let metadata = container.class_by_value(&instance).ok_or_else(|| {
		CartonError::CallableResolution {
			reason: format!("no metadata describes type {}", instance.type_name()),
		}
	})?;
	let bound = metadata
		.method(method)
		.ok_or_else(|| CartonError::CallableResolution {
			reason: format!("{} has no method \"{method}\"", metadata.name()),
		})?;
	Ok(Invocable {
		target: format!("{}::{method}", metadata.name()),
		kind: InvokeKind::Bound {
			receiver: instance,
			method: Arc::clone(bound),
		},
	})
}

/// Normalizes an invocable object via its class's invoke capability.
fn bind_invocable(container: &Container, instance: Value) -> CartonResult<Invocable> {
	let metadata = container.class_by_value(&instance).ok_or_else(|| {
		CartonError::CallableResolution {
			reason: format!("no metadata describes type {}", instance.type_name()),
		}
	})?;
	let invoke = metadata
		.invocable()
		.ok_or_else(|| CartonError::CallableResolution {
			reason: format!("{} is not invocable", metadata.name()),
		})?;
	Ok(Invocable {
		target: metadata.name().to_string(),
		kind: InvokeKind::Bound {
			receiver: instance,
			method: Arc::clone(invoke),
		},
	})
}
