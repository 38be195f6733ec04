//! Type-erased container values

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A type-erased, shareable value held by the container.
///
/// Every item the container stores or resolves travels as a `Value`: an
/// `Arc` around the erased concrete type, plus the type's name for
/// diagnostics. Cloning a `Value` clones the `Arc`, never the contents,
/// so identity is preserved across registry lookups (see [`Value::ptr_eq`]).
///
/// The absent/null value used for nullable parameters is [`Value::none`].
///
/// # Examples
///
/// ```
/// use carton::Value;
///
/// let value = Value::new(42i64);
/// assert!(value.is::<i64>());
/// assert_eq!(*value.downcast::<i64>().unwrap(), 42);
///
/// let null = Value::none();
/// assert!(null.is_none());
/// ```
#[derive(Clone)]
pub struct Value {
	inner: Option<Arc<dyn Any + Send + Sync>>,
	type_name: &'static str,
}

impl Value {
	/// Wraps a concrete value.
	pub fn new<T: Any + Send + Sync>(value: T) -> Self {
		Self {
			inner: Some(Arc::new(value)),
			type_name: std::any::type_name::<T>(),
		}
	}

	/// Wraps an already-shared value without copying it.
	pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
		Self {
			inner: Some(value),
			type_name: std::any::type_name::<T>(),
		}
	}

	/// The absent/null value.
	pub fn none() -> Self {
		Self {
			inner: None,
			type_name: "<none>",
		}
	}

	/// Returns `true` for [`Value::none`].
	pub fn is_none(&self) -> bool {
		self.inner.is_none()
	}

	/// The `TypeId` of the contained value, or `None` for the null value.
	pub fn type_id(&self) -> Option<TypeId> {
		self.inner.as_ref().map(|inner| (**inner).type_id())
	}

	/// Name of the contained type, for diagnostics.
	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	/// Runtime is-instance-of check.
	pub fn is<T: Any>(&self) -> bool {
		self.type_id() == Some(TypeId::of::<T>())
	}

	/// Downcasts to the concrete type, sharing ownership.
	///
	/// Returns `None` for the null value or on a type mismatch.
	pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
		self.inner.clone()?.downcast::<T>().ok()
	}

	/// Identity comparison: do both values share the same allocation?
	///
	/// Two null values compare equal.
	pub fn ptr_eq(a: &Value, b: &Value) -> bool {
		match (&a.inner, &b.inner) {
			(Some(a), Some(b)) => Arc::ptr_eq(a, b),
			(None, None) => true,
			_ => false,
		}
	}
}

impl fmt::Debug for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Value").field(&self.type_name).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clone_preserves_identity() {
		let value = Value::new(String::from("shared"));
		let clone = value.clone();

		assert!(Value::ptr_eq(&value, &clone));
	}

	#[test]
	fn separate_wraps_are_not_identical() {
		let a = Value::new(1u8);
		let b = Value::new(1u8);

		assert!(!Value::ptr_eq(&a, &b));
	}

	#[test]
	fn downcast_rejects_wrong_type() {
		let value = Value::new(3i32);

		assert!(value.downcast::<String>().is_none());
		assert!(value.downcast::<i32>().is_some());
	}

	#[test]
	fn none_has_no_type() {
		let null = Value::none();

		assert!(null.is_none());
		assert_eq!(null.type_id(), None);
		assert!(!null.is::<()>());
	}
}
