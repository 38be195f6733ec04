//! Builder strategies for registry entries

use std::sync::{Arc, PoisonError, RwLock};

use crate::container::Container;
use crate::error::CartonResult;
use crate::value::Value;

/// Callback signature shared by the lazy builder strategies.
pub type BuilderFn = dyn Fn(&Container) -> CartonResult<Value> + Send + Sync;

/// A strategy that knows how to produce a registry entry's value.
///
/// Registry entries hold `Arc<dyn Builder>`; aliasing an identifier shares
/// the `Arc`, so a [`SingletonBuilder`]'s cached state is observed through
/// every alias.
pub trait Builder: Send + Sync {
	/// Produces the entry's value, reading further dependencies from the
	/// given container as needed.
	fn build(&self, container: &Container) -> CartonResult<Value>;
}

/// Returns a fixed value as-is on every build.
pub struct FixedBuilder {
	value: Value,
}

impl FixedBuilder {
	/// Wraps an already-constructed value.
	pub fn new(value: Value) -> Self {
		Self { value }
	}
}

impl Builder for FixedBuilder {
	fn build(&self, _container: &Container) -> CartonResult<Value> {
		Ok(self.value.clone())
	}
}

/// Runs its callback once and returns the cached value afterwards.
///
/// The cached value, once set, is returned for the remaining lifetime of
/// the builder instance; the engine never invalidates it.
pub struct SingletonBuilder {
	builder: Box<BuilderFn>,
	instance: RwLock<Option<Value>>,
}

impl SingletonBuilder {
	/// Wraps a build callback.
	pub fn new<F>(builder: F) -> Self
	where
		F: Fn(&Container) -> CartonResult<Value> + Send + Sync + 'static,
	{
		Self {
			builder: Box::new(builder),
			instance: RwLock::new(None),
		}
	}
}

impl Builder for SingletonBuilder {
	fn build(&self, container: &Container) -> CartonResult<Value> {
		if let Some(value) = self
			.instance
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.as_ref()
		{
			return Ok(value.clone());
		}

		// The lock is not held across the callback: the callback may read
		// the container, which may re-enter this builder.
		let value = (self.builder)(container)?;
		let mut slot = self.instance.write().unwrap_or_else(PoisonError::into_inner);
		Ok(slot.get_or_insert(value).clone())
	}
}

/// Runs its callback on every build.
pub struct FactoryBuilder {
	builder: Box<BuilderFn>,
}

impl FactoryBuilder {
	/// Wraps a build callback.
	pub fn new<F>(builder: F) -> Self
	where
		F: Fn(&Container) -> CartonResult<Value> + Send + Sync + 'static,
	{
		Self {
			builder: Box::new(builder),
		}
	}
}

impl Builder for FactoryBuilder {
	fn build(&self, container: &Container) -> CartonResult<Value> {
		(self.builder)(container)
	}
}

/// Keeps `Arc<dyn Builder>` and plain values interchangeable at the
/// registration seams.
pub trait IntoBuilder {
	/// Converts `self` into a shareable builder.
	fn into_builder(self) -> Arc<dyn Builder>;
}

impl IntoBuilder for Arc<dyn Builder> {
	fn into_builder(self) -> Arc<dyn Builder> {
		self
	}
}

impl IntoBuilder for Value {
	fn into_builder(self) -> Arc<dyn Builder> {
		Arc::new(FixedBuilder::new(self))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fixed_builder_returns_same_value() {
		let container = Container::new();
		let builder = FixedBuilder::new(Value::new(7u32));

		let first = builder.build(&container).unwrap();
		let second = builder.build(&container).unwrap();

		assert!(Value::ptr_eq(&first, &second));
	}

	#[test]
	fn singleton_builder_runs_callback_once() {
		let container = Container::new();
		let builder = SingletonBuilder::new(|_| Ok(Value::new(String::from("built"))));

		let first = builder.build(&container).unwrap();
		let second = builder.build(&container).unwrap();

		assert!(Value::ptr_eq(&first, &second));
	}

	#[test]
	fn factory_builder_runs_callback_every_time() {
		let container = Container::new();
		let builder = FactoryBuilder::new(|_| Ok(Value::new(String::from("built"))));

		let first = builder.build(&container).unwrap();
		let second = builder.build(&container).unwrap();

		assert!(!Value::ptr_eq(&first, &second));
	}

	#[test]
	fn singleton_builder_propagates_callback_error() {
		let container = Container::new();
		let builder = SingletonBuilder::new(|_| {
			Err(crate::CartonError::Container {
				message: String::from("boom"),
			})
		});

		assert!(builder.build(&container).is_err());
		// A failed build caches nothing; the next build runs the callback
		// again.
		assert!(builder.build(&container).is_err());
	}
}
