//! Service provider registration

use std::sync::Arc;

use crate::container::Container;
use crate::error::CartonResult;

/// A bundle of related registrations applied to a container in one step.
pub trait ServiceProvider: Send + Sync + 'static {
	/// Registers this provider's services with the container.
	fn register(&self, container: &Container) -> CartonResult<()>;
}

/// Input to [`Container::register`](crate::Container::register): a ready
/// provider instance, or the name of a described class to construct first.
pub enum Provider {
	/// An already-built provider.
	Instance(Arc<dyn ServiceProvider>),
	/// A class name to construct via `make`; the described class must be
	/// marked with `provides()` in its metadata.
	Class(String),
}

impl Provider {
	/// Wraps a ready provider instance.
	pub fn instance(provider: impl ServiceProvider) -> Self {
		Self::Instance(Arc::new(provider))
	}

	/// Refers to a described class by name.
	pub fn class(name: impl Into<String>) -> Self {
		Self::Class(name.into())
	}
}

impl From<&str> for Provider {
	fn from(name: &str) -> Self {
		Self::Class(name.to_string())
	}
}

impl From<String> for Provider {
	fn from(name: String) -> Self {
		Self::Class(name)
	}
}

impl From<Arc<dyn ServiceProvider>> for Provider {
	fn from(provider: Arc<dyn ServiceProvider>) -> Self {
		Self::Instance(provider)
	}
}
