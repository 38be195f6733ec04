//! The container: registry storage, chaining, and the engine entry points

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::builder::{Builder, FactoryBuilder, IntoBuilder, SingletonBuilder};
use crate::callable::{self, Callable};
use crate::cycle;
use crate::error::{CartonError, CartonResult};
use crate::hints::Hints;
use crate::metadata::{self, Args, ClassMetadata, FunctionMetadata, Reflect};
use crate::provider::Provider;
use crate::resolver;
use crate::value::Value;

/// A registry of lazily-built values plus the resolution engine's entry
/// points (`make`, `call`, `get_arguments`).
///
/// Interior mutability makes the container shareable behind `Arc`; all
/// registration and resolution methods take `&self`. Construct one
/// container and pass it down explicitly; the crate keeps no process-wide
/// instance.
///
/// # Examples
///
/// ```
/// use carton::{Container, Value};
///
/// let container = Container::new();
/// container.set("config", Value::new(String::from("prod")));
///
/// let config = container.get("config").unwrap();
/// assert_eq!(*config.downcast::<String>().unwrap(), "prod");
/// ```
pub struct Container {
	items: RwLock<HashMap<String, Arc<dyn Builder>>>,
	delegates: RwLock<Vec<Arc<Container>>>,
	types: RwLock<HashMap<&'static str, Arc<ClassMetadata>>>,
	functions: RwLock<HashMap<&'static str, Arc<FunctionMetadata>>>,
}

impl Container {
	/// Creates an empty container.
	pub fn new() -> Self {
		Self {
			items: RwLock::new(HashMap::new()),
			delegates: RwLock::new(Vec::new()),
			types: RwLock::new(HashMap::new()),
			functions: RwLock::new(HashMap::new()),
		}
	}

	/// Whether `id` is a direct entry or resolvable through a chained
	/// container, in registration order.
	pub fn has(&self, id: &str) -> bool {
		if self
			.items
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.contains_key(id)
		{
			return true;
		}
		self.delegates
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.iter()
			.any(|delegate| delegate.has(id))
	}

	/// Builds and returns the value registered under `id`.
	///
	/// A direct entry's builder runs against this container; otherwise the
	/// first chained container that has the id resolves it with itself.
	pub fn get(&self, id: &str) -> CartonResult<Value> {
		let builder = self
			.items
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.get(id)
			.cloned();
		if let Some(builder) = builder {
			return builder.build(self);
		}

		let delegates = self.delegate_snapshot();
		for delegate in &delegates {
			if delegate.has(id) {
				return delegate.get(id);
			}
		}

		Err(CartonError::NotFound { id: id.to_string() })
	}

	/// Registers an item under `id`, silently overwriting any previous
	/// entry.
	///
	/// Accepts a plain [`Value`] (wrapped in a fixed builder) or an
	/// `Arc<dyn Builder>` directly; a shared `Arc` may be registered under
	/// several ids to share cached state.
	pub fn set(&self, id: impl Into<String>, item: impl IntoBuilder) {
		self.items
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.insert(id.into(), item.into_builder());
	}

	/// Registers a build-once-and-cache entry.
	pub fn singleton<F>(&self, id: impl Into<String>, builder: F)
	where
		F: Fn(&Container) -> CartonResult<Value> + Send + Sync + 'static,
	{
		let builder: Arc<dyn Builder> = Arc::new(SingletonBuilder::new(builder));
		self.set(id, builder);
	}

	/// Registers a build-every-call entry.
	pub fn factory<F>(&self, id: impl Into<String>, builder: F)
	where
		F: Fn(&Container) -> CartonResult<Value> + Send + Sync + 'static,
	{
		let builder: Arc<dyn Builder> = Arc::new(FactoryBuilder::new(builder));
		self.set(id, builder);
	}

	/// Binds each alias to the same builder instance as `id`, so cached
	/// state is observed through every alias.
	///
	/// Fails with [`CartonError::NotFound`] if `id` misses the whole chain.
	pub fn alias(&self, aliases: &[&str], id: &str) -> CartonResult<()> {
		let builder = self
			.builder(id)
			.ok_or_else(|| CartonError::NotFound { id: id.to_string() })?;
		let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
		for alias in aliases {
			items.insert((*alias).to_string(), Arc::clone(&builder));
		}
		Ok(())
	}

	/// Appends a chained container, consulted after local entries miss.
	pub fn add_container(&self, delegate: Arc<Container>) {
		self.delegates
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.push(delegate);
	}

	/// Applies each provider's registrations to this container.
	///
	/// A [`Provider::Class`] is constructed via [`make`](Self::make); the
	/// described class must be marked `provides()`, otherwise registration
	/// fails with a [`CartonError::Container`] error.
	pub fn register(&self, providers: impl IntoIterator<Item = Provider>) -> CartonResult<()> {
		for provider in providers {
			match provider {
				Provider::Instance(provider) => provider.register(self)?,
				Provider::Class(name) => {
					debug!(class = %name, "constructing service provider");
					let value = self.make(&name, &Hints::new())?;
					let metadata =
						self.class_metadata(&name)
							.ok_or_else(|| CartonError::Container {
								message: format!("no metadata describes provider \"{name}\""),
							})?;
					let provider = metadata
						.provider_cast()
						.and_then(|cast| cast(&value))
						.ok_or_else(|| CartonError::Container {
							message: format!("\"{name}\" is not a service provider"),
						})?;
					provider.register(self)?;
				}
			}
		}
		Ok(())
	}

	/// Adds a class descriptor to this container's local table.
	pub fn describe(&self, metadata: ClassMetadata) {
		self.types
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.insert(metadata.name(), Arc::new(metadata));
	}

	/// Adds a [`Reflect`] type's descriptor to the local table.
	pub fn describe_type<T: Reflect>(&self) {
		self.describe(T::metadata());
	}

	/// Adds a free function descriptor.
	pub fn define_function(&self, function: FunctionMetadata) {
		self.functions
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.insert(function.name(), Arc::new(function));
	}

	/// Constructs an instance of the named class, resolving its
	/// constructor parameters per the resolution policy.
	///
	/// Every call constructs a fresh instance; `make` never caches. Fails
	/// with [`CartonError::ClassResolution`] when the class has no
	/// descriptor or no constructor, and propagates parameter failures.
	pub fn make(&self, class: &str, hints: &Hints) -> CartonResult<Value> {
		let metadata = self
			.class_metadata(class)
			.ok_or_else(|| CartonError::ClassResolution {
				class: class.to_string(),
				reason: String::from("no metadata registered for this type"),
			})?;

		let _guard = cycle::begin_resolution(metadata.name())?;
		debug!(class = metadata.name(), "constructing class");

		let Some((params, construct)) = metadata.constructor() else {
			return Err(CartonError::ClassResolution {
				class: class.to_string(),
				reason: String::from("type is not instantiable"),
			});
		};

		let values = resolver::resolve_parameters(self, params, hints, metadata.name())?;
		construct(&Args::new(values))
	}

	/// [`make`](Self::make) with a typed result.
	pub fn make_as<T: Reflect>(&self, hints: &Hints) -> CartonResult<Arc<T>> {
		let value = self.make(T::type_name(), hints)?;
		value
			.downcast::<T>()
			.ok_or_else(|| CartonError::ClassResolution {
				class: T::type_name().to_string(),
				reason: format!("constructed value has unexpected type {}", value.type_name()),
			})
	}

	/// Normalizes a callable-like input, resolves its parameters, invokes
	/// it, and returns the raw result.
	pub fn call(&self, callable: impl Into<Callable>, hints: &Hints) -> CartonResult<Value> {
		let invocable = callable::normalize(self, callable.into(), hints)?;
		debug!(callable = invocable.target(), "invoking callable");
		let values =
			resolver::resolve_parameters(self, invocable.params(), hints, invocable.target())?;
		invocable.invoke(&Args::new(values))
	}

	/// Like [`call`](Self::call) but stops short of invoking: returns the
	/// resolved argument list.
	pub fn get_arguments(
		&self,
		callable: impl Into<Callable>,
		hints: &Hints,
	) -> CartonResult<Vec<Value>> {
		let invocable = callable::normalize(self, callable.into(), hints)?;
		resolver::resolve_parameters(self, invocable.params(), hints, invocable.target())
	}

	/// Looks a builder up across the chain, for alias binding.
	fn builder(&self, id: &str) -> Option<Arc<dyn Builder>> {
		if let Some(builder) = self
			.items
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.get(id)
			.cloned()
		{
			return Some(builder);
		}
		self.delegate_snapshot()
			.iter()
			.find_map(|delegate| delegate.builder(id))
	}

	/// Class descriptor lookup: local table, then chained containers, then
	/// the global registration set (cached locally once found).
	pub(crate) fn class_metadata(&self, name: &str) -> Option<Arc<ClassMetadata>> {
		if let Some(metadata) = self
			.types
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.get(name)
			.cloned()
		{
			return Some(metadata);
		}

		for delegate in &self.delegate_snapshot() {
			if let Some(metadata) = delegate.class_metadata(name) {
				return Some(metadata);
			}
		}

		let metadata = Arc::new(metadata::global_metadata(name)?);
		self.types
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.insert(metadata.name(), Arc::clone(&metadata));
		Some(metadata)
	}

	/// Finds the descriptor for a value's runtime type, for bound-pair and
	/// invocable normalization.
	pub(crate) fn class_by_value(&self, value: &Value) -> Option<Arc<ClassMetadata>> {
		let type_id = value.type_id()?;
		self.class_by_id(type_id)
	}

	fn class_by_id(&self, type_id: TypeId) -> Option<Arc<ClassMetadata>> {
		if let Some(metadata) = self
			.types
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.values()
			.find(|metadata| metadata.tag().type_id() == type_id)
			.cloned()
		{
			return Some(metadata);
		}

		for delegate in &self.delegate_snapshot() {
			if let Some(metadata) = delegate.class_by_id(type_id) {
				return Some(metadata);
			}
		}

		let metadata = Arc::new(metadata::global_metadata_by_id(type_id)?);
		self.types
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.insert(metadata.name(), Arc::clone(&metadata));
		Some(metadata)
	}

	/// Free function descriptor lookup across the chain.
	pub(crate) fn function_metadata(&self, name: &str) -> Option<Arc<FunctionMetadata>> {
		if let Some(function) = self
			.functions
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.get(name)
			.cloned()
		{
			return Some(function);
		}
		self.delegate_snapshot()
			.iter()
			.find_map(|delegate| delegate.function_metadata(name))
	}

	/// Clones the delegate list so no lock is held while delegates run.
	fn delegate_snapshot(&self) -> Vec<Arc<Container>> {
		self.delegates
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}
}

impl Default for Container {
	fn default() -> Self {
		Self::new()
	}
}
