//! Descriptor tables standing in for runtime reflection
//!
//! Rust has no reflection, so targets are described rather than
//! introspected: a type implements [`Reflect`] and hands the engine a
//! [`ClassMetadata`] descriptor listing its constructor, methods, and
//! their formal parameters. Free functions are described by
//! [`FunctionMetadata`]. Descriptors registered through the
//! [`reflect_type!`](crate::reflect_type!) macro are discoverable
//! process-wide via `inventory`, mirroring how a reflective runtime finds
//! any loaded class.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{CartonError, CartonResult};
use crate::provider::ServiceProvider;
use crate::value::Value;

/// A type that can be described to the resolution engine.
///
/// `type_name` doubles as the registry identifier the engine uses for
/// rule-2a lookups and for `make`; override it with a short stable name
/// when the default module path is unwieldy.
///
/// # Examples
///
/// ```
/// use carton::{Args, ClassMetadata, Param, Reflect};
///
/// struct Fuel;
///
/// impl Reflect for Fuel {
/// 	fn type_name() -> &'static str {
/// 		"Fuel"
/// 	}
///
/// 	fn metadata() -> ClassMetadata {
/// 		ClassMetadata::builder::<Fuel>()
/// 			.constructor(vec![], |_| Ok(Fuel))
/// 			.build()
/// 	}
/// }
///
/// struct Engine {
/// 	name: String,
/// }
///
/// impl Reflect for Engine {
/// 	fn type_name() -> &'static str {
/// 		"Engine"
/// 	}
///
/// 	fn metadata() -> ClassMetadata {
/// 		ClassMetadata::builder::<Engine>()
/// 			.constructor(
/// 				vec![
/// 					Param::primitive::<String>("name"),
/// 					Param::class::<Fuel>("fuel"),
/// 				],
/// 				|args: &Args| {
/// 					Ok(Engine {
/// 						name: args.get_cloned::<String>(0)?,
/// 					})
/// 				},
/// 			)
/// 			.build()
/// 	}
/// }
/// ```
pub trait Reflect: Any + Send + Sync + Sized {
	/// The identifier this type is registered and resolved under.
	fn type_name() -> &'static str {
		std::any::type_name::<Self>()
	}

	/// The type's descriptor.
	fn metadata() -> ClassMetadata;
}

/// Runtime tag for a declared parameter type: the `TypeId` used for
/// is-instance-of checks plus the registered name used for registry and
/// descriptor lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeTag {
	id: TypeId,
	name: &'static str,
}

impl TypeTag {
	/// Tag of a described class type.
	pub fn of<T: Reflect>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: T::type_name(),
		}
	}

	/// Tag of a primitive/built-in type, named after its Rust path.
	pub fn primitive<T: Any>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: std::any::type_name::<T>(),
		}
	}

	/// The registered name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	pub(crate) fn type_id(&self) -> TypeId {
		self.id
	}

	/// Whether the given value is an instance of this type.
	pub fn matches(&self, value: &Value) -> bool {
		value.type_id() == Some(self.id)
	}
}

/// A formal parameter of a constructor, function, or method.
#[derive(Clone)]
pub struct Param {
	name: &'static str,
	ty: Option<TypeTag>,
	primitive: bool,
	default: Option<Value>,
	nullable: bool,
}

impl Param {
	/// A parameter declared with a described class type.
	pub fn class<T: Reflect>(name: &'static str) -> Self {
		Self {
			name,
			ty: Some(TypeTag::of::<T>()),
			primitive: false,
			default: None,
			nullable: false,
		}
	}

	/// A parameter declared with a primitive/built-in type.
	pub fn primitive<T: Any + Send + Sync>(name: &'static str) -> Self {
		Self {
			name,
			ty: Some(TypeTag::primitive::<T>()),
			primitive: true,
			default: None,
			nullable: false,
		}
	}

	/// A parameter with no declared type.
	pub fn untyped(name: &'static str) -> Self {
		Self {
			name,
			ty: None,
			primitive: false,
			default: None,
			nullable: false,
		}
	}

	/// Declares a default value, used when no caller or registry value
	/// applies (untyped and primitive parameters only; class parameters
	/// are constructed instead).
	pub fn with_default<T: Any + Send + Sync>(mut self, value: T) -> Self {
		self.default = Some(Value::new(value));
		self
	}

	/// Marks the parameter as accepting the null value.
	pub fn nullable(mut self) -> Self {
		self.nullable = true;
		self
	}

	/// The parameter's declared name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// The declared type, if any.
	pub fn type_tag(&self) -> Option<&TypeTag> {
		self.ty.as_ref()
	}

	/// Whether the declared type is a primitive/built-in.
	pub fn is_primitive(&self) -> bool {
		self.primitive
	}

	/// The declared default value, if any.
	pub fn default(&self) -> Option<&Value> {
		self.default.as_ref()
	}

	/// Whether the parameter accepts the null value.
	pub fn is_nullable(&self) -> bool {
		self.nullable
	}
}

/// A resolved argument list, positional, with typed accessors.
pub struct Args {
	values: Vec<Value>,
}

impl Args {
	pub(crate) fn new(values: Vec<Value>) -> Self {
		Self { values }
	}

	/// Shared access to the argument at `index`.
	pub fn get<T: Any + Send + Sync>(&self, index: usize) -> CartonResult<Arc<T>> {
		let value = self.values.get(index).ok_or_else(|| CartonError::Container {
			message: format!("missing argument {index}"),
		})?;
		value.downcast::<T>().ok_or(CartonError::ArgumentType {
			index,
			expected: std::any::type_name::<T>(),
			actual: value.type_name(),
		})
	}

	/// Cloned copy of the argument at `index`.
	pub fn get_cloned<T: Any + Send + Sync + Clone>(&self, index: usize) -> CartonResult<T> {
		self.get::<T>(index).map(|arc| (*arc).clone())
	}

	/// The argument at `index`, or `None` if it is null or of another type.
	pub fn opt<T: Any + Send + Sync>(&self, index: usize) -> Option<Arc<T>> {
		self.values.get(index)?.downcast::<T>()
	}

	/// Whether the argument at `index` is the null value.
	pub fn is_null(&self, index: usize) -> bool {
		self.values.get(index).is_some_and(Value::is_none)
	}

	/// Raw access to the argument at `index`.
	pub fn value(&self, index: usize) -> Option<&Value> {
		self.values.get(index)
	}

	/// Number of arguments.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Whether the list is empty.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

type ConstructFn = dyn Fn(&Args) -> CartonResult<Value> + Send + Sync;
type MethodFn = dyn Fn(&Value, &Args) -> CartonResult<Value> + Send + Sync;
type ProviderCast = dyn Fn(&Value) -> Option<Arc<dyn ServiceProvider>> + Send + Sync;

/// Descriptor of a named method: formal parameters plus an invoke closure
/// bound to the receiver at call time.
pub struct MethodMetadata {
	name: &'static str,
	params: Vec<Param>,
	invoke: Arc<MethodFn>,
}

impl MethodMetadata {
	/// The method's declared name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// The method's formal parameters.
	pub fn params(&self) -> &[Param] {
		&self.params
	}

	pub(crate) fn invoke(&self, receiver: &Value, args: &Args) -> CartonResult<Value> {
		(self.invoke)(receiver, args)
	}
}

/// Descriptor of a free function.
pub struct FunctionMetadata {
	name: &'static str,
	params: Vec<Param>,
	invoke: Arc<ConstructFn>,
}

impl FunctionMetadata {
	/// Describes a free function.
	pub fn new<F>(name: &'static str, params: Vec<Param>, f: F) -> Self
	where
		F: Fn(&Args) -> CartonResult<Value> + Send + Sync + 'static,
	{
		Self {
			name,
			params,
			invoke: Arc::new(f),
		}
	}

	/// The function's registered name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// The function's formal parameters.
	pub fn params(&self) -> &[Param] {
		&self.params
	}

	pub(crate) fn invoke(&self, args: &Args) -> CartonResult<Value> {
		(self.invoke)(args)
	}
}

/// Per-type descriptor: the reflection substitute the engine reads.
///
/// Built through [`ClassMetadata::builder`]. A type without a constructor
/// entry is treated as non-instantiable by `make`.
pub struct ClassMetadata {
	tag: TypeTag,
	constructor: Option<(Vec<Param>, Arc<ConstructFn>)>,
	methods: HashMap<&'static str, Arc<MethodMetadata>>,
	invoke: Option<Arc<MethodMetadata>>,
	provider_cast: Option<Arc<ProviderCast>>,
}

impl ClassMetadata {
	/// Starts a descriptor for `T`.
	pub fn builder<T: Reflect>() -> ClassMetadataBuilder<T> {
		ClassMetadataBuilder {
			meta: ClassMetadata {
				tag: TypeTag::of::<T>(),
				constructor: None,
				methods: HashMap::new(),
				invoke: None,
				provider_cast: None,
			},
			_marker: std::marker::PhantomData,
		}
	}

	/// The described type's registered name.
	pub fn name(&self) -> &'static str {
		self.tag.name()
	}

	/// The described type's tag.
	pub fn tag(&self) -> &TypeTag {
		&self.tag
	}

	pub(crate) fn constructor(&self) -> Option<(&[Param], &Arc<ConstructFn>)> {
		self.constructor
			.as_ref()
			.map(|(params, construct)| (params.as_slice(), construct))
	}

	/// Looks up a described method by name.
	pub fn method(&self, name: &str) -> Option<&Arc<MethodMetadata>> {
		self.methods.get(name)
	}

	/// The invoke capability, if the type is invocable.
	pub fn invocable(&self) -> Option<&Arc<MethodMetadata>> {
		self.invoke.as_ref()
	}

	pub(crate) fn provider_cast(&self) -> Option<&Arc<ProviderCast>> {
		self.provider_cast.as_ref()
	}
}

/// Typed builder DSL for [`ClassMetadata`].
pub struct ClassMetadataBuilder<T: Reflect> {
	meta: ClassMetadata,
	_marker: std::marker::PhantomData<fn() -> T>,
}

impl<T: Reflect> ClassMetadataBuilder<T> {
	/// Describes the constructor: formal parameters plus a construct
	/// closure receiving the resolved argument list.
	pub fn constructor<F>(mut self, params: Vec<Param>, construct: F) -> Self
	where
		F: Fn(&Args) -> CartonResult<T> + Send + Sync + 'static,
	{
		self.meta.constructor = Some((
			params,
			Arc::new(move |args: &Args| construct(args).map(Value::new)),
		));
		self
	}

	/// Shorthand for a parameterless constructor over `Default`.
	pub fn default_constructor(self) -> Self
	where
		T: Default,
	{
		self.constructor(Vec::new(), |_| Ok(T::default()))
	}

	/// Describes a named method.
	pub fn method<F>(mut self, name: &'static str, params: Vec<Param>, f: F) -> Self
	where
		F: Fn(&T, &Args) -> CartonResult<Value> + Send + Sync + 'static,
	{
		self.meta
			.methods
			.insert(name, Arc::new(Self::bind_method(name, params, f)));
		self
	}

	/// Describes the invoke capability, making the type invocable as a
	/// callable object.
	pub fn invocable<F>(mut self, params: Vec<Param>, f: F) -> Self
	where
		F: Fn(&T, &Args) -> CartonResult<Value> + Send + Sync + 'static,
	{
		self.meta.invoke = Some(Arc::new(Self::bind_method("invoke", params, f)));
		self
	}

	/// Marks the type as a service provider, letting `register` accept it
	/// by class name.
	pub fn provides(mut self) -> Self
	where
		T: ServiceProvider,
	{
		self.meta.provider_cast = Some(Arc::new(|value: &Value| {
			value
				.downcast::<T>()
				.map(|arc| arc as Arc<dyn ServiceProvider>)
		}));
		self
	}

	/// Finishes the descriptor.
	pub fn build(self) -> ClassMetadata {
		self.meta
	}

	fn bind_method<F>(name: &'static str, params: Vec<Param>, f: F) -> MethodMetadata
	where
		F: Fn(&T, &Args) -> CartonResult<Value> + Send + Sync + 'static,
	{
		let invoke: Arc<MethodFn> = Arc::new(move |receiver: &Value, args: &Args| {
			let receiver = receiver.downcast::<T>().ok_or_else(|| {
				CartonError::CallableResolution {
					reason: format!(
						"receiver is not a {} (got {})",
						T::type_name(),
						receiver.type_name()
					),
				}
			})?;
			f(receiver.as_ref(), args)
		});
		MethodMetadata {
			name,
			params,
			invoke,
		}
	}
}

/// An `inventory`-collected descriptor entry, submitted by
/// [`reflect_type!`](crate::reflect_type!).
///
/// Containers fall back to these entries when a `make` target has no
/// locally described metadata, so described types are discoverable
/// process-wide the way classes are under a reflective runtime.
pub struct TypeRegistration {
	name: fn() -> &'static str,
	metadata: fn() -> ClassMetadata,
}

impl TypeRegistration {
	/// Creates an entry from a type's `Reflect` functions.
	pub const fn new(name: fn() -> &'static str, metadata: fn() -> ClassMetadata) -> Self {
		Self { name, metadata }
	}
}

inventory::collect!(TypeRegistration);

/// Looks a descriptor up in the global registration set.
pub(crate) fn global_metadata(name: &str) -> Option<ClassMetadata> {
	inventory::iter::<TypeRegistration>
		.into_iter()
		.find(|reg| (reg.name)() == name)
		.map(|reg| (reg.metadata)())
}

/// Scans the global registration set for a descriptor by `TypeId`.
pub(crate) fn global_metadata_by_id(type_id: TypeId) -> Option<ClassMetadata> {
	inventory::iter::<TypeRegistration>
		.into_iter()
		.map(|reg| (reg.metadata)())
		.find(|meta| meta.tag().type_id() == type_id)
}

/// Submits a [`Reflect`] type's descriptor to the global registration set.
///
/// # Examples
///
/// ```ignore
/// carton::reflect_type!(Engine);
/// ```
#[macro_export]
macro_rules! reflect_type {
	($ty:ty) => {
		$crate::inventory::submit! {
			$crate::TypeRegistration::new(
				<$ty as $crate::Reflect>::type_name,
				<$ty as $crate::Reflect>::metadata,
			)
		}
	};
}
