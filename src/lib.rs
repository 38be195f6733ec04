//! # Carton
//!
//! A runtime dependency-injection container: a registry mapping string
//! identifiers to lazily-built values, plus a resolution engine that
//! constructs described types and invokes callables by automatically
//! supplying their dependencies.
//!
//! ## Features
//!
//! - **Registry**: `has`/`get`/`set` over string identifiers, with
//!   singleton and factory builder strategies, aliasing, and chained
//!   delegate containers.
//! - **Autowiring**: `make` resolves a described type's constructor
//!   parameters from caller hints, registered entries, or nested
//!   construction; `call` does the same for functions, bound methods, and
//!   invocable objects.
//! - **Descriptors instead of reflection**: types implement [`Reflect`]
//!   and describe their constructors and methods through the
//!   [`ClassMetadata`] builder DSL; the [`reflect_type!`] macro makes
//!   descriptors discoverable process-wide.
//! - **Predictable failures**: every miss surfaces as a typed
//!   [`CartonError`]; cyclic construction is detected and reported with
//!   its path.
//!
//! ## Example
//!
//! ```
//! use carton::{Args, CartonResult, ClassMetadata, Container, Param, Reflect, hints};
//!
//! #[derive(Clone)]
//! struct Fuel {
//! 	octane: u8,
//! }
//!
//! impl Reflect for Fuel {
//! 	fn type_name() -> &'static str {
//! 		"Fuel"
//! 	}
//!
//! 	fn metadata() -> ClassMetadata {
//! 		ClassMetadata::builder::<Fuel>()
//! 			.constructor(vec![], |_| Ok(Fuel { octane: 95 }))
//! 			.build()
//! 	}
//! }
//!
//! struct Engine {
//! 	name: String,
//! 	fuel: Fuel,
//! }
//!
//! impl Reflect for Engine {
//! 	fn type_name() -> &'static str {
//! 		"Engine"
//! 	}
//!
//! 	fn metadata() -> ClassMetadata {
//! 		ClassMetadata::builder::<Engine>()
//! 			.constructor(
//! 				vec![
//! 					Param::primitive::<String>("name"),
//! 					Param::class::<Fuel>("fuel"),
//! 				],
//! 				|args: &Args| {
//! 					Ok(Engine {
//! 						name: args.get_cloned::<String>(0)?,
//! 						fuel: args.get_cloned::<Fuel>(1)?,
//! 					})
//! 				},
//! 			)
//! 			.build()
//! 	}
//! }
//!
//! fn main() -> CartonResult<()> {
//! 	let container = Container::new();
//! 	container.describe_type::<Fuel>();
//! 	container.describe_type::<Engine>();
//!
//! 	// "name" comes from the hint; "fuel" is constructed recursively.
//! 	let engine = container.make_as::<Engine>(&hints! { "name" => String::from("V8") })?;
//! 	assert_eq!(engine.name, "V8");
//! 	assert_eq!(engine.fuel.octane, 95);
//! 	Ok(())
//! }
//! ```
//!
//! ## Resolution policy
//!
//! For each formal parameter, in declaration order, first match wins:
//!
//! 1. a caller hint under the parameter's exact name (used verbatim);
//! 2. for class-typed parameters: the registry entry named after the
//!    type, else the first hint value of matching runtime type, else a
//!    recursive `make`;
//! 3. for untyped/primitive parameters: the declared default, else null
//!    when nullable;
//! 4. otherwise a [`CartonError::ParameterResolution`] failure.
//!
//! ## Concurrency
//!
//! Resolution is synchronous and runs to completion before returning. The
//! container uses interior mutability so it can be shared behind `Arc`,
//! but a builder callback that blocks will block the caller.

mod builder;
mod callable;
mod container;
mod cycle;
mod error;
mod hints;
mod metadata;
mod provider;
mod resolver;
mod value;

pub use builder::{Builder, BuilderFn, FactoryBuilder, FixedBuilder, IntoBuilder, SingletonBuilder};
pub use callable::Callable;
pub use container::Container;
pub use error::{CartonError, CartonResult};
pub use hints::Hints;
pub use metadata::{
	Args, ClassMetadata, ClassMetadataBuilder, FunctionMetadata, MethodMetadata, Param, Reflect,
	TypeRegistration, TypeTag,
};
pub use provider::{Provider, ServiceProvider};
pub use value::Value;

// Re-exported for the `reflect_type!` macro expansion.
#[doc(hidden)]
pub use inventory;
