//! Shared mock types for integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};

use carton::{
	Args, CartonResult, ClassMetadata, Container, Param, Reflect, ServiceProvider, Value,
};

/// Leaf dependency with a parameterless constructor.
#[derive(Clone, Debug, PartialEq)]
pub struct Fuel {
	pub octane: u8,
}

impl Reflect for Fuel {
	fn type_name() -> &'static str {
		"Fuel"
	}

	fn metadata() -> ClassMetadata {
		ClassMetadata::builder::<Fuel>()
			.constructor(vec![], |_| Ok(Fuel { octane: 95 }))
			.build()
	}
}

/// Depends on a primitive and a class-typed parameter.
#[derive(Clone)]
pub struct Engine {
	pub name: String,
	pub fuel: Fuel,
}

impl Reflect for Engine {
	fn type_name() -> &'static str {
		"Engine"
	}

	fn metadata() -> ClassMetadata {
		ClassMetadata::builder::<Engine>()
			.constructor(
				vec![
					Param::primitive::<String>("name"),
					Param::class::<Fuel>("fuel"),
				],
				|args: &Args| {
					Ok(Engine {
						name: args.get_cloned::<String>(0)?,
						fuel: args.get_cloned::<Fuel>(1)?,
					})
				},
			)
			.build()
	}
}

/// Carries a described method and an invoke capability.
#[derive(Clone)]
pub struct Greeter {
	pub greeting: String,
}

impl Reflect for Greeter {
	fn type_name() -> &'static str {
		"Greeter"
	}

	fn metadata() -> ClassMetadata {
		ClassMetadata::builder::<Greeter>()
			.constructor(
				vec![Param::primitive::<String>("greeting").with_default(String::from("Hello"))],
				|args: &Args| {
					Ok(Greeter {
						greeting: args.get_cloned::<String>(0)?,
					})
				},
			)
			.method(
				"say_hi",
				vec![Param::primitive::<String>("name").with_default(String::from("world"))],
				|greeter: &Greeter, args: &Args| {
					let name = args.get_cloned::<String>(0)?;
					Ok(Value::new(format!("{}, {}!", greeter.greeting, name)))
				},
			)
			.invocable(vec![], |greeter: &Greeter, _args: &Args| {
				Ok(Value::new(greeter.greeting.clone()))
			})
			.build()
	}
}

/// Registers a single item under "sample".
pub struct SampleProvider;

impl ServiceProvider for SampleProvider {
	fn register(&self, container: &Container) -> CartonResult<()> {
		container.set("sample", Value::new(String::from("sample")));
		Ok(())
	}
}

impl Reflect for SampleProvider {
	fn type_name() -> &'static str {
		"SampleProvider"
	}

	fn metadata() -> ClassMetadata {
		ClassMetadata::builder::<SampleProvider>()
			.constructor(vec![], |_| Ok(SampleProvider))
			.provides()
			.build()
	}
}

static COUNTED_INSTANCES: AtomicU32 = AtomicU32::new(0);

/// Tags every constructed instance with a distinct id.
#[derive(Clone, Debug, PartialEq)]
pub struct Counted {
	pub id: u32,
}

impl Reflect for Counted {
	fn type_name() -> &'static str {
		"Counted"
	}

	fn metadata() -> ClassMetadata {
		ClassMetadata::builder::<Counted>()
			.constructor(vec![], |_| {
				Ok(Counted {
					id: COUNTED_INSTANCES.fetch_add(1, Ordering::SeqCst),
				})
			})
			.build()
	}
}
