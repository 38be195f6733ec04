//! Callable normalization: functions, closures, bound pairs, invocable
//! objects, and string expressions.

mod common;

use std::sync::atomic::{AtomicU32, Ordering};

use carton::{
	Args, Callable, CartonError, Container, FunctionMetadata, Param, Value, hints,
};
use common::{Engine, Fuel, Greeter};
use rstest::*;

#[fixture]
fn container() -> Container {
	let container = Container::new();
	container.describe_type::<Fuel>();
	container.describe_type::<Engine>();
	container.describe_type::<Greeter>();
	container
}

#[rstest]
fn closure_call_applies_defaults(container: Container) {
	// call(fn(a, b = 5), {a: 3}) invokes with (3, 5)
	let callable = Callable::closure(
		vec![
			Param::primitive::<i64>("a"),
			Param::primitive::<i64>("b").with_default(5i64),
		],
		|args: &Args| Ok(Value::new(args.get_cloned::<i64>(0)? + args.get_cloned::<i64>(1)?)),
	);

	let result = container.call(callable, &hints! { "a" => 3i64 }).unwrap();

	assert_eq!(*result.downcast::<i64>().unwrap(), 8);
}

#[rstest]
fn registered_function_is_called_by_name(container: Container) {
	container.define_function(FunctionMetadata::new(
		"shout",
		vec![Param::primitive::<String>("word")],
		|args: &Args| Ok(Value::new(args.get_cloned::<String>(0)?.to_uppercase())),
	));

	let result = container
		.call(
			Callable::function("shout"),
			&hints! { "word" => String::from("hi") },
		)
		.unwrap();

	assert_eq!(*result.downcast::<String>().unwrap(), "HI");
}

#[rstest]
fn unknown_function_fails(container: Container) {
	let result = container.call(Callable::function("missing"), &hints! {});

	assert!(matches!(result, Err(CartonError::CallableResolution { .. })));
}

#[rstest]
fn bound_method_is_invoked_on_receiver(container: Container) {
	let greeter = Greeter {
		greeting: String::from("Howdy"),
	};

	let result = container
		.call(
			Callable::method(greeter, "say_hi"),
			&hints! { "name" => String::from("Sam") },
		)
		.unwrap();

	assert_eq!(*result.downcast::<String>().unwrap(), "Howdy, Sam!");
}

#[rstest]
fn unknown_method_fails(container: Container) {
	let greeter = Greeter {
		greeting: String::from("Howdy"),
	};

	let result = container.call(Callable::method(greeter, "wave"), &hints! {});

	match result {
		Err(CartonError::CallableResolution { reason }) => {
			assert!(reason.contains("wave"), "unexpected reason: {reason}");
		}
		other => panic!("expected CallableResolution, got {other:?}"),
	}
}

#[rstest]
fn undescribed_receiver_fails(container: Container) {
	struct NotDescribed;

	let result = container.call(Callable::method(NotDescribed, "anything"), &hints! {});

	assert!(matches!(result, Err(CartonError::CallableResolution { .. })));
}

#[rstest]
fn invocable_object_is_called(container: Container) {
	let greeter = Greeter {
		greeting: String::from("Hey"),
	};

	let result = container
		.call(Callable::invocable(greeter), &hints! {})
		.unwrap();

	assert_eq!(*result.downcast::<String>().unwrap(), "Hey");
}

#[rstest]
fn non_invocable_value_fails(container: Container) {
	// Engine is described but has no invoke capability.
	let engine = Engine {
		name: String::from("V8"),
		fuel: Fuel { octane: 95 },
	};

	let result = container.call(Callable::invocable(engine), &hints! {});

	match result {
		Err(CartonError::CallableResolution { reason }) => {
			assert!(reason.contains("not invocable"), "unexpected reason: {reason}");
		}
		other => panic!("expected CallableResolution, got {other:?}"),
	}
}

#[rstest]
fn class_at_method_expression_constructs_and_binds(container: Container) {
	// "Greeter@say_hi" with Greeter constructible without arguments
	let result = container.call("Greeter@say_hi", &hints! {}).unwrap();

	assert_eq!(*result.downcast::<String>().unwrap(), "Hello, world!");
}

#[rstest]
fn expression_hints_feed_constructor_and_method(container: Container) {
	// "greeting" satisfies the constructor, "name" the method.
	let hints = hints! {
		"greeting" => String::from("Yo"),
		"name" => String::from("Sam"),
	};

	let result = container.call("Greeter@say_hi", &hints).unwrap();

	assert_eq!(*result.downcast::<String>().unwrap(), "Yo, Sam!");
}

#[rstest]
fn bare_class_expression_uses_invoke_capability(container: Container) {
	let result = container.call("Greeter", &hints! {}).unwrap();

	assert_eq!(*result.downcast::<String>().unwrap(), "Hello");
}

#[rstest]
fn bare_class_expression_without_invoke_fails(container: Container) {
	let result = container.call("Engine", &hints! { "name" => String::from("V8") });

	assert!(matches!(result, Err(CartonError::CallableResolution { .. })));
}

#[rstest]
fn expression_with_unknown_class_propagates(container: Container) {
	let result = container.call("Ghost@method", &hints! {});

	assert!(matches!(result, Err(CartonError::ClassResolution { .. })));
}

#[rstest]
fn get_arguments_resolves_without_invoking(container: Container) {
	static INVOCATIONS: AtomicU32 = AtomicU32::new(0);
	let callable = Callable::closure(
		vec![Param::primitive::<i64>("a").with_default(1i64)],
		|args: &Args| {
			INVOCATIONS.fetch_add(1, Ordering::SeqCst);
			Ok(Value::new(args.get_cloned::<i64>(0)?))
		},
	);

	let args = container.get_arguments(callable, &hints! {}).unwrap();

	assert_eq!(args.len(), 1);
	assert_eq!(*args[0].downcast::<i64>().unwrap(), 1);
	assert_eq!(INVOCATIONS.load(Ordering::SeqCst), 0);
}
