//! Caller-supplied parameter values

use indexmap::IndexMap;

use crate::value::Value;

/// User-supplied parameters for a single resolution call.
///
/// Keys are parameter names; the engine consults them by exact name first,
/// then scans the values (in insertion order) for runtime type matches.
/// The engine never mutates a `Hints` map; the whole map is forwarded into
/// nested construction.
///
/// # Examples
///
/// ```
/// use carton::{Hints, Value};
///
/// let hints = Hints::new()
/// 	.with("name", String::from("V8"))
/// 	.with_value("extra", Value::new(12i64));
///
/// assert!(hints.get("name").is_some());
/// assert_eq!(hints.len(), 2);
/// ```
///
/// The [`hints!`](crate::hints!) macro builds a map inline:
///
/// ```
/// use carton::hints;
///
/// let hints = hints! { "a" => 3i64, "b" => String::from("x") };
/// assert_eq!(hints.len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Hints {
	entries: IndexMap<String, Value>,
}

impl Hints {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style insert of a concrete value.
	pub fn with<T: std::any::Any + Send + Sync>(self, name: impl Into<String>, value: T) -> Self {
		self.with_value(name, Value::new(value))
	}

	/// Builder-style insert of an already-erased value.
	pub fn with_value(mut self, name: impl Into<String>, value: Value) -> Self {
		self.entries.insert(name.into(), value);
		self
	}

	/// Inserts a value, replacing any previous entry under the same name.
	pub fn insert(&mut self, name: impl Into<String>, value: Value) {
		self.entries.insert(name.into(), value);
	}

	/// Looks a value up by parameter name.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.entries.get(name)
	}

	/// Values in insertion order, for the type-match scan.
	pub fn values(&self) -> impl Iterator<Item = &Value> {
		self.entries.values()
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the map is empty.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Builds a [`Hints`] map inline.
///
/// Each value is wrapped with [`Value::new`](crate::Value::new).
#[macro_export]
macro_rules! hints {
	() => { $crate::Hints::new() };
	($($name:expr => $value:expr),+ $(,)?) => {{
		let mut hints = $crate::Hints::new();
		$( hints.insert($name, $crate::Value::new($value)); )+
		hints
	}};
}
