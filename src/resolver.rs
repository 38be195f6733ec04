//! The resolution engine
//!
//! Produces a concrete argument list for a target's formal parameters by
//! applying an ordered decision policy per parameter. The policy is
//! first-match-wins with no fallthrough between the typed and
//! default/nullable branches:
//!
//! 1. a caller hint under the parameter's exact name, used verbatim;
//! 2. for typed non-primitive parameters: the registry entry named after
//!    the type, else the first hint value of matching runtime type, else
//!    a recursive `make` of the type (forwarding the whole hint map);
//! 3. for untyped or primitive parameters: the declared default, else
//!    null when the parameter is nullable;
//! 4. otherwise a `ParameterResolution` failure naming the parameter and
//!    its owning target.
//!
//! Name match is checked first so explicit caller intent always overrides
//! automatic wiring, and the registry is consulted before nested
//! construction so registered instances win over freshly built ones.

use tracing::trace;

use crate::container::Container;
use crate::error::{CartonError, CartonResult};
use crate::hints::Hints;
use crate::metadata::Param;
use crate::value::Value;

/// Resolves every parameter in declaration order.
///
/// The result has exactly one value per parameter; any rule-4 miss or
/// nested failure aborts the whole list.
pub(crate) fn resolve_parameters(
	container: &Container,
	params: &[Param],
	hints: &Hints,
	target: &str,
) -> CartonResult<Vec<Value>> {
	params
		.iter()
		.map(|param| resolve_parameter(container, param, hints, target))
		.collect()
}

fn resolve_parameter(
	container: &Container,
	param: &Param,
	hints: &Hints,
	target: &str,
) -> CartonResult<Value> {
	// Rule 1: exact name match, verbatim, no type check.
	if let Some(value) = hints.get(param.name()) {
		trace!(parameter = param.name(), owner = target, "resolved from named hint");
		return Ok(value.clone());
	}

	// Rule 2: typed, non-primitive parameter.
	if let Some(tag) = param.type_tag() {
		if !param.is_primitive() {
			// 2a: a registered instance wins over construction.
			if container.has(tag.name()) {
				trace!(parameter = param.name(), owner = target, "resolved from registry");
				return container.get(tag.name());
			}

			// 2b: first hint value of matching runtime type, so batch
			// calls can pass a pool of dependencies without per-name
			// plumbing.
			if let Some(value) = hints.values().find(|value| tag.matches(value)) {
				trace!(parameter = param.name(), owner = target, "resolved from hint type scan");
				return Ok(value.clone());
			}

			// 2c: recursive construction, forwarding the full hint map as
			// candidate constructor arguments for the nested build.
			trace!(
				parameter = param.name(),
				class = tag.name(),
				owner = target,
				"resolving by nested construction"
			);
			return container.make(tag.name(), hints);
		}
	}

	// Rule 3: untyped or primitive parameter.
	if let Some(default) = param.default() {
		return Ok(default.clone());
	}
	if param.is_nullable() {
		return Ok(Value::none());
	}

	// Rule 4: nothing applies.
	Err(CartonError::ParameterResolution {
		parameter: param.name().to_string(),
		target: target.to_string(),
	})
}
