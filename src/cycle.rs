//! Circular construction detection
//!
//! `make` recursing through rule 2c of the resolution policy is bounded
//! only by the dependency graph's depth; a cyclic graph (A requires B
//! requires A) would otherwise recurse until a stack fault. This module
//! tracks in-progress type names in thread-local state with O(1) lookup,
//! plus a depth limit for pathological non-cyclic chains. Cleanup is RAII
//! via [`ResolutionGuard`].

use std::cell::RefCell;
use std::collections::HashSet;

use crate::error::CartonError;

/// Maximum construction depth before resolution is aborted.
const MAX_RESOLUTION_DEPTH: usize = 100;

/// Per-thread state tracking the construction stack.
struct CycleState {
	/// Types currently being constructed (O(1) circular detection)
	in_progress: HashSet<&'static str>,
	/// Construction path, for rendering the cycle in error messages
	path: Vec<&'static str>,
}

thread_local! {
	static CYCLE_STATE: RefCell<CycleState> = RefCell::new(CycleState {
		in_progress: HashSet::new(),
		path: Vec::new(),
	});
}

/// Records the start of a type's construction.
///
/// Fails with [`CartonError::CircularDependency`] if the type is already on
/// the construction stack, or [`CartonError::MaxDepthExceeded`] past the
/// depth limit. The returned guard unwinds the bookkeeping on drop.
pub(crate) fn begin_resolution(class: &'static str) -> Result<ResolutionGuard, CartonError> {
	CYCLE_STATE.with(|state| {
		let mut state = state.borrow_mut();

		if state.path.len() >= MAX_RESOLUTION_DEPTH {
			return Err(CartonError::MaxDepthExceeded(state.path.len() + 1));
		}

		if state.in_progress.contains(class) {
			let path = render_cycle(&state.path, class);
			return Err(CartonError::CircularDependency {
				class: class.to_string(),
				path,
			});
		}

		state.in_progress.insert(class);
		state.path.push(class);
		Ok(ResolutionGuard { class })
	})
}

/// RAII guard removing a type from the construction stack on drop.
#[derive(Debug)]
pub(crate) struct ResolutionGuard {
	class: &'static str,
}

impl Drop for ResolutionGuard {
	fn drop(&mut self) {
		let _ = CYCLE_STATE.try_with(|state| {
			let mut state = state.borrow_mut();
			state.in_progress.remove(self.class);
			if let Some(pos) = state.path.iter().rposition(|c| *c == self.class) {
				state.path.remove(pos);
			}
		});
	}
}

/// Renders the cycle as `A -> B -> A`, starting at the repeated type.
fn render_cycle(path: &[&'static str], class: &'static str) -> String {
	match path.iter().position(|c| *c == class) {
		Some(start) => {
			let mut cycle: Vec<&str> = path[start..].to_vec();
			cycle.push(class);
			cycle.join(" -> ")
		}
		None => format!("unknown cycle involving {class}"),
	}
}
