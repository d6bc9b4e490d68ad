//! Dirty-marking and lazy settling of computed cells.
//!
//! A change never recomputes anything by itself: it only marks the changed
//! cell's descendants invalid. Direct children are `Invalid::Definitely`,
//! everything further down `Invalid::Maybe`. A cell is recomputed when it is
//! observed, after every dirty ancestor has been settled, so each cell runs its
//! function at most once per pull and always sees settled parent values.
//!
//! A `Maybe` cell whose parents all still carry the versions it was computed
//! from is marked valid without running its function.

use fxhash::FxHashSet;
use smallvec::SmallVec;

use crate::dependencies::Versions;
use crate::error::Result;
use crate::{CellId, CellStore, Hashed, Invalid, State, Value, Version};

pub(crate) struct Evaluation<'a> {
	store: &'a CellStore,
}

impl<'a> Evaluation<'a> {
	pub fn new(store: &'a CellStore) -> Self {
		Evaluation { store }
	}

	/// Marks every transitive child of `id` invalid.
	///
	/// Stops at cells that are already invalid: their descendants are
	/// invalid too.
	pub fn invalidate_children(&self, id: CellId) -> Result<()> {
		let node = self.store.node(id)?;
		let mut stack: Vec<(CellId, Invalid)> = node
			.children()
			.iter()
			.rev()
			.map(|&child| (child, Invalid::Definitely))
			.collect();

		while let Some((id, invalid)) = stack.pop() {
			let node = self.store.node(id)?;
			if !matches!(node.state(), State::Valid) {
				continue;
			}

			tracing::trace!(cell = %id, ?invalid, "invalidate");
			node.set_state(State::Invalid(invalid));
			stack.extend(
				node.children()
					.iter()
					.rev()
					.map(|&child| (child, Invalid::Maybe)),
			);
		}

		Ok(())
	}

	/// Brings `id` up to date, settling its dirty ancestors first.
	pub fn settle(&self, id: CellId) -> Result<()> {
		for id in self.dirty_order(id)? {
			self.settle_one(id)?;
		}
		Ok(())
	}

	/// Post-order over the dirty ancestors of `target`, `target` last.
	///
	/// A valid cell only has valid ancestors, so the walk never goes past one.
	fn dirty_order(&self, target: CellId) -> Result<Vec<CellId>> {
		let mut order = Vec::new();
		if matches!(self.store.node(target)?.state(), State::Valid) {
			return Ok(order);
		}

		let mut visited = FxHashSet::default();
		let mut stack = vec![(target, false)];

		while let Some((id, expanded)) = stack.pop() {
			if expanded {
				order.push(id);
				continue;
			}
			if !visited.insert(id) {
				continue;
			}

			stack.push((id, true));
			for &parent in self.store.node(id)?.parents().iter().rev() {
				if visited.contains(&parent) {
					continue;
				}
				if !matches!(self.store.node(parent)?.state(), State::Valid) {
					stack.push((parent, false));
				}
			}
		}

		Ok(order)
	}

	fn settle_one(&self, id: CellId) -> Result<()> {
		let node = self.store.node(id)?;
		let state = node.state();
		if matches!(state, State::Valid) {
			return Ok(());
		}

		let Some(derivation) = node.derivation() else {
			node.set_state(State::Valid);
			return Ok(());
		};

		let parents = derivation.dependencies.parents();
		let versions = parents
			.iter()
			.map(|&parent| -> Result<Version> { Ok(self.store.node(parent)?.version()) })
			.collect::<Result<Versions>>()?;

		if state == State::Invalid(Invalid::Maybe) && derivation.dependencies.are_valid(&versions)
		{
			tracing::trace!(cell = %id, "inputs unchanged");
			node.set_state(State::Valid);
			return Ok(());
		}

		let args = parents
			.iter()
			.map(|&parent| -> Result<Value> { Ok(self.store.node(parent)?.value().value.clone()) })
			.collect::<Result<SmallVec<[Value; 4]>>>()?;

		let value = derivation.function.call(&args);
		tracing::trace!(
			cell = %id,
			function = derivation.function.name(),
			?value,
			"recompute"
		);

		node.replace_value(Hashed::new(value));
		derivation.dependencies.record(versions);
		node.set_state(State::Valid);
		Ok(())
	}
}
