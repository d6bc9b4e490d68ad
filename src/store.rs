use std::fmt;

use crate::cell::{Derivation, Node};
use crate::dependencies::Dependencies;
use crate::error::{Error, Result};
use crate::evaluation::Evaluation;
use crate::{CellId, CellKind, Function, Hashed, Scalar, State, Toggle, Value, ValueKind};

enum Slot {
	Occupied { generation: u32, node: Node },
	Vacant { generation: u32 },
}

/// Owner of every cell in a graph.
///
/// Cells are addressed by [`CellId`] handles, and all edges between cells are
/// handles too, so the store is free to move cell storage around. Structural
/// changes (`create`, `set_literal`, `bind`, `detach`, `release`) take
/// `&mut self`; reads take `&self` and settle dirty cells on the way.
#[derive(Default)]
pub struct CellStore {
	slots: Vec<Slot>,
	free: Vec<usize>,
	len: usize,
}

impl CellStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_capacity(capacity: usize) -> Self {
		CellStore {
			slots: Vec::with_capacity(capacity),
			free: Vec::new(),
			len: 0,
		}
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	pub fn contains(&self, id: CellId) -> bool {
		self.node(id).is_ok()
	}

	/// Live handles in slot order.
	pub fn ids(&self) -> impl Iterator<Item = CellId> + '_ {
		self.slots
			.iter()
			.enumerate()
			.filter_map(|(index, slot)| match slot {
				Slot::Occupied { generation, .. } => Some(CellId::new(index, *generation)),
				Slot::Vacant { .. } => None,
			})
	}

	/// Creates a literal cell. The kind of `value` is the cell's kind for life.
	pub fn create(&mut self, value: impl Into<Value>) -> CellId {
		let node = Node::new(value.into());

		let id = match self.free.pop() {
			Some(index) => {
				let generation = match self.slots[index] {
					Slot::Vacant { generation } => generation,
					Slot::Occupied { generation, .. } => generation,
				};
				self.slots[index] = Slot::Occupied { generation, node };
				CellId::new(index, generation)
			}
			None => {
				self.slots.push(Slot::Occupied {
					generation: 0,
					node,
				});
				CellId::new(self.slots.len() - 1, 0)
			}
		};

		self.len += 1;
		tracing::debug!(cell = %id, "create");
		id
	}

	/// Destroys a cell and returns its last value.
	///
	/// Refused with [`Error::DanglingReference`] while any live cell still
	/// lists `id` as a parent: dependents must be detached or released first.
	pub fn release(&mut self, id: CellId) -> Result<Value> {
		let dependents = self.node(id)?.children().len();
		if dependents > 0 {
			tracing::debug!(cell = %id, dependents, "release refused");
			return Err(Error::DanglingReference {
				cell: id,
				dependents,
			});
		}

		self.evaluation().settle(id)?;
		self.unbind(id)?;

		// A slot whose generations are used up is retired, never reused.
		let generation = match id.generation().checked_add(1) {
			Some(generation) => {
				self.free.push(id.index());
				generation
			}
			None => {
				tracing::debug!(cell = %id, "retire slot");
				id.generation()
			}
		};
		let slot = std::mem::replace(&mut self.slots[id.index()], Slot::Vacant { generation });
		self.len -= 1;

		tracing::debug!(cell = %id, "release");
		match slot {
			Slot::Occupied { node, .. } => Ok(node.into_value()),
			Slot::Vacant { .. } => Err(Error::UnknownHandle(id)),
		}
	}

	/// Current value of the cell, settling it first if it is dirty.
	pub fn read(&self, id: CellId) -> Result<Value> {
		self.evaluation().settle(id)?;
		Ok(self.node(id)?.value().value.clone())
	}

	/// Typed [`read`](Self::read).
	pub fn get<T: Scalar>(&self, id: CellId) -> Result<T> {
		let kind = self.node(id)?.kind();
		if kind != T::KIND {
			return Err(Error::KindMismatch {
				cell: id,
				expected: kind,
				actual: T::KIND,
			});
		}

		let value = self.read(id)?;
		T::from_value(value).ok_or(Error::KindMismatch {
			cell: id,
			expected: kind,
			actual: T::KIND,
		})
	}

	/// Assigns a literal value, detaching the cell first if it is computed.
	pub fn set_literal(&mut self, id: CellId, value: impl Into<Value>) -> Result<()> {
		self.replace(id, value).map(drop)
	}

	/// Like [`set_literal`](Self::set_literal), returning the previous value.
	pub fn replace(&mut self, id: CellId, value: impl Into<Value>) -> Result<Value> {
		let value = value.into();
		let kind = self.node(id)?.kind();
		if value.kind() != kind {
			return Err(Error::KindMismatch {
				cell: id,
				expected: kind,
				actual: value.kind(),
			});
		}

		// A dirty computed cell is not settled here; its value is overwritten
		// and its descendants are already invalid.
		self.unbind(id)?;

		let node = self.node(id)?;
		let before = node.version();
		let old = node.replace_value(Hashed::new(value));
		node.set_state(State::Valid);

		if node.version() != before {
			self.evaluation().invalidate_children(id)?;
		}

		Ok(old.into_inner())
	}

	/// Edits the current value and assigns the result as a literal.
	///
	/// The edit works on a copy, so an edit that changes the kind is rejected
	/// without touching the cell.
	pub fn update(&mut self, id: CellId, func: impl FnOnce(&mut Value)) -> Result<()> {
		let mut value = self.read(id)?;
		func(&mut value);
		self.set_literal(id, value)
	}

	pub fn toggle(&mut self, id: CellId) -> Result<()> {
		let kind = self.node(id)?.kind();
		if kind != ValueKind::Boolean {
			return Err(Error::KindMismatch {
				cell: id,
				expected: kind,
				actual: ValueKind::Boolean,
			});
		}
		self.update(id, Value::toggle)
	}

	/// Makes `id` a computed cell deriving its value from `parents`.
	///
	/// Everything is validated before the graph changes: known handles, a
	/// non-empty parent list, arity, value kinds, and that no parent is `id`
	/// or has `id` among its ancestors. On success the cell is evaluated
	/// immediately.
	pub fn bind(&mut self, id: CellId, function: Function, parents: &[CellId]) -> Result<()> {
		let kind = self.node(id)?.kind();
		for &parent in parents {
			self.node(parent)?;
		}

		if parents.is_empty() {
			return Err(Error::NoParents(id));
		}

		if function.arity() != parents.len() {
			return Err(Error::ArityMismatch {
				cell: id,
				arity: function.arity(),
				parents: parents.len(),
			});
		}

		if function.output() != kind {
			return Err(Error::KindMismatch {
				cell: id,
				expected: kind,
				actual: function.output(),
			});
		}

		for (&parent, &param) in parents.iter().zip(function.params()) {
			let actual = self.node(parent)?.kind();
			if actual != param {
				return Err(Error::KindMismatch {
					cell: parent,
					expected: param,
					actual,
				});
			}
		}

		for &parent in parents {
			if parent == id || self.depends_on(parent, id)? {
				tracing::debug!(cell = %id, parent = %parent, "bind refused: cycle");
				return Err(Error::CycleDetected { cell: id, parent });
			}
		}

		self.unbind(id)?;

		for &parent in parents {
			self.node_mut(parent)?.used_by(id);
		}

		tracing::debug!(
			cell = %id,
			function = function.name(),
			parents = ?parents,
			"bind"
		);

		let node = self.node_mut(id)?;
		let before = node.version();
		node.set_derivation(Derivation {
			function,
			dependencies: Dependencies::new(parents),
		});

		self.evaluation().settle(id)?;
		if self.node(id)?.version() != before {
			self.evaluation().invalidate_children(id)?;
		}

		Ok(())
	}

	/// Turns a computed cell back into a literal one, keeping its value.
	///
	/// The value is settled first, so the frozen value is the one the cell
	/// would have shown if read right before the call. Children are not
	/// invalidated: the value they depend on did not change.
	pub fn detach(&mut self, id: CellId) -> Result<()> {
		self.evaluation().settle(id)?;
		self.unbind(id)
	}

	pub fn is_literal(&self, id: CellId) -> Result<bool> {
		Ok(self.node(id)?.cell_kind() == CellKind::Literal)
	}

	pub fn is_computed(&self, id: CellId) -> Result<bool> {
		Ok(self.node(id)?.cell_kind() == CellKind::Computed)
	}

	pub fn kind(&self, id: CellId) -> Result<ValueKind> {
		Ok(self.node(id)?.kind())
	}

	pub fn cell_kind(&self, id: CellId) -> Result<CellKind> {
		Ok(self.node(id)?.cell_kind())
	}

	/// Whether the cell is up to date or waiting to be settled by a read.
	pub fn state(&self, id: CellId) -> Result<State> {
		Ok(self.node(id)?.state())
	}

	/// Parents in argument order. Empty for literal cells.
	pub fn parents(&self, id: CellId) -> Result<&[CellId]> {
		Ok(self.node(id)?.parents())
	}

	pub fn children(&self, id: CellId) -> Result<Vec<CellId>> {
		Ok(self.node(id)?.children().iter().copied().collect())
	}

	pub fn function(&self, id: CellId) -> Result<Option<&Function>> {
		Ok(self.node(id)?.derivation().map(|derivation| &derivation.function))
	}

	/// One line describing the cell, e.g. `#2v0 integer computed sum(#0v0, #1v0) = 11`.
	///
	/// Does not settle the cell; a dirty cell shows its last value and state.
	pub fn describe(&self, id: CellId) -> Result<String> {
		let node = self.node(id)?;
		let mut line = format!("{} {} {}", id, node.kind(), node.cell_kind());
		if let Some(derivation) = node.derivation() {
			let parents = derivation
				.dependencies
				.parents()
				.iter()
				.map(|parent| parent.to_string())
				.collect::<Vec<_>>()
				.join(", ");
			line.push_str(&format!(" {}({})", derivation.function.name(), parents));
		}
		line.push_str(&format!(" = {:?}", node.value().value));
		if let State::Invalid(invalid) = node.state() {
			line.push_str(&format!(" [invalid: {:?}]", invalid));
		}
		Ok(line)
	}

	pub(crate) fn node(&self, id: CellId) -> Result<&Node> {
		match self.slots.get(id.index()) {
			Some(Slot::Occupied { generation, node }) if *generation == id.generation() => Ok(node),
			_ => Err(Error::UnknownHandle(id)),
		}
	}

	fn node_mut(&mut self, id: CellId) -> Result<&mut Node> {
		match self.slots.get_mut(id.index()) {
			Some(Slot::Occupied { generation, node }) if *generation == id.generation() => Ok(node),
			_ => Err(Error::UnknownHandle(id)),
		}
	}

	fn evaluation(&self) -> Evaluation<'_> {
		Evaluation::new(self)
	}

	/// Drops the derivation of `id` and its entries in the parents' children.
	/// Leaves value and state alone; a no-op on literal cells.
	fn unbind(&mut self, id: CellId) -> Result<()> {
		let Some(derivation) = self.node_mut(id)?.take_derivation() else {
			return Ok(());
		};

		for &parent in derivation.dependencies.parents() {
			self.node_mut(parent)?.not_used_by(id);
		}

		tracing::debug!(
			cell = %id,
			function = derivation.function.name(),
			"detach"
		);
		Ok(())
	}
}

impl fmt::Debug for CellStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map()
			.entries(self.slots.iter().enumerate().filter_map(|(index, slot)| match slot {
				Slot::Occupied { generation, node } => Some((CellId::new(index, *generation), node)),
				Slot::Vacant { .. } => None,
			}))
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::{CellStore, Slot};
	use crate::cell::Node;
	use crate::{CellId, Error, Value};

	#[test]
	fn exhausted_slot_is_retired() {
		let mut store = CellStore::new();
		store.slots.push(Slot::Occupied {
			generation: u32::MAX,
			node: Node::new(Value::Integer(1)),
		});
		store.len = 1;
		let last = CellId::new(0, u32::MAX);

		assert_eq!(store.release(last), Ok(Value::Integer(1)));
		assert!(store.free.is_empty());
		assert_eq!(store.read(last), Err(Error::UnknownHandle(last)));

		let fresh = store.create(2_i64);
		assert_eq!(fresh.index(), 1);
		assert_eq!(store.read(last), Err(Error::UnknownHandle(last)));
		assert_eq!(store.len(), 1);
	}

	#[test]
	fn released_slot_is_reused_with_next_generation() {
		let mut store = CellStore::new();
		let first = store.create(1_i64);
		store.release(first).unwrap();

		let second = store.create(2_i64);
		assert_eq!(second.index(), first.index());
		assert_eq!(second.generation(), first.generation() + 1);
	}
}
