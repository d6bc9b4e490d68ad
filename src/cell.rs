use std::cell::{Cell, Ref, RefCell};
use std::collections::BTreeSet;
use std::fmt;

use crate::dependencies::Dependencies;
use crate::{CellId, Function, Hashed, State, Value, ValueKind, Version};

/// Whether a cell's value is assigned directly or derived from parents.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CellKind {
	Literal,
	Computed,
}

impl fmt::Display for CellKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			CellKind::Literal => "literal",
			CellKind::Computed => "computed",
		})
	}
}

pub(crate) struct Derivation {
	pub function: Function,
	pub dependencies: Dependencies,
}

/// Storage for one cell. Edges are handles into the owning store.
///
/// Everything a read may touch lives behind `Cell`/`RefCell` so that settling
/// a dirty cell only needs `&CellStore`; structural fields are changed through
/// `&mut CellStore` only.
pub(crate) struct Node {
	kind: ValueKind,
	value: RefCell<Hashed<Value>>,
	revision: Cell<u64>,
	state: Cell<State>,
	derivation: Option<Derivation>,
	children: BTreeSet<CellId>,
}

impl Node {
	pub fn new(value: Value) -> Self {
		Node {
			kind: value.kind(),
			value: RefCell::new(Hashed::new(value)),
			revision: Cell::new(0),
			state: Cell::new(State::Valid),
			derivation: None,
			children: BTreeSet::new(),
		}
	}

	#[inline]
	pub fn kind(&self) -> ValueKind {
		self.kind
	}

	pub fn cell_kind(&self) -> CellKind {
		match self.derivation {
			Some(_) => CellKind::Computed,
			None => CellKind::Literal,
		}
	}

	pub fn value(&self) -> Ref<'_, Hashed<Value>> {
		self.value.borrow()
	}

	pub fn into_value(self) -> Value {
		self.value.into_inner().into_inner()
	}

	pub fn version(&self) -> Version {
		Version::Revision(self.revision.get())
	}

	/// Stores `value` and returns the previous one. The version moves only
	/// if the two values differ.
	pub fn replace_value(&self, value: Hashed<Value>) -> Hashed<Value> {
		let old = std::mem::replace(&mut *self.value.borrow_mut(), value);
		if !old.same(&self.value.borrow()) {
			self.revision.set(self.revision.get() + 1);
		}
		old
	}

	#[inline]
	pub fn state(&self) -> State {
		self.state.get()
	}

	#[inline]
	pub fn set_state(&self, state: State) {
		self.state.set(state)
	}

	pub fn derivation(&self) -> Option<&Derivation> {
		self.derivation.as_ref()
	}

	pub fn parents(&self) -> &[CellId] {
		match &self.derivation {
			Some(derivation) => derivation.dependencies.parents(),
			None => &[],
		}
	}

	pub fn children(&self) -> &BTreeSet<CellId> {
		&self.children
	}

	pub fn used_by(&mut self, child: CellId) {
		self.children.insert(child);
	}

	pub fn not_used_by(&mut self, child: CellId) {
		self.children.remove(&child);
	}

	pub fn set_derivation(&mut self, derivation: Derivation) {
		self.derivation = Some(derivation);
		self.state.set(State::Invalid(crate::Invalid::Definitely));
	}

	pub fn take_derivation(&mut self) -> Option<Derivation> {
		self.derivation.take()
	}
}

impl fmt::Debug for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut s = f.debug_struct("Cell");
		s.field("kind", &self.kind)
			.field("value", &*self.value.borrow())
			.field("revision", &self.revision.get())
			.field("state", &self.state.get());
		if let Some(derivation) = &self.derivation {
			s.field("function", &derivation.function.name())
				.field("parents", &derivation.dependencies.parents());
		}
		s.field("children", &self.children).finish()
	}
}
