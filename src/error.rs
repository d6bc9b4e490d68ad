//! Errors reported by cell store operations.
//!
//! Every failing operation is rejected before it mutates anything, so the
//! graph a caller observes after an `Err` is the graph it had before the call.

use thiserror::Error;

use crate::{CellId, ValueKind};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
	/// The function takes a different number of arguments than parents were given.
	#[error("cell {cell}: function takes {arity} argument(s) but {parents} parent(s) were given")]
	ArityMismatch {
		cell: CellId,
		arity: usize,
		parents: usize,
	},

	/// Binding `cell` to `parent` would make `cell` its own ancestor.
	#[error("cell {cell}: binding to parent {parent} would create a cycle")]
	CycleDetected { cell: CellId, parent: CellId },

	/// The cell is still a parent of `dependents` live cell(s).
	#[error("cell {cell} is still a parent of {dependents} cell(s)")]
	DanglingReference { cell: CellId, dependents: usize },

	#[error("unknown cell handle {0}")]
	UnknownHandle(CellId),

	#[error("cell {0}: a computed cell needs at least one parent")]
	NoParents(CellId),

	/// A value or function kind disagrees with the kind fixed for the cell.
	#[error("cell {cell}: expected a {expected} value, got {actual}")]
	KindMismatch {
		cell: CellId,
		expected: ValueKind,
		actual: ValueKind,
	},
}
