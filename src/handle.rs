use std::fmt;

/// A stable handle to a cell inside a [`CellStore`](crate::CellStore).
///
/// Handles are plain values: copying one never extends the cell's lifetime.
/// When a cell is released its slot may be reused, but with a new generation,
/// so an old handle keeps failing with [`Error::UnknownHandle`](crate::Error::UnknownHandle)
/// instead of silently pointing at a different cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId {
	index: usize,
	generation: u32,
}

impl CellId {
	pub(crate) fn new(index: usize, generation: u32) -> Self {
		CellId { index, generation }
	}

	#[inline]
	pub fn index(&self) -> usize {
		self.index
	}

	#[inline]
	pub fn generation(&self) -> u32 {
		self.generation
	}
}

impl fmt::Debug for CellId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}v{}", self.index, self.generation)
	}
}

impl fmt::Display for CellId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(self, f)
	}
}
