use std::cell::RefCell;

use smallvec::SmallVec;

use crate::{CellId, Version};

pub(crate) type Versions = SmallVec<[Version; 4]>;

/// The ordered parents of a computed cell, together with the version each
/// parent had when the cell was last evaluated.
pub(crate) struct Dependencies {
	parents: SmallVec<[CellId; 4]>,
	based_on: RefCell<Versions>,
}

impl Dependencies {
	pub fn new(parents: &[CellId]) -> Self {
		Self {
			parents: SmallVec::from_slice(parents),
			based_on: RefCell::new(SmallVec::new()),
		}
	}

	#[inline]
	pub fn parents(&self) -> &[CellId] {
		&self.parents
	}

	/// `current` holds the parents' versions, in parent order.
	/// Never valid before the first evaluation.
	pub fn are_valid(&self, current: &[Version]) -> bool {
		let based_on = self.based_on.borrow();
		!based_on.is_empty() && based_on.as_slice() == current
	}

	pub fn record(&self, versions: Versions) {
		*self.based_on.borrow_mut() = versions;
	}
}
