//! Transitive queries over parent and child edges.

use std::collections::{BTreeSet, VecDeque};

use fxhash::FxHashSet;

use crate::error::Result;
use crate::{CellId, CellStore};

impl CellStore {
	/// Whether `ancestor` is reachable from `id` by following one or more
	/// parent edges. A cell does not depend on itself.
	pub fn depends_on(&self, id: CellId, ancestor: CellId) -> Result<bool> {
		self.node(ancestor)?;

		let mut visited = FxHashSet::default();
		let mut queue: VecDeque<CellId> = self.node(id)?.parents().iter().copied().collect();

		while let Some(next) = queue.pop_front() {
			if next == ancestor {
				return Ok(true);
			}
			if visited.insert(next) {
				queue.extend(self.node(next)?.parents());
			}
		}

		Ok(false)
	}

	/// Every cell `id` transitively depends on.
	pub fn ancestors(&self, id: CellId) -> Result<BTreeSet<CellId>> {
		self.reachable(id, |store, id| Ok(store.node(id)?.parents().to_vec()))
	}

	/// Every cell that transitively depends on `id`.
	pub fn descendants(&self, id: CellId) -> Result<BTreeSet<CellId>> {
		self.reachable(id, |store, id| {
			Ok(store.node(id)?.children().iter().copied().collect())
		})
	}

	fn reachable(
		&self,
		start: CellId,
		edges: impl Fn(&CellStore, CellId) -> Result<Vec<CellId>>,
	) -> Result<BTreeSet<CellId>> {
		let mut visited = BTreeSet::new();
		let mut queue = VecDeque::from(edges(self, start)?);

		while let Some(next) = queue.pop_front() {
			if visited.insert(next) {
				queue.extend(edges(self, next)?);
			}
		}

		Ok(visited)
	}
}
