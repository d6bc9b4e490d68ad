//! A reactive value graph.
//!
//! A [`CellStore`] owns cells. A cell holds an integer, float, boolean or text
//! [`Value`] and is either *literal*, assigned by the caller, or *computed*,
//! derived by a [`Function`] over an ordered list of parent cells. Changing a
//! literal marks every computed descendant dirty; dirty cells are recomputed
//! when read, parents first, each at most once.
//!
//! ```
//! use cellgraph::{function, CellStore};
//!
//! let mut store = CellStore::new();
//! let p0 = store.create(1_i64);
//! let p1 = store.create(0_i64);
//! let p2 = store.create(0_i64);
//!
//! store.bind(p1, function!(|d0: i64| d0 * 10), &[p0]).unwrap();
//! store.bind(p2, function!(|d0: i64, d1: i64| d0 + d1), &[p0, p1]).unwrap();
//! assert_eq!(store.get::<i64>(p2).unwrap(), 11);
//!
//! store.set_literal(p0, 2_i64).unwrap();
//! assert_eq!(store.get::<i64>(p2).unwrap(), 22);
//! ```

pub mod macros;

mod ancestry;
mod cell;
mod dependencies;
mod error;
mod evaluation;
mod func;
mod handle;
mod hashed;
mod store;
mod value;

pub use cell::CellKind;
pub use error::{Error, Result};
pub use func::{arg, Function};
pub use handle::CellId;
pub use store::CellStore;
pub use value::{Scalar, Toggle, Value, ValueKind};

pub(crate) use hashed::Hashed;

#[doc(hidden)]
pub use func::next_arg;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum State {
	Valid,
	Invalid(Invalid),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Invalid {
	/// An ancestor further up changed; the cell recomputes only if one of
	/// its parents ends up with a new version.
	Maybe,
	/// A parent changed.
	Definitely,
}

/// Identifies one stored value of a cell. Moves only when the value changes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum Version {
	Revision(u64),
}
