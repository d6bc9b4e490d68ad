use std::fmt;
use std::hash::Hash;

/// A value paired with its fxhash fingerprint.
///
/// Different fingerprints prove different values; equal fingerprints prove
/// nothing on their own, so [`same`](Hashed::same) falls back to comparing
/// the values.
pub(crate) struct Hashed<T> {
	pub value: T,
	pub hash: u64,
}

impl<T: Hash + Eq> Hashed<T> {
	pub fn new(value: T) -> Self {
		let hash = fxhash::hash64(&value);
		Hashed { value, hash }
	}

	pub fn same(&self, other: &Hashed<T>) -> bool {
		self.hash == other.hash && self.value == other.value
	}
}

impl<T> Hashed<T> {
	pub fn into_inner(self) -> T {
		self.value
	}
}

impl<T: fmt::Debug> fmt::Debug for Hashed<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&self.value, f)
	}
}
