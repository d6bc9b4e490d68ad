use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::value::{Scalar, Value, ValueKind};

/// The derivation of a computed cell.
///
/// A `Function` is plain data next to its closure: the parameter kinds, the
/// output kind and a name are all visible, so bind can validate arity and
/// kinds before touching the graph, and [`CellStore::describe`](crate::CellStore::describe)
/// can print it.
///
/// The closure receives the parents' values in parent order. It must be pure:
/// the same arguments always produce the same result.
#[derive(Clone)]
pub struct Function {
	name: &'static str,
	params: SmallVec<[ValueKind; 4]>,
	output: ValueKind,
	func: Rc<dyn Fn(&[Value]) -> Value>,
}

impl Function {
	/// A function over parents of the given kinds, in parent order.
	///
	/// `bind` checks parents against `params`, never against what `func`
	/// actually reads. Prefer [`unary`](Self::unary) and friends or the
	/// [`function!`](crate::function) macro, which derive `params` from the
	/// closure's own argument types.
	///
	/// # Panics
	///
	/// The store does not panic on its own; a closure that reads an argument
	/// as a kind other than the one declared in `params` panics through
	/// [`arg`] when it is evaluated.
	pub fn new<P, R, F>(params: P, func: F) -> Self
	where
		P: IntoIterator<Item = ValueKind>,
		R: Scalar,
		F: Fn(&[Value]) -> R + 'static,
	{
		Function {
			name: "<unnamed>",
			params: params.into_iter().collect(),
			output: R::KIND,
			func: Rc::new(move |args: &[Value]| -> Value { func(args).into() }),
		}
	}

	pub fn unary<A, R>(func: impl Fn(A) -> R + 'static) -> Self
	where
		A: Scalar,
		R: Scalar,
	{
		Function::new([A::KIND], move |args| func(arg(args, 0)))
	}

	pub fn binary<A, B, R>(func: impl Fn(A, B) -> R + 'static) -> Self
	where
		A: Scalar,
		B: Scalar,
		R: Scalar,
	{
		Function::new([A::KIND, B::KIND], move |args| {
			func(arg(args, 0), arg(args, 1))
		})
	}

	pub fn ternary<A, B, C, R>(func: impl Fn(A, B, C) -> R + 'static) -> Self
	where
		A: Scalar,
		B: Scalar,
		C: Scalar,
		R: Scalar,
	{
		Function::new([A::KIND, B::KIND, C::KIND], move |args| {
			func(arg(args, 0), arg(args, 1), arg(args, 2))
		})
	}

	#[must_use]
	pub fn with_name(mut self, name: &'static str) -> Self {
		self.name = name;
		self
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn arity(&self) -> usize {
		self.params.len()
	}

	pub fn params(&self) -> &[ValueKind] {
		&self.params
	}

	pub fn output(&self) -> ValueKind {
		self.output
	}

	pub(crate) fn call(&self, args: &[Value]) -> Value {
		(self.func)(args)
	}
}

/// Extracts argument `index` as `T`.
///
/// # Panics
///
/// If there is no argument `index` or it is not a `T`. Parent kinds are
/// checked against the declared parameter kinds when a function is bound and
/// cells never change kind, so this only happens when a closure passed to
/// [`Function::new`] disagrees with its own parameter list.
pub fn arg<T: Scalar>(args: &[Value], index: usize) -> T {
	match args.get(index).cloned().and_then(T::from_value) {
		Some(value) => value,
		None => panic!("argument {} is not a {} value", index, T::KIND),
	}
}

/// Macro support: [`arg`] over an iterator.
///
/// # Panics
///
/// Like [`arg`], when the next argument is missing or not a `T`.
#[doc(hidden)]
pub fn next_arg<T: Scalar>(args: &mut std::slice::Iter<'_, Value>) -> T {
	match args.next().cloned().and_then(T::from_value) {
		Some(value) => value,
		None => panic!("missing {} argument", T::KIND),
	}
}

impl fmt::Debug for Function {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Function")
			.field("name", &self.name)
			.field("params", &self.params)
			.field("output", &self.output)
			.finish()
	}
}
