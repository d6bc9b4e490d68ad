use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};

/// The kind of a cell's value. Fixed when the cell is created.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum ValueKind {
	Integer,
	Float,
	Boolean,
	Text,
}

impl Display for ValueKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ValueKind::Integer => "integer",
			ValueKind::Float => "float",
			ValueKind::Boolean => "boolean",
			ValueKind::Text => "text",
		})
	}
}

#[derive(Clone)]
pub enum Value {
	Integer(i64),
	Float(f64),
	Boolean(bool),
	Text(String),
}

impl Value {
	pub fn kind(&self) -> ValueKind {
		match self {
			Value::Integer(_) => ValueKind::Integer,
			Value::Float(_) => ValueKind::Float,
			Value::Boolean(_) => ValueKind::Boolean,
			Value::Text(_) => ValueKind::Text,
		}
	}

	pub fn as_integer(&self) -> Option<i64> {
		match self {
			Value::Integer(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_float(&self) -> Option<f64> {
		match self {
			Value::Float(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_boolean(&self) -> Option<bool> {
		match self {
			Value::Boolean(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_text(&self) -> Option<&str> {
		match self {
			Value::Text(v) => Some(v),
			_ => None,
		}
	}
}

// Floats compare and hash by bit pattern: `NaN` equals itself and `-0.0` is
// not `0.0`, so a value counts as changed exactly when its stored bits change.
impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Integer(a), Value::Integer(b)) => a == b,
			(Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
			(Value::Boolean(a), Value::Boolean(b)) => a == b,
			(Value::Text(a), Value::Text(b)) => a == b,
			_ => false,
		}
	}
}

impl Eq for Value {}

impl Hash for Value {
	fn hash<H: Hasher>(&self, state: &mut H) {
		std::mem::discriminant(self).hash(state);
		match self {
			Value::Integer(v) => v.hash(state),
			Value::Float(v) => v.to_bits().hash(state),
			Value::Boolean(v) => v.hash(state),
			Value::Text(v) => v.hash(state),
		}
	}
}

impl Debug for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Integer(v) => Debug::fmt(v, f),
			Value::Float(v) => Debug::fmt(v, f),
			Value::Boolean(v) => Debug::fmt(v, f),
			Value::Text(v) => Debug::fmt(v, f),
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Integer(v) => Display::fmt(v, f),
			Value::Float(v) => Display::fmt(v, f),
			Value::Boolean(v) => Display::fmt(v, f),
			Value::Text(v) => Display::fmt(v, f),
		}
	}
}

/// A Rust type that maps onto exactly one [`ValueKind`].
pub trait Scalar: Into<Value> + 'static {
	const KIND: ValueKind;

	fn from_value(value: Value) -> Option<Self>;
}

impl Scalar for i64 {
	const KIND: ValueKind = ValueKind::Integer;

	fn from_value(value: Value) -> Option<Self> {
		value.as_integer()
	}
}

impl Scalar for f64 {
	const KIND: ValueKind = ValueKind::Float;

	fn from_value(value: Value) -> Option<Self> {
		value.as_float()
	}
}

impl Scalar for bool {
	const KIND: ValueKind = ValueKind::Boolean;

	fn from_value(value: Value) -> Option<Self> {
		value.as_boolean()
	}
}

impl Scalar for String {
	const KIND: ValueKind = ValueKind::Text;

	fn from_value(value: Value) -> Option<Self> {
		match value {
			Value::Text(v) => Some(v),
			_ => None,
		}
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Integer(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Float(value)
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Boolean(value)
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::Text(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::Text(value.to_owned())
	}
}

pub trait Toggle {
	fn toggle(&mut self);
}

impl Toggle for bool {
	fn toggle(&mut self) {
		*self = !*self
	}
}

impl Toggle for Value {
	/// Flips a boolean value; other kinds are left untouched.
	fn toggle(&mut self) {
		if let Value::Boolean(v) = self {
			v.toggle()
		}
	}
}
