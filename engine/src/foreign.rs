use crate::ConversionError;
use std::{cmp::Ordering, error::Error as StdError, fmt::Debug};

/// An arithmetic operator dispatched by the foreign runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `lhs + rhs`
    Add,
    /// `lhs - rhs`
    Sub,
    /// `lhs * rhs`
    Mul,
}

impl BinaryOp {
    /// Returns the operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
        }
    }
}

/// A counted reference to an object owned by a foreign runtime.
///
/// Cloning the handle adds a reference to the same object; it never copies
/// the object itself. Every range, cursor and [`Item`](crate::Item) keeps
/// one of these alive for as long as it exists.
///
/// The methods map one to one onto the primitives the runtime exposes.
/// Iteration is fused: `iterator_next` both advances and produces, and
/// reports the end of the sequence by failing with an error for which
/// [`Foreign::is_exhausted`] returns `true`.
pub trait Foreign: Clone + Debug {
    /// Token required to create new foreign values.
    type Runtime: Copy;
    /// Handle of the runtime's single-pass iteration protocol.
    type Iter;
    /// Handle of the runtime's key/value iteration protocol.
    type PairIter;
    /// Condition raised by the runtime.
    type Error: StdError + Send + Sync + 'static;

    /// Returns the runtime this object lives in.
    fn runtime(&self) -> Self::Runtime;

    /// Returns true if both handles refer to the same object.
    fn is_same(&self, other: &Self) -> bool;

    /// Returns the runtime's name for the type of this object.
    fn type_name(&self) -> String;

    /// Obtains an iterator over the object, or `None` if it is not iterable.
    fn obtain_iterator(&self) -> Option<Self::Iter>;

    /// Advances `iter` and returns the produced element.
    fn iterator_next(iter: &mut Self::Iter) -> Result<Self, Self::Error>;

    /// Returns true if the object supports length and integer indexing.
    fn is_sequence(&self) -> bool;

    /// Returns the number of elements in the object.
    fn length(&self) -> Result<usize, Self::Error>;

    /// Fetches the element at `index`.
    fn indexed_get(&self, index: usize) -> Result<Self, Self::Error>;

    /// Stores `value` at `index`.
    fn indexed_set(&self, index: usize, value: &Self) -> Result<(), Self::Error>;

    /// Returns true if the object is a mapping.
    fn is_mapping(&self) -> bool;

    /// Obtains an iterator over the key/value pairs of a mapping.
    fn obtain_pair_iterator(&self) -> Result<Self::PairIter, Self::Error>;

    /// Advances `iter` and returns the produced key/value pair.
    fn pair_iterator_next(iter: &mut Self::PairIter) -> Result<(Self, Self), Self::Error>;

    /// Returns true if `err` is the runtime's end-of-iteration signal.
    fn is_exhausted(err: &Self::Error) -> bool;

    /// Applies `op` using the runtime's own operator dispatch.
    fn binary_op(&self, op: BinaryOp, rhs: &Self) -> Result<Self, Self::Error>;

    /// Orders two objects using the runtime's own comparison.
    fn compare(&self, other: &Self) -> Result<Ordering, Self::Error>;
}

/// Conversion from a foreign object into a native value.
pub trait FromForeign<O: Foreign>: Sized {
    /// Converts `obj`, failing if the foreign value has an incompatible type.
    fn from_foreign(obj: &O) -> Result<Self, ConversionError>;
}

impl<O: Foreign> FromForeign<O> for O {
    #[inline]
    fn from_foreign(obj: &O) -> Result<Self, ConversionError> {
        Ok(obj.clone())
    }
}

/// Conversion from a native value into a new foreign object.
pub trait IntoForeign<O: Foreign> {
    /// Creates the foreign object.
    fn into_foreign(self, runtime: O::Runtime) -> O;
}

impl<O: Foreign> IntoForeign<O> for O {
    #[inline]
    fn into_foreign(self, _: O::Runtime) -> O {
        self
    }
}

impl<O: Foreign> IntoForeign<O> for &O {
    #[inline]
    fn into_foreign(self, _: O::Runtime) -> O {
        self.clone()
    }
}
