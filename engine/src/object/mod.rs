//! An in-memory dynamically-typed object model.
//!
//! [`Object`] behaves like a reference to an object in a small scripting
//! runtime: cloning it shares the object, lists and dicts are mutated in
//! place and visible through every handle, and iteration follows the fused
//! "advance and produce" protocol with [`Exception::StopIteration`] as the
//! end signal. It implements [`Foreign`] so every range in this crate can be
//! used over it.

mod convert;
mod ops;
mod serialize;

use crate::{BinaryOp, Foreign};
use fnv::FnvBuildHasher;
use indexmap::IndexMap;
use std::{
    cell::RefCell,
    cmp::Ordering,
    fmt::{self, Debug, Formatter},
    rc::Rc,
};
use thiserror::Error;

/// Exceptions raised by the object model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Exception {
    /// End of iteration.
    #[error("StopIteration")]
    StopIteration,

    /// An operation was applied to an object of the wrong type.
    #[error("TypeError: {0}")]
    TypeError(String),

    /// A sequence index was out of range.
    #[error("IndexError: {0}")]
    IndexError(String),

    /// A mapping key was not found.
    #[error("KeyError: {0}")]
    KeyError(String),

    /// An integer operation overflowed.
    #[error("OverflowError: {0}")]
    OverflowError(String),

    /// A result could not be allocated.
    #[error("MemoryError")]
    MemoryError,

    /// The object was modified in a way that invalidates an iterator.
    #[error("RuntimeError: {0}")]
    RuntimeError(String),
}

/// Enumeration of object types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// The `None` singleton type.
    NoneType,
    /// A boolean.
    Bool,
    /// A 64-bit signed integer.
    Int,
    /// A 64-bit float.
    Float,
    /// An immutable string.
    Str,
    /// A mutable sequence.
    List,
    /// An immutable sequence.
    Tuple,
    /// An insertion ordered mapping.
    Dict,
    /// A one-shot iterator.
    Iterator,
}

impl Type {
    /// Returns the runtime name of the type.
    pub fn name(self) -> &'static str {
        match self {
            Type::NoneType => "NoneType",
            Type::Bool => "bool",
            Type::Int => "int",
            Type::Float => "float",
            Type::Str => "str",
            Type::List => "list",
            Type::Tuple => "tuple",
            Type::Dict => "dict",
            Type::Iterator => "iterator",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Provides a way to get a [`Type`] of the implementor.
pub trait GetType {
    /// Returns a type.
    fn get_type(&self) -> Type;
}

pub(crate) type DictMap = IndexMap<Key, Object, FnvBuildHasher>;

pub(crate) enum Data {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Object>),
    Tuple(Vec<Object>),
    Dict(DictMap),
    Iterator(Box<dyn Iterator<Item = Object>>),
}

impl GetType for Data {
    fn get_type(&self) -> Type {
        match self {
            Data::None => Type::NoneType,
            Data::Bool(_) => Type::Bool,
            Data::Int(_) => Type::Int,
            Data::Float(_) => Type::Float,
            Data::Str(_) => Type::Str,
            Data::List(_) => Type::List,
            Data::Tuple(_) => Type::Tuple,
            Data::Dict(_) => Type::Dict,
            Data::Iterator(_) => Type::Iterator,
        }
    }
}

/// A hashable value used as a dict key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Key {
    None,
    Bool(bool),
    Int(i64),
    Str(String),
    Tuple(Vec<Key>),
}

impl Key {
    pub(crate) fn from_object(obj: &Object) -> Result<Self, Exception> {
        Ok(match &*obj.0.borrow() {
            Data::None => Key::None,
            Data::Bool(b) => Key::Bool(*b),
            Data::Int(i) => Key::Int(*i),
            Data::Str(s) => Key::Str(s.clone()),
            Data::Tuple(items) => Key::Tuple(
                items
                    .iter()
                    .map(Key::from_object)
                    .collect::<Result<_, _>>()?,
            ),
            data => {
                return Err(Exception::TypeError(format!(
                    "unhashable type: '{}'",
                    data.get_type()
                )))
            }
        })
    }

    pub(crate) fn to_object(&self) -> Object {
        match self {
            Key::None => Object::none(),
            Key::Bool(b) => Object::from(*b),
            Key::Int(i) => Object::from(*i),
            Key::Str(s) => Object::from(s.as_str()),
            Key::Tuple(keys) => Object::tuple(keys.iter().map(Key::to_object).collect()),
        }
    }
}

/// A counted reference to an object.
#[derive(Clone)]
pub struct Object(pub(crate) Rc<RefCell<Data>>);

impl Object {
    pub(crate) fn new(data: Data) -> Self {
        Object(Rc::new(RefCell::new(data)))
    }

    /// Creates a new `None` object.
    pub fn none() -> Self {
        Self::new(Data::None)
    }

    /// Creates a new list.
    pub fn list(items: Vec<Object>) -> Self {
        Self::new(Data::List(items))
    }

    /// Creates a new tuple.
    pub fn tuple(items: Vec<Object>) -> Self {
        Self::new(Data::Tuple(items))
    }

    /// Creates a new dict from key/value pairs, keeping the first insertion
    /// position of every key.
    pub fn dict(pairs: impl IntoIterator<Item = (Object, Object)>) -> Result<Self, Exception> {
        let mut map = DictMap::default();
        for (key, value) in pairs {
            map.insert(Key::from_object(&key)?, value);
        }
        Ok(Self::new(Data::Dict(map)))
    }

    /// Creates a one-shot iterator object that is iterable but is neither a
    /// sequence nor a mapping.
    pub fn iterator<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Object>,
        I::IntoIter: 'static,
    {
        Self::new(Data::Iterator(Box::new(items.into_iter())))
    }

    /// Returns the number of live references to this object.
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl GetType for Object {
    fn get_type(&self) -> Type {
        self.0.borrow().get_type()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || ops::equals(self, other)
    }
}

impl Debug for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fn comma_separated(f: &mut Formatter<'_>, items: &[Object]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                Debug::fmt(item, f)?;
            }
            Ok(())
        }

        match &*self.0.borrow() {
            Data::None => f.write_str("None"),
            Data::Bool(true) => f.write_str("True"),
            Data::Bool(false) => f.write_str("False"),
            Data::Int(i) => write!(f, "{}", i),
            Data::Float(x) => write!(f, "{:?}", x),
            Data::Str(s) => write!(f, "'{}'", s),
            Data::List(items) => {
                f.write_str("[")?;
                comma_separated(f, items)?;
                f.write_str("]")
            }
            Data::Tuple(items) => {
                f.write_str("(")?;
                comma_separated(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Data::Dict(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}: {:?}", key.to_object(), value)?;
                }
                f.write_str("}")
            }
            Data::Iterator(_) => write!(f, "<iterator at {:p}>", Rc::as_ptr(&self.0)),
        }
    }
}

enum IterSource {
    Sequence { seq: Object, index: usize },
    Keys { dict: Object, index: usize, len: usize },
    Shared(Object),
}

/// Handle of the single-pass iteration protocol of an [`Object`].
pub struct Iter(IterSource);

/// Handle of the key/value iteration protocol of a dict.
pub struct PairIter {
    dict: Object,
    index: usize,
    len: usize,
}

fn dict_changed_size() -> Exception {
    Exception::RuntimeError("dictionary changed size during iteration".to_owned())
}

impl Iter {
    fn next(&mut self) -> Result<Object, Exception> {
        match &mut self.0 {
            IterSource::Sequence { seq, index } => {
                let item = match &*seq.0.borrow() {
                    Data::List(items) | Data::Tuple(items) => items.get(*index).cloned(),
                    Data::Str(s) => s.chars().nth(*index).map(|c| Object::from(c.to_string())),
                    _ => None,
                };
                let item = item.ok_or(Exception::StopIteration)?;
                *index += 1;
                Ok(item)
            }
            IterSource::Keys { dict, index, len } => {
                let key = match &*dict.0.borrow() {
                    Data::Dict(map) if map.len() != *len => return Err(dict_changed_size()),
                    Data::Dict(map) => map.get_index(*index).map(|(key, _)| key.to_object()),
                    _ => None,
                };
                let key = key.ok_or(Exception::StopIteration)?;
                *index += 1;
                Ok(key)
            }
            IterSource::Shared(obj) => match &mut *obj.0.borrow_mut() {
                Data::Iterator(iter) => iter.next().ok_or(Exception::StopIteration),
                _ => Err(Exception::StopIteration),
            },
        }
    }
}

impl PairIter {
    fn next(&mut self) -> Result<(Object, Object), Exception> {
        let pair = match &*self.dict.0.borrow() {
            Data::Dict(map) if map.len() != self.len => return Err(dict_changed_size()),
            Data::Dict(map) => map
                .get_index(self.index)
                .map(|(key, value)| (key.to_object(), value.clone())),
            _ => None,
        };
        let pair = pair.ok_or(Exception::StopIteration)?;
        self.index += 1;
        Ok(pair)
    }
}

impl Foreign for Object {
    type Runtime = ();
    type Iter = Iter;
    type PairIter = PairIter;
    type Error = Exception;

    fn runtime(&self) {}

    fn is_same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn type_name(&self) -> String {
        self.get_type().name().to_owned()
    }

    fn obtain_iterator(&self) -> Option<Iter> {
        let source = match &*self.0.borrow() {
            Data::List(_) | Data::Tuple(_) | Data::Str(_) => IterSource::Sequence {
                seq: self.clone(),
                index: 0,
            },
            Data::Dict(map) => IterSource::Keys {
                dict: self.clone(),
                index: 0,
                len: map.len(),
            },
            Data::Iterator(_) => IterSource::Shared(self.clone()),
            _ => return None,
        };
        Some(Iter(source))
    }

    fn iterator_next(iter: &mut Iter) -> Result<Self, Exception> {
        iter.next()
    }

    fn is_sequence(&self) -> bool {
        matches!(
            &*self.0.borrow(),
            Data::List(_) | Data::Tuple(_) | Data::Str(_)
        )
    }

    fn length(&self) -> Result<usize, Exception> {
        match &*self.0.borrow() {
            Data::List(items) | Data::Tuple(items) => Ok(items.len()),
            Data::Str(s) => Ok(s.chars().count()),
            Data::Dict(map) => Ok(map.len()),
            data => Err(Exception::TypeError(format!(
                "object of type '{}' has no len()",
                data.get_type()
            ))),
        }
    }

    fn indexed_get(&self, index: usize) -> Result<Self, Exception> {
        match &*self.0.borrow() {
            Data::List(items) | Data::Tuple(items) => items.get(index).cloned().ok_or_else(|| {
                Exception::IndexError(format!("{} index out of range", self.type_name()))
            }),
            Data::Str(s) => s
                .chars()
                .nth(index)
                .map(|c| Object::from(c.to_string()))
                .ok_or_else(|| Exception::IndexError("string index out of range".to_owned())),
            Data::Dict(map) => map
                .get(&Key::Int(index as i64))
                .cloned()
                .ok_or_else(|| Exception::KeyError(index.to_string())),
            data => Err(Exception::TypeError(format!(
                "'{}' object is not subscriptable",
                data.get_type()
            ))),
        }
    }

    fn indexed_set(&self, index: usize, value: &Self) -> Result<(), Exception> {
        match &mut *self.0.borrow_mut() {
            Data::List(items) => match items.get_mut(index) {
                Some(slot) => {
                    *slot = value.clone();
                    Ok(())
                }
                None => Err(Exception::IndexError(
                    "list assignment index out of range".to_owned(),
                )),
            },
            Data::Dict(map) => {
                map.insert(Key::Int(index as i64), value.clone());
                Ok(())
            }
            data => Err(Exception::TypeError(format!(
                "'{}' object does not support item assignment",
                data.get_type()
            ))),
        }
    }

    fn is_mapping(&self) -> bool {
        matches!(&*self.0.borrow(), Data::Dict(_))
    }

    fn obtain_pair_iterator(&self) -> Result<PairIter, Exception> {
        match &*self.0.borrow() {
            Data::Dict(map) => Ok(PairIter {
                dict: self.clone(),
                index: 0,
                len: map.len(),
            }),
            data => Err(Exception::TypeError(format!(
                "'{}' object has no attribute 'items'",
                data.get_type()
            ))),
        }
    }

    fn pair_iterator_next(iter: &mut PairIter) -> Result<(Self, Self), Exception> {
        iter.next()
    }

    fn is_exhausted(err: &Exception) -> bool {
        *err == Exception::StopIteration
    }

    fn binary_op(&self, op: BinaryOp, rhs: &Self) -> Result<Self, Exception> {
        ops::binary_op(self, op, rhs)
    }

    fn compare(&self, other: &Self) -> Result<Ordering, Exception> {
        ops::compare(self, other)
    }
}
