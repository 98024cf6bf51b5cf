//! Ranges over objects owned by a dynamically typed foreign runtime.
//!
//! An object that implements [`Foreign`] is probed for a traversal
//! capability and wrapped in one of four ranges:
//!
//! - [`SinglePassRange`] over anything iterable,
//! - [`RandomAccessRange`] over sequences,
//! - [`MutableRange`] over sequences whose slots are written through
//!   [`Item`] proxies,
//! - [`MappingRange`] over the key/value pairs of a mapping.
//!
//! Elements are converted to the requested native type on every dereference
//! and never copied out in bulk. The generic algorithms in [`algorithm`] run
//! over the ranges' cursors directly.
//!
//! [`object::Object`] is an in-memory runtime implementing [`Foreign`].
//!
//! ```
//! use objrange::{algorithm, object::Object, MutableRange};
//!
//! let list: Object = serde_json::from_str("[3, 1, 2]").unwrap();
//! let range = MutableRange::new(list.clone()).unwrap();
//! algorithm::sort(&range.begin(), &range.end()).unwrap();
//! assert_eq!(serde_json::to_string(&list).unwrap(), "[1,2,3]");
//! ```

pub mod algorithm;
mod capability;
mod cursor;
mod errors;
mod foreign;
pub mod item;
pub mod object;
mod range;

pub use self::{
    capability::{probe, Capability, Mapping, RandomAccess, SinglePass},
    cursor::{
        Cursor, Items, Iter, MappingCursor, MutableCursor, RandomAccessCursor, RandomCursor,
        RandomIter, SinglePassCursor, SwapCursor,
    },
    errors::{ConversionError, Error, RangeKind, Result},
    foreign::{BinaryOp, Foreign, FromForeign, IntoForeign},
    item::Item,
    range::{MappingRange, MutableRange, RandomAccessRange, SinglePassRange},
};
