use super::{prefetch::Prefetch, Cursor};
use crate::{Error, Foreign, FromForeign, RangeKind, Result};
use std::{fmt, marker::PhantomData, ptr};

/// Forward-only, read-only cursor over the runtime's iteration protocol.
///
/// The current element is fetched one step ahead and cached, so
/// dereferencing never touches the runtime except for the conversion to `T`.
/// An active cursor is equal only to itself; all end cursors are equal.
pub struct SinglePassCursor<O: Foreign, T = O> {
    state: Prefetch<O::Iter, O>,
    _marker: PhantomData<fn() -> T>,
}

impl<O: Foreign, T> SinglePassCursor<O, T> {
    pub(crate) fn begin(obj: &O) -> Result<Self> {
        let iter = obj
            .obtain_iterator()
            .ok_or(Error::BadRange(RangeKind::SinglePass))?;
        Ok(SinglePassCursor {
            state: Prefetch::start::<O>(iter, O::iterator_next)?,
            _marker: PhantomData,
        })
    }

    /// Returns the end cursor.
    pub fn end() -> Self {
        SinglePassCursor {
            state: Prefetch::End,
            _marker: PhantomData,
        }
    }

    /// Returns true if the cursor is past the last element.
    pub fn is_end(&self) -> bool {
        self.state.is_end()
    }
}

impl<O: Foreign, T: FromForeign<O>> Cursor for SinglePassCursor<O, T> {
    type Item = T;

    fn get(&self) -> Result<T> {
        Ok(T::from_foreign(self.state.current()?)?)
    }

    fn advance(&mut self) -> Result<()> {
        self.state.advance::<O>(O::iterator_next)
    }
}

impl<O: Foreign, T> PartialEq for SinglePassCursor<O, T> {
    fn eq(&self, other: &Self) -> bool {
        (self.is_end() && other.is_end()) || ptr::eq(self, other)
    }
}

impl<O: Foreign, T> fmt::Debug for SinglePassCursor<O, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            Prefetch::Active { current, .. } => f
                .debug_struct("SinglePassCursor")
                .field("current", current)
                .finish(),
            Prefetch::End => f.write_str("SinglePassCursor(End)"),
        }
    }
}
