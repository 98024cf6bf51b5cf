use super::{prefetch::Prefetch, Cursor};
use crate::{Error, Foreign, FromForeign, Result};
use std::{fmt, marker::PhantomData, ptr};

/// Forward-only cursor over the key/value pairs of a mapping.
///
/// Behaves like [`SinglePassCursor`](super::SinglePassCursor) except that
/// dereferencing converts both halves of the cached pair.
pub struct MappingCursor<O: Foreign, K = O, V = O> {
    state: Prefetch<O::PairIter, (O, O)>,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<O: Foreign, K, V> MappingCursor<O, K, V> {
    pub(crate) fn begin(obj: &O) -> Result<Self> {
        let iter = obj.obtain_pair_iterator().map_err(Error::foreign)?;
        Ok(MappingCursor {
            state: Prefetch::start::<O>(iter, O::pair_iterator_next)?,
            _marker: PhantomData,
        })
    }

    /// Returns the end cursor.
    pub fn end() -> Self {
        MappingCursor {
            state: Prefetch::End,
            _marker: PhantomData,
        }
    }

    /// Returns true if the cursor is past the last pair.
    pub fn is_end(&self) -> bool {
        self.state.is_end()
    }
}

impl<O, K, V> Cursor for MappingCursor<O, K, V>
where
    O: Foreign,
    K: FromForeign<O>,
    V: FromForeign<O>,
{
    type Item = (K, V);

    fn get(&self) -> Result<(K, V)> {
        let (k, v) = self.state.current()?;
        Ok((K::from_foreign(k)?, V::from_foreign(v)?))
    }

    fn advance(&mut self) -> Result<()> {
        self.state.advance::<O>(O::pair_iterator_next)
    }
}

impl<O: Foreign, K, V> PartialEq for MappingCursor<O, K, V> {
    fn eq(&self, other: &Self) -> bool {
        (self.is_end() && other.is_end()) || ptr::eq(self, other)
    }
}

impl<O: Foreign, K, V> fmt::Debug for MappingCursor<O, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            Prefetch::Active { current: (k, v), .. } => f
                .debug_struct("MappingCursor")
                .field("key", k)
                .field("value", v)
                .finish(),
            Prefetch::End => f.write_str("MappingCursor(End)"),
        }
    }
}
