use crate::{
    capability::{self, Capability},
    cursor::{
        Cursor, Items, Iter, MappingCursor, MutableCursor, RandomAccessCursor, RandomIter,
        SinglePassCursor,
    },
    Error, Foreign, FromForeign, Item, RangeKind, Result,
};
use std::{fmt, marker::PhantomData};
use tracing::debug;

fn validate<C: Capability, O: Foreign>(obj: &O, kind: RangeKind) -> Result<()> {
    if C::probe(obj) {
        return Ok(());
    }
    debug!(
        %kind,
        type_name = %obj.type_name(),
        capability = C::NAME,
        "object rejected by range probe"
    );
    Err(Error::BadRange(kind))
}

fn captured_len<O: Foreign>(obj: &O) -> Result<usize> {
    obj.length().map_err(Error::foreign)
}

/// Forward-only view over any iterable object.
pub struct SinglePassRange<O: Foreign, T = O> {
    obj: O,
    _marker: PhantomData<fn() -> T>,
}

impl<O: Foreign, T> SinglePassRange<O, T> {
    /// Wraps `obj`, failing with [`Error::BadRange`] if it is not iterable.
    pub fn new(obj: O) -> Result<Self> {
        validate::<capability::SinglePass, _>(&obj, RangeKind::SinglePass)?;
        Ok(SinglePassRange {
            obj,
            _marker: PhantomData,
        })
    }

    /// The wrapped object.
    pub fn object(&self) -> &O {
        &self.obj
    }

    /// Obtains a fresh iterator from the object and fetches its first element.
    pub fn begin(&self) -> Result<SinglePassCursor<O, T>> {
        SinglePassCursor::begin(&self.obj)
    }

    /// The end cursor, equal to any exhausted cursor.
    pub fn end(&self) -> SinglePassCursor<O, T> {
        SinglePassCursor::end()
    }
}

/// Read-only indexed view over a sequence.
///
/// The length is queried once, here, and every cursor handed out by the
/// range reuses it.
pub struct RandomAccessRange<O: Foreign, T = O> {
    obj: O,
    len: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<O: Foreign, T> RandomAccessRange<O, T> {
    /// Wraps `obj`, failing with [`Error::BadRange`] if it is not a sequence.
    pub fn new(obj: O) -> Result<Self> {
        validate::<capability::RandomAccess, _>(&obj, RangeKind::RandomAccess)?;
        let len = captured_len(&obj)?;
        Ok(RandomAccessRange {
            obj,
            len,
            _marker: PhantomData,
        })
    }

    /// The wrapped object.
    pub fn object(&self) -> &O {
        &self.obj
    }

    /// Length captured at construction.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the captured length is zero.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cursor at offset zero.
    pub fn begin(&self) -> RandomAccessCursor<O, T> {
        RandomAccessCursor::new(self.obj.clone(), 0, self.len)
    }

    /// Cursor one past the last element.
    pub fn end(&self) -> RandomAccessCursor<O, T> {
        RandomAccessCursor::new(self.obj.clone(), self.len, self.len)
    }
}

impl<O: Foreign, T: FromForeign<O>> RandomAccessRange<O, T> {
    /// Fetches and converts the element at `index`.
    pub fn get(&self, index: usize) -> Result<T> {
        RandomAccessCursor::<O, T>::new(self.obj.clone(), index, self.len).get()
    }
}

/// Indexed view over a sequence whose slots can be written.
pub struct MutableRange<O: Foreign> {
    obj: O,
    len: usize,
}

impl<O: Foreign> MutableRange<O> {
    /// Wraps `obj`, failing with [`Error::BadRange`] if it is not a sequence.
    ///
    /// Whether the slots actually accept writes is only known when the first
    /// write is attempted.
    pub fn new(obj: O) -> Result<Self> {
        validate::<capability::RandomAccess, _>(&obj, RangeKind::MutableRandomAccess)?;
        let len = captured_len(&obj)?;
        Ok(MutableRange { obj, len })
    }

    /// The wrapped object.
    pub fn object(&self) -> &O {
        &self.obj
    }

    /// Length captured at construction.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the captured length is zero.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cursor at the first slot.
    pub fn begin(&self) -> MutableCursor<O> {
        MutableCursor::new(self.obj.clone(), 0, self.len)
    }

    /// Cursor one past the last slot.
    pub fn end(&self) -> MutableCursor<O> {
        MutableCursor::new(self.obj.clone(), self.len, self.len)
    }

    /// Returns the proxy for the slot at `index`.
    pub fn item(&self, index: usize) -> Result<Item<O>> {
        if index < self.len {
            Ok(Item::new(self.obj.clone(), index))
        } else {
            Err(Error::InvalidIteratorUse)
        }
    }
}

/// Key/value view over a mapping.
pub struct MappingRange<O: Foreign, K = O, V = O> {
    obj: O,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<O: Foreign, K, V> MappingRange<O, K, V> {
    /// Wraps `obj`, failing with [`Error::BadRange`] unless it is an iterable
    /// mapping.
    pub fn new(obj: O) -> Result<Self> {
        validate::<capability::Mapping, _>(&obj, RangeKind::Mapping)?;
        Ok(MappingRange {
            obj,
            _marker: PhantomData,
        })
    }

    /// The wrapped object.
    pub fn object(&self) -> &O {
        &self.obj
    }

    /// Obtains a fresh pair iterator and fetches the first pair.
    pub fn begin(&self) -> Result<MappingCursor<O, K, V>> {
        MappingCursor::begin(&self.obj)
    }

    /// The end cursor, equal to any exhausted cursor.
    pub fn end(&self) -> MappingCursor<O, K, V> {
        MappingCursor::end()
    }

    /// Iterates over the keys only.
    pub fn keys(&self) -> impl Iterator<Item = Result<K>>
    where
        K: FromForeign<O>,
    {
        Iter::new(MappingCursor::<O, K, O>::begin(&self.obj), MappingCursor::end())
            .map(|pair| pair.map(|(k, _)| k))
    }

    /// Iterates over the values only.
    pub fn values(&self) -> impl Iterator<Item = Result<V>>
    where
        V: FromForeign<O>,
    {
        Iter::new(MappingCursor::<O, O, V>::begin(&self.obj), MappingCursor::end())
            .map(|pair| pair.map(|(_, v)| v))
    }
}

macro_rules! impl_range_debug {
    ($($name:ident < O $(, $param:ident)* >),+) => {
        $(
            impl<O: Foreign $(, $param)*> fmt::Debug for $name<O $(, $param)*> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_tuple(stringify!($name)).field(&self.obj).finish()
                }
            }
        )+
    };
}

impl_range_debug!(
    SinglePassRange<O, T>,
    RandomAccessRange<O, T>,
    MutableRange<O>,
    MappingRange<O, K, V>
);

impl<O: Foreign, T> Clone for SinglePassRange<O, T> {
    fn clone(&self) -> Self {
        SinglePassRange {
            obj: self.obj.clone(),
            _marker: PhantomData,
        }
    }
}

impl<O: Foreign, T> Clone for RandomAccessRange<O, T> {
    fn clone(&self) -> Self {
        RandomAccessRange {
            obj: self.obj.clone(),
            len: self.len,
            _marker: PhantomData,
        }
    }
}

impl<O: Foreign> Clone for MutableRange<O> {
    fn clone(&self) -> Self {
        MutableRange {
            obj: self.obj.clone(),
            len: self.len,
        }
    }
}

impl<O: Foreign, K, V> Clone for MappingRange<O, K, V> {
    fn clone(&self) -> Self {
        MappingRange {
            obj: self.obj.clone(),
            _marker: PhantomData,
        }
    }
}

impl<'a, O: Foreign, T: FromForeign<O>> IntoIterator for &'a SinglePassRange<O, T> {
    type Item = Result<T>;
    type IntoIter = Iter<SinglePassCursor<O, T>>;

    fn into_iter(self) -> Self::IntoIter {
        Iter::new(self.begin(), self.end())
    }
}

impl<O: Foreign, T: FromForeign<O>> IntoIterator for SinglePassRange<O, T> {
    type Item = Result<T>;
    type IntoIter = Iter<SinglePassCursor<O, T>>;

    fn into_iter(self) -> Self::IntoIter {
        Iter::new(self.begin(), self.end())
    }
}

impl<'a, O: Foreign, T: FromForeign<O>> IntoIterator for &'a RandomAccessRange<O, T> {
    type Item = Result<T>;
    type IntoIter = RandomIter<RandomAccessCursor<O, T>>;

    fn into_iter(self) -> Self::IntoIter {
        RandomIter::new(self.begin(), self.end())
    }
}

impl<'a, O: Foreign> IntoIterator for &'a MutableRange<O> {
    type Item = Item<O>;
    type IntoIter = Items<O>;

    fn into_iter(self) -> Self::IntoIter {
        Items::new(self.begin(), self.end())
    }
}

impl<'a, O, K, V> IntoIterator for &'a MappingRange<O, K, V>
where
    O: Foreign,
    K: FromForeign<O>,
    V: FromForeign<O>,
{
    type Item = Result<(K, V)>;
    type IntoIter = Iter<MappingCursor<O, K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        Iter::new(self.begin(), self.end())
    }
}
