use super::{Cursor, Position, RandomCursor, RandomIter, SwapCursor};
use crate::{item, Error, Foreign, FromForeign, Item, Result};
use std::{
    cmp::Ordering,
    fmt,
    marker::PhantomData,
    ops::{Add, AddAssign, Sub, SubAssign},
};

/// Read-only cursor over an indexable object.
///
/// Dereferencing fetches the element at the current offset and converts it
/// to `T`. Cursors over different objects never compare equal and are
/// unordered.
pub struct RandomAccessCursor<O: Foreign, T = O> {
    pos: Position<O>,
    _marker: PhantomData<fn() -> T>,
}

impl<O: Foreign, T> RandomAccessCursor<O, T> {
    pub(crate) fn new(obj: O, offset: usize, len: usize) -> Self {
        RandomAccessCursor {
            pos: Position::new(obj, offset, len),
            _marker: PhantomData,
        }
    }

    /// Current offset from the start of the range.
    pub fn offset(&self) -> isize {
        self.pos.offset
    }
}

impl<O: Foreign, T: FromForeign<O>> Cursor for RandomAccessCursor<O, T> {
    type Item = T;

    fn get(&self) -> Result<T> {
        let index = self.pos.index()?;
        let obj = self.pos.obj.indexed_get(index).map_err(Error::foreign)?;
        Ok(T::from_foreign(&obj)?)
    }

    fn advance(&mut self) -> Result<()> {
        self.pos.offset += 1;
        Ok(())
    }
}

impl<O: Foreign, T> Clone for RandomAccessCursor<O, T> {
    fn clone(&self) -> Self {
        RandomAccessCursor {
            pos: self.pos.clone(),
            _marker: PhantomData,
        }
    }
}

/// Cursor over the slots of an indexable object.
///
/// Dereferencing yields a write-through [`Item`] rather than a value.
pub struct MutableCursor<O: Foreign> {
    pos: Position<O>,
}

impl<O: Foreign> MutableCursor<O> {
    pub(crate) fn new(obj: O, offset: usize, len: usize) -> Self {
        MutableCursor {
            pos: Position::new(obj, offset, len),
        }
    }

    /// Current offset from the start of the range.
    pub fn offset(&self) -> isize {
        self.pos.offset
    }
}

impl<O: Foreign> Cursor for MutableCursor<O> {
    type Item = Item<O>;

    fn get(&self) -> Result<Item<O>> {
        let index = self.pos.index()?;
        Ok(Item::new(self.pos.obj.clone(), index))
    }

    fn advance(&mut self) -> Result<()> {
        self.pos.offset += 1;
        Ok(())
    }
}

impl<O: Foreign> SwapCursor for MutableCursor<O> {
    type Object = O;

    fn load(&self) -> Result<O> {
        self.get()?.load()
    }

    fn iter_swap(&self, other: &Self) -> Result<()> {
        item::swap(&self.get()?, &other.get()?)
    }
}

/// Iterator over the slot proxies of a mutable range.
pub struct Items<O: Foreign> {
    slots: RandomIter<MutableCursor<O>>,
}

impl<O: Foreign> Items<O> {
    pub(crate) fn new(begin: MutableCursor<O>, end: MutableCursor<O>) -> Self {
        Items {
            slots: RandomIter::new(begin, end),
        }
    }
}

// Every position between the range bounds is a valid slot, so dereferencing
// cannot fail here.
impl<O: Foreign> Iterator for Items<O> {
    type Item = Item<O>;

    fn next(&mut self) -> Option<Item<O>> {
        self.slots.next()?.ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl<O: Foreign> DoubleEndedIterator for Items<O> {
    fn next_back(&mut self) -> Option<Item<O>> {
        self.slots.next_back()?.ok()
    }
}

impl<O: Foreign> ExactSizeIterator for Items<O> {}

impl<O: Foreign> Clone for MutableCursor<O> {
    fn clone(&self) -> Self {
        MutableCursor {
            pos: self.pos.clone(),
        }
    }
}

macro_rules! impl_random_cursor {
    ($name:ident < O $(, $param:ident)* > $(where $($bound:tt)+)?) => {
        impl<O: Foreign $(, $param)*> RandomCursor for $name<O $(, $param)*>
        $(where $($bound)+)?
        {
            fn retreat(&mut self) {
                self.pos.offset -= 1;
            }

            fn jump(&mut self, delta: isize) {
                self.pos.offset += delta;
            }

            fn distance_to(&self, other: &Self) -> isize {
                self.pos.distance_to(&other.pos)
            }
        }

        impl<O: Foreign $(, $param)*> PartialEq for $name<O $(, $param)*> {
            fn eq(&self, other: &Self) -> bool {
                self.pos == other.pos
            }
        }

        impl<O: Foreign $(, $param)*> PartialOrd for $name<O $(, $param)*> {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                self.pos.partial_cmp(&other.pos)
            }
        }

        impl<O: Foreign $(, $param)*> fmt::Debug for $name<O $(, $param)*> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("obj", &self.pos.obj)
                    .field("offset", &self.pos.offset)
                    .field("len", &self.pos.len)
                    .finish()
            }
        }

        impl<O: Foreign $(, $param)*> Add<isize> for $name<O $(, $param)*> {
            type Output = Self;

            fn add(mut self, delta: isize) -> Self {
                self.pos.offset += delta;
                self
            }
        }

        impl<O: Foreign $(, $param)*> Sub<isize> for $name<O $(, $param)*> {
            type Output = Self;

            fn sub(mut self, delta: isize) -> Self {
                self.pos.offset -= delta;
                self
            }
        }

        impl<O: Foreign $(, $param)*> AddAssign<isize> for $name<O $(, $param)*> {
            fn add_assign(&mut self, delta: isize) {
                self.pos.offset += delta;
            }
        }

        impl<O: Foreign $(, $param)*> SubAssign<isize> for $name<O $(, $param)*> {
            fn sub_assign(&mut self, delta: isize) {
                self.pos.offset -= delta;
            }
        }

        impl<'a, O: Foreign $(, $param)*> Sub for &'a $name<O $(, $param)*> {
            type Output = isize;

            fn sub(self, other: Self) -> isize {
                other.pos.distance_to(&self.pos)
            }
        }

        impl<O: Foreign $(, $param)*> Sub for $name<O $(, $param)*> {
            type Output = isize;

            fn sub(self, other: Self) -> isize {
                &self - &other
            }
        }
    };
}

impl_random_cursor!(RandomAccessCursor<O, T> where T: FromForeign<O>);
impl_random_cursor!(MutableCursor<O>);
