mod mapping;
mod prefetch;
mod random_access;
mod single_pass;

use crate::{Error, Foreign, Result};
use std::cmp::Ordering;

pub use self::{
    mapping::MappingCursor,
    random_access::{Items, MutableCursor, RandomAccessCursor},
    single_pass::SinglePassCursor,
};

/// A position in a range that can be dereferenced and moved forward.
///
/// A cursor is compared against the range's end cursor to detect the end of
/// traversal.
pub trait Cursor: PartialEq {
    /// Value produced by dereferencing.
    type Item;

    /// Dereferences the cursor.
    fn get(&self) -> Result<Self::Item>;

    /// Moves to the next position.
    fn advance(&mut self) -> Result<()>;
}

/// A cursor that can jump by arbitrary offsets in constant time.
pub trait RandomCursor: Cursor + Clone + PartialOrd {
    /// Moves to the previous position.
    fn retreat(&mut self);

    /// Moves by `delta` positions.
    fn jump(&mut self, delta: isize);

    /// Number of positions from `self` to `other`.
    fn distance_to(&self, other: &Self) -> isize;

    /// Returns a copy moved by `delta` positions.
    fn at(&self, delta: isize) -> Self {
        let mut cursor = self.clone();
        cursor.jump(delta);
        cursor
    }
}

/// A random-access cursor over slots that can be exchanged in place.
pub trait SwapCursor: RandomCursor {
    /// The foreign object type stored in the slots.
    type Object: Foreign;

    /// Fetches the object stored at the cursor.
    fn load(&self) -> Result<Self::Object>;

    /// Exchanges the objects stored at `self` and `other`.
    fn iter_swap(&self, other: &Self) -> Result<()>;
}

/// Offset into an indexable object whose length was captured once.
pub(crate) struct Position<O> {
    pub(crate) obj: O,
    pub(crate) offset: isize,
    pub(crate) len: usize,
}

impl<O: Foreign> Position<O> {
    pub(crate) fn new(obj: O, offset: usize, len: usize) -> Self {
        Position {
            obj,
            offset: offset as isize,
            len,
        }
    }

    /// Index of the slot under the cursor, if it lies inside the range.
    pub(crate) fn index(&self) -> Result<usize> {
        usize::try_from(self.offset)
            .ok()
            .filter(|&index| index < self.len)
            .ok_or(Error::InvalidIteratorUse)
    }

    pub(crate) fn distance_to(&self, other: &Self) -> isize {
        debug_assert!(
            self.obj.is_same(&other.obj),
            "distance between cursors over different objects"
        );
        other.offset - self.offset
    }
}

impl<O: Foreign> Clone for Position<O> {
    fn clone(&self) -> Self {
        Position {
            obj: self.obj.clone(),
            offset: self.offset,
            len: self.len,
        }
    }
}

impl<O: Foreign> PartialEq for Position<O> {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && self.obj.is_same(&other.obj)
    }
}

impl<O: Foreign> PartialOrd for Position<O> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.obj.is_same(&other.obj) {
            Some(self.offset.cmp(&other.offset))
        } else {
            None
        }
    }
}

enum IterState<C> {
    Ready(C),
    Failed(Option<Error>),
}

/// Iterator over a forward range whose first element is fetched eagerly.
///
/// Each step dereferences the cursor and then advances it, until it compares
/// equal to the end cursor. If fetching the first element fails, the error is
/// yielded once.
pub struct Iter<C> {
    state: IterState<C>,
    end: C,
}

impl<C> Iter<C> {
    pub(crate) fn new(begin: Result<C>, end: C) -> Self {
        Iter {
            state: match begin {
                Ok(cursor) => IterState::Ready(cursor),
                Err(err) => IterState::Failed(Some(err)),
            },
            end,
        }
    }
}

impl<C: Cursor> Iterator for Iter<C> {
    type Item = Result<C::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.state {
            IterState::Ready(cursor) => {
                if *cursor == self.end {
                    return None;
                }
                let item = cursor.get();
                Some(cursor.advance().and(item))
            }
            IterState::Failed(err) => err.take().map(Err),
        }
    }
}

/// Double-ended iterator over the positions between two random-access
/// cursors.
pub struct RandomIter<C> {
    front: C,
    back: C,
}

impl<C: RandomCursor> RandomIter<C> {
    pub(crate) fn new(front: C, back: C) -> Self {
        RandomIter { front, back }
    }

    fn remaining(&self) -> usize {
        usize::try_from(self.front.distance_to(&self.back)).unwrap_or(0)
    }
}

impl<C: RandomCursor> Iterator for RandomIter<C> {
    type Item = Result<C::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining() == 0 {
            return None;
        }
        let item = self.front.get();
        self.front.jump(1);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<C: RandomCursor> DoubleEndedIterator for RandomIter<C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining() == 0 {
            return None;
        }
        self.back.retreat();
        Some(self.back.get())
    }
}

impl<C: RandomCursor> ExactSizeIterator for RandomIter<C> {}

impl<C: Clone> Clone for RandomIter<C> {
    fn clone(&self) -> Self {
        RandomIter {
            front: self.front.clone(),
            back: self.back.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::object::Object;
    use serde_json::json;

    fn obj(value: serde_json::Value) -> Object {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_random_iter_both_ends() {
        let list = obj(json!([1, 2, 3, 4]));
        let begin = RandomAccessCursor::<Object, i64>::new(list.clone(), 0, 4);
        let end = begin.at(4);
        let mut iter = RandomIter::new(begin, end);
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next().unwrap().unwrap(), 1);
        assert_eq!(iter.next_back().unwrap().unwrap(), 4);
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.rev().collect::<Result<Vec<_>>>().unwrap(), [3, 2]);
    }

    #[test]
    fn test_random_iter_len_matches_count() {
        let list = obj(json!([1, 2]));
        let begin = RandomAccessCursor::<Object, i64>::new(list.clone(), 0, 2);
        let end = begin.at(2);

        let iter = RandomIter::new(begin.at(-1), end.clone());
        assert_eq!(iter.len(), 3);
        let items = iter.collect::<Vec<_>>();
        assert_eq!(items.len(), 3);
        assert!(matches!(items[0], Err(Error::InvalidIteratorUse)));

        let iter = RandomIter::new(end.clone(), begin.clone());
        assert_eq!(iter.len(), 0);
        assert_eq!(iter.count(), 0);
    }

    #[test]
    fn test_forward_iter_yields_begin_error_once() {
        let mut iter = Iter::new(
            SinglePassCursor::<Object, Object>::begin(&Object::from(1)),
            SinglePassCursor::end(),
        );
        assert!(matches!(iter.next(), Some(Err(Error::BadRange(_)))));
        assert!(iter.next().is_none());
    }
}
