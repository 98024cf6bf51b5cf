//! A `Foreign` wrapper around the object model that records every call made
//! through the iteration protocols.

use objrange::{
    object::{self, Exception, Object},
    BinaryOp, ConversionError, Foreign, FromForeign,
};
use std::{cell::Cell, cmp::Ordering, rc::Rc};

#[derive(Debug, Default)]
pub struct Counters {
    pub iterator_next: Cell<usize>,
    pub pair_iterator_next: Cell<usize>,
    pub after_exhaustion: Cell<usize>,
}

fn bump(cell: &Cell<usize>) {
    cell.set(cell.get() + 1);
}

#[derive(Debug, Clone)]
pub struct Counted {
    pub obj: Object,
    pub counters: Rc<Counters>,
}

impl Counted {
    pub fn new(obj: Object) -> Self {
        Counted {
            obj,
            counters: Rc::default(),
        }
    }

    fn wrap(&self, obj: Object) -> Self {
        Counted {
            obj,
            counters: self.counters.clone(),
        }
    }
}

pub struct CountedIter<I> {
    inner: I,
    counters: Rc<Counters>,
    exhausted: bool,
}

impl<I> CountedIter<I> {
    fn record<T>(&mut self, result: &Result<T, Exception>) {
        if self.exhausted {
            bump(&self.counters.after_exhaustion);
        }
        if let Err(Exception::StopIteration) = result {
            self.exhausted = true;
        }
    }
}

impl Foreign for Counted {
    type Runtime = ();
    type Iter = CountedIter<object::Iter>;
    type PairIter = CountedIter<object::PairIter>;
    type Error = Exception;

    fn runtime(&self) {}

    fn is_same(&self, other: &Self) -> bool {
        self.obj.is_same(&other.obj)
    }

    fn type_name(&self) -> String {
        self.obj.type_name()
    }

    fn obtain_iterator(&self) -> Option<Self::Iter> {
        Some(CountedIter {
            inner: self.obj.obtain_iterator()?,
            counters: self.counters.clone(),
            exhausted: false,
        })
    }

    fn iterator_next(iter: &mut Self::Iter) -> Result<Self, Exception> {
        bump(&iter.counters.iterator_next);
        let result = Object::iterator_next(&mut iter.inner);
        iter.record(&result);
        let counters = iter.counters.clone();
        result.map(|obj| Counted { obj, counters })
    }

    fn is_sequence(&self) -> bool {
        self.obj.is_sequence()
    }

    fn length(&self) -> Result<usize, Exception> {
        self.obj.length()
    }

    fn indexed_get(&self, index: usize) -> Result<Self, Exception> {
        Ok(self.wrap(self.obj.indexed_get(index)?))
    }

    fn indexed_set(&self, index: usize, value: &Self) -> Result<(), Exception> {
        self.obj.indexed_set(index, &value.obj)
    }

    fn is_mapping(&self) -> bool {
        self.obj.is_mapping()
    }

    fn obtain_pair_iterator(&self) -> Result<Self::PairIter, Exception> {
        Ok(CountedIter {
            inner: self.obj.obtain_pair_iterator()?,
            counters: self.counters.clone(),
            exhausted: false,
        })
    }

    fn pair_iterator_next(iter: &mut Self::PairIter) -> Result<(Self, Self), Exception> {
        bump(&iter.counters.pair_iterator_next);
        let result = Object::pair_iterator_next(&mut iter.inner);
        iter.record(&result);
        let counters = iter.counters.clone();
        result.map(|(k, v)| {
            (
                Counted {
                    obj: k,
                    counters: counters.clone(),
                },
                Counted { obj: v, counters },
            )
        })
    }

    fn is_exhausted(err: &Exception) -> bool {
        Object::is_exhausted(err)
    }

    fn binary_op(&self, op: BinaryOp, rhs: &Self) -> Result<Self, Exception> {
        Ok(self.wrap(self.obj.binary_op(op, &rhs.obj)?))
    }

    fn compare(&self, other: &Self) -> Result<Ordering, Exception> {
        self.obj.compare(&other.obj)
    }
}

macro_rules! impl_from_counted {
    ($($ty:ty),*) => {
        $(
            impl FromForeign<Counted> for $ty {
                fn from_foreign(obj: &Counted) -> Result<Self, ConversionError> {
                    <$ty>::from_foreign(&obj.obj)
                }
            }
        )*
    };
}

impl_from_counted!(i64, String);
