//! Generic algorithms over cursor pairs.
//!
//! Everything here works purely through the cursor traits, so the same code
//! runs over any [`Foreign`] runtime. Reordering algorithms only ever move
//! elements with [`SwapCursor::iter_swap`].

use crate::{Cursor, Error, Foreign, Result, SwapCursor};
use cfg_if::cfg_if;
use std::cmp::Ordering;

/// Counts the elements in `[first, last)`, dereferencing each one.
pub fn count<C: Cursor>(mut first: C, last: C) -> Result<usize> {
    let mut n = 0;
    while first != last {
        first.get()?;
        first.advance()?;
        n += 1;
    }
    Ok(n)
}

/// Calls `f` with every element in `[first, last)`, stopping at the first
/// error.
pub fn for_each<C, F>(mut first: C, last: C, mut f: F) -> Result<()>
where
    C: Cursor,
    F: FnMut(C::Item) -> Result<()>,
{
    while first != last {
        f(first.get()?)?;
        first.advance()?;
    }
    Ok(())
}

/// Reverses `[first, last)` in place.
pub fn reverse<C: SwapCursor>(first: &C, last: &C) -> Result<()> {
    let mut lo = first.clone();
    let mut hi = last.clone();
    let mut n = lo.distance_to(&hi);
    while n > 1 {
        hi.retreat();
        lo.iter_swap(&hi)?;
        lo.advance()?;
        n -= 2;
    }
    Ok(())
}

fn natural_order<O: Foreign>(a: &O, b: &O) -> Result<Ordering> {
    a.compare(b).map_err(Error::foreign)
}

fn is_less<O, F>(compare: &mut F, a: &O, b: &O) -> Result<bool>
where
    F: FnMut(&O, &O) -> Result<Ordering>,
{
    Ok(compare(a, b)? == Ordering::Less)
}

fn sift_down<C, F>(first: &C, mut root: isize, len: isize, compare: &mut F) -> Result<()>
where
    C: SwapCursor,
    F: FnMut(&C::Object, &C::Object) -> Result<Ordering>,
{
    loop {
        let mut child = 2 * root + 1;
        if child >= len {
            return Ok(());
        }
        let mut child_value = first.at(child).load()?;
        if child + 1 < len {
            let right = first.at(child + 1).load()?;
            if is_less(compare, &child_value, &right)? {
                child += 1;
                child_value = right;
            }
        }
        let parent = first.at(root);
        if !is_less(compare, &parent.load()?, &child_value)? {
            return Ok(());
        }
        parent.iter_swap(&first.at(child))?;
        root = child;
    }
}

fn pop_heap_len<C, F>(first: &C, len: isize, compare: &mut F) -> Result<()>
where
    C: SwapCursor,
    F: FnMut(&C::Object, &C::Object) -> Result<Ordering>,
{
    if len > 1 {
        first.iter_swap(&first.at(len - 1))?;
        sift_down(first, 0, len - 1, compare)?;
    }
    Ok(())
}

/// Arranges `[first, last)` into a max-heap under `compare`.
pub fn make_heap_by<C, F>(first: &C, last: &C, mut compare: F) -> Result<()>
where
    C: SwapCursor,
    F: FnMut(&C::Object, &C::Object) -> Result<Ordering>,
{
    let len = first.distance_to(last);
    for root in (0..len / 2).rev() {
        sift_down(first, root, len, &mut compare)?;
    }
    Ok(())
}

/// Moves the element at `last - 1` into the heap `[first, last - 1)`.
pub fn push_heap_by<C, F>(first: &C, last: &C, mut compare: F) -> Result<()>
where
    C: SwapCursor,
    F: FnMut(&C::Object, &C::Object) -> Result<Ordering>,
{
    let mut child = first.distance_to(last) - 1;
    while child > 0 {
        let parent = (child - 1) / 2;
        let (p, c) = (first.at(parent), first.at(child));
        if !is_less(&mut compare, &p.load()?, &c.load()?)? {
            break;
        }
        p.iter_swap(&c)?;
        child = parent;
    }
    Ok(())
}

/// Moves the largest element of the heap `[first, last)` to `last - 1` and
/// restores the heap on `[first, last - 1)`.
pub fn pop_heap_by<C, F>(first: &C, last: &C, mut compare: F) -> Result<()>
where
    C: SwapCursor,
    F: FnMut(&C::Object, &C::Object) -> Result<Ordering>,
{
    pop_heap_len(first, first.distance_to(last), &mut compare)
}

/// Turns the heap `[first, last)` into an ascending sequence.
pub fn sort_heap_by<C, F>(first: &C, last: &C, mut compare: F) -> Result<()>
where
    C: SwapCursor,
    F: FnMut(&C::Object, &C::Object) -> Result<Ordering>,
{
    let mut len = first.distance_to(last);
    while len > 1 {
        pop_heap_len(first, len, &mut compare)?;
        len -= 1;
    }
    Ok(())
}

/// Sorts `[first, last)` in ascending order under `compare`.
///
/// Heap sort: not stable, no extra storage beyond two loaded handles.
pub fn sort_by<C, F>(first: &C, last: &C, mut compare: F) -> Result<()>
where
    C: SwapCursor,
    F: FnMut(&C::Object, &C::Object) -> Result<Ordering>,
{
    make_heap_by(first, last, &mut compare)?;
    sort_heap_by(first, last, compare)
}

/// [`make_heap_by`] with the runtime's own comparison.
pub fn make_heap<C: SwapCursor>(first: &C, last: &C) -> Result<()> {
    make_heap_by(first, last, natural_order)
}

/// [`push_heap_by`] with the runtime's own comparison.
pub fn push_heap<C: SwapCursor>(first: &C, last: &C) -> Result<()> {
    push_heap_by(first, last, natural_order)
}

/// [`pop_heap_by`] with the runtime's own comparison.
pub fn pop_heap<C: SwapCursor>(first: &C, last: &C) -> Result<()> {
    pop_heap_by(first, last, natural_order)
}

/// [`sort_heap_by`] with the runtime's own comparison.
pub fn sort_heap<C: SwapCursor>(first: &C, last: &C) -> Result<()> {
    sort_heap_by(first, last, natural_order)
}

/// Sorts `[first, last)` using the runtime's own comparison.
pub fn sort<C: SwapCursor>(first: &C, last: &C) -> Result<()> {
    sort_by(first, last, natural_order)
}

cfg_if! {
    if #[cfg(feature = "rand")] {
        use rand::Rng;

        /// Shuffles `[first, last)` with a Fisher-Yates pass.
        pub fn shuffle<C, R>(first: &C, last: &C, rng: &mut R) -> Result<()>
        where
            C: SwapCursor,
            R: Rng + ?Sized,
        {
            let len = first.distance_to(last);
            for i in (1..len).rev() {
                let j = rng.gen_range(0..=i);
                if i != j {
                    first.at(i).iter_swap(&first.at(j))?;
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        object::{Exception, Object},
        FromForeign, MutableRange, RandomAccessRange, SinglePassRange,
    };
    use serde_json::json;

    fn obj(value: serde_json::Value) -> Object {
        serde_json::from_value(value).unwrap()
    }

    fn mutable(value: serde_json::Value) -> (Object, MutableRange<Object>) {
        let list = obj(value);
        let range = MutableRange::new(list.clone()).unwrap();
        (list, range)
    }

    #[test]
    fn test_count() {
        let list = obj(json!([1, 2, 3]));
        let single = SinglePassRange::<Object, i64>::new(list.clone()).unwrap();
        assert_eq!(count(single.begin().unwrap(), single.end()).unwrap(), 3);

        let random = RandomAccessRange::<Object, i64>::new(list).unwrap();
        assert_eq!(count(random.begin(), random.end()).unwrap(), 3);

        let mixed = SinglePassRange::<Object, i64>::new(obj(json!([1, "x"]))).unwrap();
        assert!(matches!(
            count(mixed.begin().unwrap(), mixed.end()),
            Err(Error::Conversion(_))
        ));
    }

    #[test]
    fn test_for_each_increments() {
        let (list, range) = mutable(json!([5, 6, 7]));
        for_each(range.begin(), range.end(), |item| item.add_assign(1)).unwrap();
        assert_eq!(list, obj(json!([6, 7, 8])));
    }

    #[test]
    fn test_reverse() {
        let (list, range) = mutable(json!([1, 2, 3, 4, 5]));
        reverse(&range.begin(), &range.end()).unwrap();
        assert_eq!(list, obj(json!([5, 4, 3, 2, 1])));

        let (list, range) = mutable(json!(["a", "b"]));
        reverse(&range.begin(), &range.end()).unwrap();
        assert_eq!(list, obj(json!(["b", "a"])));
    }

    #[test]
    fn test_sort() {
        let (list, range) = mutable(json!([3, 1, 2]));
        sort(&range.begin(), &range.end()).unwrap();
        assert_eq!(list, obj(json!([1, 2, 3])));

        let (list, range) = mutable(json!(["pear", "apple", "fig", "apple"]));
        sort(&range.begin(), &range.end()).unwrap();
        assert_eq!(list, obj(json!(["apple", "apple", "fig", "pear"])));

        let (list, range) = mutable(json!([]));
        sort(&range.begin(), &range.end()).unwrap();
        assert_eq!(list, obj(json!([])));
    }

    #[test]
    fn test_sort_by_descending() {
        let (list, range) = mutable(json!([2, 9, 4, 1]));
        sort_by(&range.begin(), &range.end(), |a: &Object, b: &Object| {
            Ok(natural_order(a, b)?.reverse())
        })
        .unwrap();
        assert_eq!(list, obj(json!([9, 4, 2, 1])));
    }

    #[test]
    fn test_sort_incomparable() {
        let (_, range) = mutable(json!([1, "a"]));
        let err = sort(&range.begin(), &range.end()).unwrap_err();
        assert!(matches!(
            err.downcast_foreign::<Exception>(),
            Some(Exception::TypeError(_))
        ));
    }

    #[test]
    fn test_heap_operations() {
        let (list, range) = mutable(json!([4, 8, 1, 7, 3]));
        let (begin, end) = (range.begin(), range.end());
        make_heap(&begin, &end).unwrap();
        assert_eq!(range.item(0).unwrap().get::<i64>().unwrap(), 8);

        pop_heap(&begin, &end).unwrap();
        assert_eq!(range.item(4).unwrap().get::<i64>().unwrap(), 8);
        assert_eq!(range.item(0).unwrap().get::<i64>().unwrap(), 7);

        range.item(4).unwrap().set(10).unwrap();
        push_heap(&begin, &end).unwrap();
        assert_eq!(range.item(0).unwrap().get::<i64>().unwrap(), 10);

        sort_heap(&begin, &end).unwrap();
        assert_eq!(list, obj(json!([1, 3, 4, 7, 10])));
    }

    #[cfg(feature = "rand")]
    #[test]
    fn test_shuffle_is_a_permutation() {
        use rand::{rngs::StdRng, SeedableRng};

        let items = (0..32).collect::<Vec<i64>>();
        let (list, range) = mutable(json!(items));
        let mut rng = StdRng::seed_from_u64(7);
        shuffle(&range.begin(), &range.end(), &mut rng).unwrap();

        let mut shuffled = Vec::<i64>::from_foreign(&list).unwrap();
        assert_ne!(shuffled, items);
        shuffled.sort();
        assert_eq!(shuffled, items);
    }

    #[cfg(feature = "rand")]
    #[test]
    fn test_shuffle_is_seeded() {
        use rand::{rngs::StdRng, SeedableRng};

        let run = |seed| {
            let (list, range) = mutable(json!(["a", "b", "c", "d", "e"]));
            shuffle(&range.begin(), &range.end(), &mut StdRng::seed_from_u64(seed)).unwrap();
            serde_json::to_value(&list).unwrap()
        };
        assert_eq!(run(42), run(42));
    }
}
