use crate::{BinaryOp, Error, Foreign, FromForeign, IntoForeign, Result};
use std::fmt;

/// A reference to one slot of a mutable indexable object.
///
/// Reads go through `indexed_get` and writes through `indexed_set` every
/// time; nothing is cached. Compound assignment reads the slot, applies the
/// operator in the runtime and stores the result back.
pub struct Item<O: Foreign> {
    obj: O,
    index: usize,
}

impl<O: Foreign> Item<O> {
    pub(crate) fn new(obj: O, index: usize) -> Self {
        Item { obj, index }
    }

    /// Index of the referenced slot.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The object holding the slot.
    pub fn object(&self) -> &O {
        &self.obj
    }

    /// Fetches the object currently stored in the slot.
    pub fn load(&self) -> Result<O> {
        self.obj.indexed_get(self.index).map_err(Error::foreign)
    }

    /// Fetches the slot and converts it to `T`.
    pub fn get<T: FromForeign<O>>(&self) -> Result<T> {
        Ok(T::from_foreign(&self.load()?)?)
    }

    /// Stores `value` in the slot.
    pub fn store(&self, value: &O) -> Result<()> {
        self.obj
            .indexed_set(self.index, value)
            .map_err(Error::foreign)
    }

    /// Converts `value` into a new foreign object and stores it in the slot.
    pub fn set<T: IntoForeign<O>>(&self, value: T) -> Result<()> {
        let value = value.into_foreign(self.obj.runtime());
        self.store(&value)
    }

    /// Replaces the slot with `slot <op> rhs`.
    pub fn apply<T: IntoForeign<O>>(&self, op: BinaryOp, rhs: T) -> Result<()> {
        let rhs = rhs.into_foreign(self.obj.runtime());
        let result = self
            .load()?
            .binary_op(op, &rhs)
            .map_err(Error::foreign)?;
        self.store(&result)
    }

    /// `slot += rhs`
    pub fn add_assign<T: IntoForeign<O>>(&self, rhs: T) -> Result<()> {
        self.apply(BinaryOp::Add, rhs)
    }

    /// `slot -= rhs`
    pub fn sub_assign<T: IntoForeign<O>>(&self, rhs: T) -> Result<()> {
        self.apply(BinaryOp::Sub, rhs)
    }

    /// `slot *= rhs`
    pub fn mul_assign<T: IntoForeign<O>>(&self, rhs: T) -> Result<()> {
        self.apply(BinaryOp::Mul, rhs)
    }
}

impl<O: Foreign> Clone for Item<O> {
    fn clone(&self) -> Self {
        Item {
            obj: self.obj.clone(),
            index: self.index,
        }
    }
}

/// Two items are equal if they refer to the same slot of the same object.
impl<O: Foreign> PartialEq for Item<O> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.obj.is_same(&other.obj)
    }
}

impl<O: Foreign> fmt::Debug for Item<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("obj", &self.obj)
            .field("index", &self.index)
            .finish()
    }
}

/// Exchanges the contents of two slots.
///
/// Both values are loaded into detached handles before either slot is
/// written, so the exchange holds even when the slots alias.
pub fn swap<O: Foreign>(a: &Item<O>, b: &Item<O>) -> Result<()> {
    let left = a.load()?;
    let right = b.load()?;
    a.store(&right)?;
    b.store(&left)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::object::{Exception, Object};
    use serde_json::json;

    fn obj(value: serde_json::Value) -> Object {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_read_write() {
        let list = obj(json!([1, 2, 3]));
        let item = Item::new(list.clone(), 1);
        assert_eq!(item.get::<i64>().unwrap(), 2);
        item.set(20).unwrap();
        assert_eq!(list, obj(json!([1, 20, 3])));
        assert_eq!(item.get::<i64>().unwrap(), 20);
        item.store(&Object::from("x")).unwrap();
        assert_eq!(item.get::<String>().unwrap(), "x");
    }

    #[test]
    fn test_reads_are_not_cached() {
        let list = obj(json!([1]));
        let item = Item::new(list.clone(), 0);
        list.indexed_set(0, &Object::from(7)).unwrap();
        assert_eq!(item.get::<i64>().unwrap(), 7);
    }

    #[test]
    fn test_compound_assignment() {
        let list = obj(json!([5, "a", 2.5]));
        Item::new(list.clone(), 0).add_assign(1).unwrap();
        Item::new(list.clone(), 1).mul_assign(3).unwrap();
        Item::new(list.clone(), 2).sub_assign(0.5).unwrap();
        assert_eq!(list, obj(json!([6, "aaa", 2.0])));
    }

    #[test]
    fn test_compound_assignment_failure_leaves_slot() {
        let list = obj(json!(["a"]));
        let item = Item::new(list.clone(), 0);
        let err = item.add_assign(1).unwrap_err();
        assert!(matches!(
            err.downcast_foreign::<Exception>(),
            Some(Exception::TypeError(_))
        ));
        assert_eq!(list, obj(json!(["a"])));
    }

    #[test]
    fn test_swap() {
        let list = obj(json!(["a", "b", "c"]));
        let first = Item::new(list.clone(), 0);
        let last = Item::new(list.clone(), 2);
        swap(&first, &last).unwrap();
        assert_eq!(list, obj(json!(["c", "b", "a"])));

        swap(&first, &first.clone()).unwrap();
        assert_eq!(list, obj(json!(["c", "b", "a"])));
        assert_eq!(first, first.clone());
        assert_ne!(first, last);
    }

    #[test]
    fn test_oversized_repetition_leaves_slot() {
        let list = obj(json!([[1], "ab"]));
        for index in 0..2 {
            let err = Item::new(list.clone(), index).mul_assign(i64::MAX).unwrap_err();
            assert!(matches!(
                err.downcast_foreign::<Exception>(),
                Some(Exception::OverflowError(_))
            ));
        }
        assert_eq!(list, obj(json!([[1], "ab"])));
    }

    #[test]
    fn test_immutable_target() {
        let tuple = Object::tuple(vec![Object::from(1)]);
        let item = Item::new(tuple, 0);
        assert_eq!(item.get::<i64>().unwrap(), 1);
        assert!(item.set(2).is_err());
    }
}
