//! CPython objects as an `objrange` foreign runtime.
//!
//! Wrap any `Bound<'py, PyAny>` in [`PyObj`] and hand it to one of the
//! `objrange` ranges. All calls happen with the GIL held for `'py`.

mod convert;

use objrange::{BinaryOp, Foreign};
use pyo3::{
    exceptions::PyStopIteration,
    ffi, intern,
    prelude::*,
    types::{PyIterator, PyMapping},
};
use std::cmp::Ordering;

/// A counted reference to a Python object.
#[derive(Debug, Clone)]
pub struct PyObj<'py>(pub Bound<'py, PyAny>);

impl<'py> PyObj<'py> {
    pub fn new(obj: Bound<'py, PyAny>) -> Self {
        PyObj(obj)
    }

    pub fn as_any(&self) -> &Bound<'py, PyAny> {
        &self.0
    }

    pub fn into_inner(self) -> Bound<'py, PyAny> {
        self.0
    }
}

impl<'py> From<Bound<'py, PyAny>> for PyObj<'py> {
    fn from(obj: Bound<'py, PyAny>) -> Self {
        PyObj(obj)
    }
}

fn next<'py>(iter: &Bound<'py, PyIterator>) -> PyResult<Bound<'py, PyAny>> {
    iter.call_method0(intern!(iter.py(), "__next__"))
}

impl<'py> Foreign for PyObj<'py> {
    type Runtime = Python<'py>;
    type Iter = Bound<'py, PyIterator>;
    type PairIter = Bound<'py, PyIterator>;
    type Error = PyErr;

    fn runtime(&self) -> Python<'py> {
        self.0.py()
    }

    fn is_same(&self, other: &Self) -> bool {
        self.0.is(&other.0)
    }

    fn type_name(&self) -> String {
        match self.0.get_type().name() {
            Ok(name) => name.to_string(),
            Err(_) => "object".to_owned(),
        }
    }

    fn obtain_iterator(&self) -> Option<Self::Iter> {
        self.0.iter().ok()
    }

    fn iterator_next(iter: &mut Self::Iter) -> PyResult<Self> {
        next(iter).map(PyObj)
    }

    fn is_sequence(&self) -> bool {
        // The runtime's own sequence protocol, not `collections.abc.Sequence`.
        unsafe { ffi::PySequence_Check(self.0.as_ptr()) == 1 }
    }

    fn length(&self) -> PyResult<usize> {
        self.0.len()
    }

    fn indexed_get(&self, index: usize) -> PyResult<Self> {
        self.0.get_item(index).map(PyObj)
    }

    fn indexed_set(&self, index: usize, value: &Self) -> PyResult<()> {
        self.0.set_item(index, &value.0)
    }

    fn is_mapping(&self) -> bool {
        self.0.downcast::<PyMapping>().is_ok()
    }

    fn obtain_pair_iterator(&self) -> PyResult<Self::PairIter> {
        self.0.call_method0(intern!(self.0.py(), "items"))?.iter()
    }

    fn pair_iterator_next(iter: &mut Self::PairIter) -> PyResult<(Self, Self)> {
        let (key, value) = next(iter)?.extract::<(Bound<'py, PyAny>, Bound<'py, PyAny>)>()?;
        Ok((PyObj(key), PyObj(value)))
    }

    fn is_exhausted(err: &PyErr) -> bool {
        Python::with_gil(|py| err.is_instance_of::<PyStopIteration>(py))
    }

    fn binary_op(&self, op: BinaryOp, rhs: &Self) -> PyResult<Self> {
        match op {
            BinaryOp::Add => self.0.add(&rhs.0),
            BinaryOp::Sub => self.0.sub(&rhs.0),
            BinaryOp::Mul => self.0.mul(&rhs.0),
        }
        .map(PyObj)
    }

    fn compare(&self, other: &Self) -> PyResult<Ordering> {
        self.0.compare(&other.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use objrange::{
        algorithm, Error, MappingRange, MutableRange, RandomAccessRange, RangeKind,
        SinglePassRange,
    };
    use pyo3::{exceptions::PyTypeError, types::PyDict};

    fn eval<'py>(py: Python<'py>, code: &str) -> PyObj<'py> {
        PyObj(py.eval_bound(code, None, None).unwrap())
    }

    #[test]
    fn test_sort_list() {
        Python::with_gil(|py| {
            let list = eval(py, "[3, 1, 2]");
            let range = MutableRange::new(list.clone()).unwrap();
            algorithm::sort(&range.begin(), &range.end()).unwrap();
            assert_eq!(list.0.extract::<Vec<i64>>().unwrap(), [1, 2, 3]);
        });
    }

    #[test]
    fn test_increment() {
        Python::with_gil(|py| {
            let list = eval(py, "[5, 6, 7]");
            let range = MutableRange::new(list.clone()).unwrap();
            for item in &range {
                item.add_assign(1).unwrap();
            }
            assert_eq!(list.0.extract::<Vec<i64>>().unwrap(), [6, 7, 8]);
        });
    }

    #[test]
    fn test_mapping_pairs() {
        Python::with_gil(|py| {
            let dict = PyDict::new_bound(py);
            dict.set_item("a", 1).unwrap();
            dict.set_item("b", 2).unwrap();
            let range = MappingRange::<PyObj, String, i64>::new(PyObj(dict.into_any())).unwrap();
            let pairs = (&range).into_iter().collect::<Result<Vec<_>, _>>().unwrap();
            assert_eq!(pairs, [("a".to_owned(), 1), ("b".to_owned(), 2)]);
        });
    }

    #[test]
    fn test_generator_is_single_pass_only() {
        Python::with_gil(|py| {
            let gen = eval(py, "(x * x for x in range(4))");
            assert!(matches!(
                RandomAccessRange::<PyObj, PyObj>::new(gen.clone()),
                Err(Error::BadRange(RangeKind::RandomAccess))
            ));
            let squares = SinglePassRange::<PyObj, u64>::new(gen)
                .unwrap()
                .into_iter()
                .collect::<Result<Vec<_>, _>>()
                .unwrap();
            assert_eq!(squares, [0, 1, 4, 9]);
        });
    }

    #[test]
    fn test_scalars_are_rejected() {
        Python::with_gil(|py| {
            let value = eval(py, "5");
            assert!(SinglePassRange::<PyObj, PyObj>::new(value.clone()).is_err());
            assert!(MutableRange::new(value.clone()).is_err());
            assert!(matches!(
                MappingRange::<PyObj, PyObj, PyObj>::new(eval(py, "[1]")),
                Err(Error::BadRange(RangeKind::Mapping))
            ));
        });
    }

    #[test]
    fn test_python_errors_propagate() {
        Python::with_gil(|py| {
            let tuple = eval(py, "(1, 2)");
            let range = MutableRange::new(tuple).unwrap();
            let err = range.item(0).unwrap().set(5).unwrap_err();
            let err = err.downcast_foreign::<PyErr>().unwrap();
            assert!(err.is_instance_of::<PyTypeError>(py));
        });
    }

    #[test]
    fn test_duck_typed_sequence() {
        Python::with_gil(|py| {
            let seq = eval(
                py,
                "type('Tens', (), {'__len__': lambda self: 3, '__getitem__': lambda self, i: i * 10})()",
            );
            assert!(seq.is_sequence());
            let range = RandomAccessRange::<PyObj, i64>::new(seq).unwrap();
            assert_eq!(range.len(), 3);
            assert_eq!(range.get(2).unwrap(), 20);

            assert!(!eval(py, "{'a': 1}").is_sequence());
        });
    }

    #[test]
    fn test_string_slots() {
        Python::with_gil(|py| {
            let range = RandomAccessRange::<PyObj, String>::new(eval(py, "'abc'")).unwrap();
            assert_eq!(range.len(), 3);
            assert_eq!(range.get(2).unwrap(), "c");
            assert!(matches!(
                RandomAccessRange::<PyObj, i64>::new(eval(py, "'abc'")).unwrap().get(0),
                Err(Error::Conversion(_))
            ));
        });
    }
}
