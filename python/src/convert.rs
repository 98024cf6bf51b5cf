use crate::PyObj;
use objrange::{ConversionError, Foreign, FromForeign, IntoForeign};
use pyo3::{prelude::*, types::PyString};

macro_rules! impl_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'py> FromForeign<PyObj<'py>> for $ty {
                fn from_foreign(obj: &PyObj<'py>) -> Result<Self, ConversionError> {
                    obj.0
                        .extract::<$ty>()
                        .map_err(|_| ConversionError::new(stringify!($ty), obj.type_name()))
                }
            }

            impl<'py> IntoForeign<PyObj<'py>> for $ty {
                fn into_foreign(self, py: Python<'py>) -> PyObj<'py> {
                    PyObj(self.into_py(py).into_bound(py))
                }
            }
        )*
    };
}

impl_conversions!(i64, i32, u64, usize, f64, bool, String);

impl<'py> IntoForeign<PyObj<'py>> for &str {
    fn into_foreign(self, py: Python<'py>) -> PyObj<'py> {
        PyObj(PyString::new_bound(py, self).into_any())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_round_trip_natives() {
        Python::with_gil(|py| {
            let obj: PyObj = 42i64.into_foreign(py);
            assert_eq!(i64::from_foreign(&obj), Ok(42));
            assert_eq!(f64::from_foreign(&obj), Ok(42.0));

            let obj: PyObj = "hi".into_foreign(py);
            assert_eq!(obj.type_name(), "str");
            assert_eq!(String::from_foreign(&obj), Ok("hi".to_owned()));
            assert_eq!(
                i64::from_foreign(&obj),
                Err(ConversionError::new("i64", "str"))
            );

            let obj: PyObj = (-1i32).into_foreign(py);
            assert_eq!(
                usize::from_foreign(&obj),
                Err(ConversionError::new("usize", "int"))
            );
        });
    }
}
