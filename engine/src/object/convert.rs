use super::{Data, Object};
use crate::{ConversionError, Foreign, FromForeign, IntoForeign};

macro_rules! impl_int_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromForeign<Object> for $ty {
                fn from_foreign(obj: &Object) -> Result<Self, ConversionError> {
                    let value = match &*obj.0.borrow() {
                        Data::Int(i) => *i,
                        Data::Bool(b) => *b as i64,
                        _ => return Err(ConversionError::new(stringify!($ty), obj.type_name())),
                    };
                    <$ty>::try_from(value)
                        .map_err(|_| ConversionError::new(stringify!($ty), format!("int {}", value)))
                }
            }
        )*
    };
}

impl_int_conversions!(i64, i32, u32, u64, usize);

macro_rules! impl_from_native {
    ($($ty:ty => |$value:ident| $data:expr),* $(,)?) => {
        $(
            impl From<$ty> for Object {
                fn from($value: $ty) -> Self {
                    Object::new($data)
                }
            }

            impl IntoForeign<Object> for $ty {
                fn into_foreign(self, _: ()) -> Object {
                    Object::from(self)
                }
            }
        )*
    };
}

impl_from_native! {
    i64 => |value| Data::Int(value),
    i32 => |value| Data::Int(value.into()),
    u32 => |value| Data::Int(value.into()),
    f64 => |value| Data::Float(value),
    bool => |value| Data::Bool(value),
    String => |value| Data::Str(value),
    &str => |value| Data::Str(value.to_owned()),
}

impl From<()> for Object {
    fn from(_: ()) -> Self {
        Object::none()
    }
}

impl IntoForeign<Object> for () {
    fn into_foreign(self, _: ()) -> Object {
        Object::none()
    }
}

impl<T: IntoForeign<Object>> IntoForeign<Object> for Vec<T> {
    fn into_foreign(self, runtime: ()) -> Object {
        Object::list(
            self.into_iter()
                .map(|value| value.into_foreign(runtime))
                .collect(),
        )
    }
}

impl<T: IntoForeign<Object>> IntoForeign<Object> for Option<T> {
    fn into_foreign(self, runtime: ()) -> Object {
        match self {
            Some(value) => value.into_foreign(runtime),
            None => Object::none(),
        }
    }
}

impl FromForeign<Object> for f64 {
    fn from_foreign(obj: &Object) -> Result<Self, ConversionError> {
        match &*obj.0.borrow() {
            Data::Float(x) => Ok(*x),
            Data::Int(i) => Ok(*i as f64),
            Data::Bool(b) => Ok(*b as i64 as f64),
            _ => Err(ConversionError::new("f64", obj.type_name())),
        }
    }
}

impl FromForeign<Object> for bool {
    fn from_foreign(obj: &Object) -> Result<Self, ConversionError> {
        match &*obj.0.borrow() {
            Data::Bool(b) => Ok(*b),
            _ => Err(ConversionError::new("bool", obj.type_name())),
        }
    }
}

impl FromForeign<Object> for String {
    fn from_foreign(obj: &Object) -> Result<Self, ConversionError> {
        match &*obj.0.borrow() {
            Data::Str(s) => Ok(s.clone()),
            _ => Err(ConversionError::new("String", obj.type_name())),
        }
    }
}

impl<T: FromForeign<Object>> FromForeign<Object> for Option<T> {
    fn from_foreign(obj: &Object) -> Result<Self, ConversionError> {
        if matches!(&*obj.0.borrow(), Data::None) {
            return Ok(None);
        }
        T::from_foreign(obj).map(Some)
    }
}

impl<T: FromForeign<Object>> FromForeign<Object> for Vec<T> {
    fn from_foreign(obj: &Object) -> Result<Self, ConversionError> {
        let items = match &*obj.0.borrow() {
            Data::List(items) | Data::Tuple(items) => items.clone(),
            _ => return Err(ConversionError::new("Vec", obj.type_name())),
        };
        items.iter().map(T::from_foreign).collect()
    }
}

impl<A: FromForeign<Object>, B: FromForeign<Object>> FromForeign<Object> for (A, B) {
    fn from_foreign(obj: &Object) -> Result<Self, ConversionError> {
        let items = match &*obj.0.borrow() {
            Data::Tuple(items) if items.len() == 2 => items.clone(),
            Data::Tuple(items) => {
                return Err(ConversionError::new(
                    "(A, B)",
                    format!("tuple of length {}", items.len()),
                ))
            }
            _ => return Err(ConversionError::new("(A, B)", obj.type_name())),
        };
        Ok((A::from_foreign(&items[0])?, B::from_foreign(&items[1])?))
    }
}
