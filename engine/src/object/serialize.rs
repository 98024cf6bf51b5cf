use super::{Data, Key, Object};
use serde::{
    de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor},
    ser::{self, Serialize, SerializeMap, SerializeSeq, Serializer},
};
use std::fmt;

impl Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Key::None => serializer.serialize_unit(),
            Key::Bool(b) => serializer.serialize_bool(*b),
            Key::Int(i) => serializer.serialize_i64(*i),
            Key::Str(s) => serializer.serialize_str(s),
            Key::Tuple(keys) => {
                let mut seq = serializer.serialize_seq(Some(keys.len()))?;
                for key in keys {
                    seq.serialize_element(key)?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for Object {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match &*self.0.borrow() {
            Data::None => serializer.serialize_unit(),
            Data::Bool(b) => serializer.serialize_bool(*b),
            Data::Int(i) => serializer.serialize_i64(*i),
            Data::Float(x) => serializer.serialize_f64(*x),
            Data::Str(s) => serializer.serialize_str(s),
            Data::List(items) | Data::Tuple(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Data::Dict(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
            Data::Iterator(_) => Err(ser::Error::custom("cannot serialize an iterator object")),
        }
    }
}

struct ObjectVisitor;

impl<'de> Visitor<'de> for ObjectVisitor {
    type Value = Object;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "a null, boolean, number, string, array or map")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Object, E> {
        Ok(Object::none())
    }

    fn visit_none<E: de::Error>(self) -> Result<Object, E> {
        Ok(Object::none())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Object, D::Error> {
        Object::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Object, E> {
        Ok(Object::from(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Object, E> {
        Ok(Object::from(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Object, E> {
        i64::try_from(value)
            .map(Object::from)
            .map_err(|_| E::custom(format!("integer {} does not fit in an int", value)))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Object, E> {
        Ok(Object::from(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Object, E> {
        Ok(Object::from(value))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Object, E> {
        Ok(Object::from(value))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Object, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Object::list(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Object, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(pair) = map.next_entry::<Object, Object>()? {
            pairs.push(pair);
        }
        Object::dict(pairs).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Object {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ObjectVisitor)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        object::{GetType, Type},
        Foreign,
    };
    use serde_json::json;

    #[test]
    fn test_object_deserialize() {
        let value: Object = serde_json::from_str(r#"[null, true, -3, 7, 1.5, "s", {"k": [1]}]"#).unwrap();
        let types = (0..7)
            .map(|i| value.indexed_get(i).unwrap().get_type())
            .collect::<Vec<_>>();
        assert_eq!(
            types,
            [
                Type::NoneType,
                Type::Bool,
                Type::Int,
                Type::Int,
                Type::Float,
                Type::Str,
                Type::Dict
            ]
        );

        assert!(serde_json::from_str::<Object>("18446744073709551615").is_err());
    }

    #[test]
    fn test_object_serialize() {
        let value = json!({"a": [1, 2.5, "x", null, false], "b": {}});
        let obj: Object = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&obj).unwrap(), value);

        let tuple = Object::tuple(vec![Object::from(1), Object::from("a")]);
        assert_eq!(serde_json::to_value(&tuple).unwrap(), json!([1, "a"]));

        let iter = Object::iterator(Vec::new());
        assert!(serde_json::to_value(&iter).is_err());
    }
}
