use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::{ConvertError, FromValue, Map, PathSegment, Value};

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(ConvertError::mismatch("string", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    T::from_value(item).map_err(|e| e.within(PathSegment::Index(index)))
                })
                .collect(),
            other => Err(ConvertError::mismatch("list", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Box<T> {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        T::from_value(value).map(Box::new)
    }

    fn from_missing() -> Option<Self> {
        T::from_missing().map(Box::new)
    }
}

impl FromValue for Map {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Map(map) => Ok(map),
            other => Err(ConvertError::mismatch("map", &other)),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        Ok(value)
    }
}
