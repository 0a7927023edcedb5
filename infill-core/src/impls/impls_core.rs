use crate::{ConvertError, FromValue, Value};

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(ConvertError::mismatch("bool", &other)),
        }
    }
}

/// Integers accept floats that hold a whole number, matching how fields are validated.
fn whole_number(value: &Value) -> Option<i64> {
    match *value {
        Value::Int(i) => Some(i),
        Value::Float(x) if x.is_finite() && (i64::MIN as f64..i64::MAX as f64).contains(&x) => {
            let truncated = x as i64;
            (truncated as f64 == x).then_some(truncated)
        }
        _ => None,
    }
}

macro_rules! impl_from_value_for_int {
    ($($ty:ident),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ConvertError> {
                    let Some(i) = whole_number(&value) else {
                        return Err(ConvertError::mismatch("int", &value));
                    };
                    $ty::try_from(i).map_err(|_| ConvertError::out_of_range(stringify!($ty)))
                }
            }
        )*
    };
}

impl_from_value_for_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Float(x) => Ok(x),
            Value::Int(i) => Ok(i as f64),
            other => Err(ConvertError::mismatch("float", &other)),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        f64::from_value(value).map(|x| x as f32)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn from_missing() -> Option<Self> {
        Some(None)
    }
}
