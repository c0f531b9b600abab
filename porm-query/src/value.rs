use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use porm_error::Result;
use rust_decimal::Decimal;

macro_rules! impl_from_for_signedint {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::Int(v as i64)
                }
            }
        )+
    };
}

macro_rules! impl_from_for_unsignedint {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::UInt(v as u64)
                }
            }
        )+
    };
}

macro_rules! impl_from_for_float {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::Float(v as f64)
                }
            }
        )+
    };
}

macro_rules! impl_from_for_base {
    ($ty:ty, $enum_field:ident) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Self::$enum_field(v)
            }
        }
    };
}

macro_rules! impl_from_value_integer {
    ($ty:ty) => {
        impl FromValue for $ty {
            fn from_value(v: &Value) -> Result<Self> {
                match v {
                    Value::Int(n) => <$ty>::try_from(*n).map_err(|_| {
                        porm_error::out_of_range!("{} does not fit {}", n, stringify!($ty))
                    }),
                    Value::UInt(n) => <$ty>::try_from(*n).map_err(|_| {
                        porm_error::out_of_range!("{} does not fit {}", n, stringify!($ty))
                    }),
                    _ => Err(porm_error::from_value!(
                        "Invalid value: {:?}, output type: {}",
                        v,
                        stringify!($ty)
                    )),
                }
            }
        }
    };
}

macro_rules! impl_from_value_base {
    ($ty:ty, $enum_field:ident) => {
        impl FromValue for $ty {
            fn from_value(v: &Value) -> Result<Self> {
                match v {
                    Value::$enum_field(v) => Ok(v.clone()),
                    _ => Err(porm_error::from_value!(
                        "Invalid value: {:?}, output type: {}",
                        v,
                        stringify!($ty)
                    )),
                }
            }
        }
    };
}

/// A literal as it is stored in a pojo, rendered into statements and read
/// back from rows
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Decimal(Decimal),
    Str(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Textual content of string-like values, used when coercing driver output
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s.clone()),
            Self::Bytes(b) => String::from_utf8(b.clone()).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::UInt(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Decimal(v) => write!(f, "{}", v),
            Self::Str(v) => write!(f, "'{}'", v),
            Self::Bytes(v) => {
                write!(f, "X'")?;
                for b in v {
                    write!(f, "{:02X}", b)?;
                }
                write!(f, "'")
            }
            Self::Date(v) => write!(f, "'{}'", v),
            Self::Time(v) => write!(f, "'{}'", v),
            Self::DateTime(v) => write!(f, "'{}'", v),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

impl_from_for_signedint! {i8, i16, i32, i64}
impl_from_for_unsignedint! {u8, u16, u32, u64}
impl_from_for_float! {f32, f64}
impl_from_for_base! {bool, Bool}
impl_from_for_base! {Decimal, Decimal}
impl_from_for_base! {String, Str}
impl_from_for_base! {Vec<u8>, Bytes}
impl_from_for_base! {NaiveDate, Date}
impl_from_for_base! {NaiveTime, Time}
impl_from_for_base! {NaiveDateTime, DateTime}

/// Shortcut for a quoted string literal
pub fn sql_str(v: impl ToString) -> Value {
    Value::Str(v.to_string())
}

pub trait FromValue: Sized {
    fn from_value(v: &Value) -> Result<Self>;
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(v: &Value) -> Result<Self> {
        match v {
            Value::Null => Ok(None),
            _ => Ok(Some(T::from_value(v)?)),
        }
    }
}

impl FromValue for bool {
    fn from_value(v: &Value) -> Result<Self> {
        match v {
            Value::Bool(v) => Ok(*v),
            Value::Int(v) => Ok(*v != 0),
            Value::UInt(v) => Ok(*v != 0),
            _ => Err(porm_error::from_value!(
                "Invalid value: {:?}, output type: bool",
                v
            )),
        }
    }
}

impl FromValue for f64 {
    fn from_value(v: &Value) -> Result<Self> {
        match v {
            Value::Float(v) => Ok(*v),
            Value::Int(v) => Ok(*v as f64),
            Value::UInt(v) => Ok(*v as f64),
            _ => Err(porm_error::from_value!(
                "Invalid value: {:?}, output type: f64",
                v
            )),
        }
    }
}

impl FromValue for Value {
    fn from_value(v: &Value) -> Result<Self> {
        Ok(v.clone())
    }
}

impl_from_value_integer! {u8}
impl_from_value_integer! {i8}
impl_from_value_integer! {u16}
impl_from_value_integer! {i16}
impl_from_value_integer! {u32}
impl_from_value_integer! {i32}
impl_from_value_integer! {u64}
impl_from_value_integer! {i64}

impl_from_value_base! {String, Str}
impl_from_value_base! {Vec<u8>, Bytes}
impl_from_value_base! {Decimal, Decimal}
impl_from_value_base! {NaiveDate, Date}
impl_from_value_base! {NaiveTime, Time}
impl_from_value_base! {NaiveDateTime, DateTime}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_render() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(-3i32).to_string(), "-3");
        assert_eq!(Value::from(7u8).to_string(), "7");
        assert_eq!(Value::from(1.5f64).to_string(), "1.5");
        assert_eq!(Value::from("abc").to_string(), "'abc'");
        assert_eq!(sql_str(12).to_string(), "'12'");
        assert_eq!(Value::from(vec![0x0au8, 0xff]).to_string(), "X'0AFF'");
        assert_eq!(Value::from(None::<i32>).to_string(), "NULL");

        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(Value::from(date).to_string(), "'2024-02-29'");
        let dt = date.and_hms_opt(13, 4, 5).unwrap();
        assert_eq!(Value::from(dt).to_string(), "'2024-02-29 13:04:05'");
    }

    #[test]
    fn test_from_value() {
        assert_eq!(u32::from_value(&Value::Int(5)), Ok(5));
        assert_eq!(i64::from_value(&Value::UInt(5)), Ok(5));
        assert!(u8::from_value(&Value::Int(300)).is_err());
        assert!(u8::from_value(&Value::Str("1".into())).is_err());
        assert_eq!(bool::from_value(&Value::Int(1)), Ok(true));
        assert_eq!(
            Option::<String>::from_value(&Value::Null),
            Ok(None)
        );
        assert_eq!(
            String::from_value(&Value::Str("x".into())),
            Ok("x".to_string())
        );
    }
}
