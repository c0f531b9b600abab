//! # Column definition
//!
//! A column is declared through a staged builder: the name comes first, then a
//! data type selector which decides which optional parameter (size, digits,
//! precision or enumerated values) can be set at all.
//!
//! ```
//! use porm_query::ColumnDefinition;
//!
//! let id = ColumnDefinition::builder("id")
//!     .integer()
//!     .size(10)
//!     .not_null()
//!     .auto_increment()
//!     .primary_key()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(&id.to_string(), "id INTEGER(10) NOT NULL AUTO_INCREMENT PRIMARY KEY");
//! ```

use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use porm_error::Result;
use rust_decimal::{
    prelude::{FromPrimitive, ToPrimitive},
    Decimal,
};

use crate::{validate::Violations, Value};

const PREAMBLE: &str = "Failed to build column definition:";

const MAX_DECIMAL_DIGITS: u64 = 65;
const MAX_FRACTIONAL_DIGITS: u64 = 30;
const MAX_FLOAT_DIGITS: u64 = 255;
const MAX_PRECISION: u64 = 6;
const MAX_ENUM_VALUES: u64 = 65_535;
const MAX_SET_VALUES: u64 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    // String and binary
    Char,
    Varchar,
    Binary,
    Varbinary,
    TinyBlob,
    TinyText,
    Text,
    Blob,
    MediumText,
    MediumBlob,
    LongText,
    LongBlob,
    Enum,
    Set,
    // Numeric
    Bit,
    TinyInt,
    Boolean,
    SmallInt,
    MediumInt,
    Int,
    Integer,
    BigInt,
    Float,
    Double,
    Decimal,
    // Temporal
    Date,
    DateTime,
    Timestamp,
    Time,
    Year,
}

/// The kind of value a column of a given type holds once read back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Text,
    Binary,
    Bits,
    Integer,
    Boolean,
    Float,
    Decimal,
    Date,
    DateTime,
    Time,
    Year,
}

impl DataType {
    pub fn sql_name(&self) -> &'static str {
        match self {
            Self::Char => "CHAR",
            Self::Varchar => "VARCHAR",
            Self::Binary => "BINARY",
            Self::Varbinary => "VARBINARY",
            Self::TinyBlob => "TINYBLOB",
            Self::TinyText => "TINYTEXT",
            Self::Text => "TEXT",
            Self::Blob => "BLOB",
            Self::MediumText => "MEDIUMTEXT",
            Self::MediumBlob => "MEDIUMBLOB",
            Self::LongText => "LONGTEXT",
            Self::LongBlob => "LONGBLOB",
            Self::Enum => "ENUM",
            Self::Set => "SET",
            Self::Bit => "BIT",
            Self::TinyInt => "TINYINT",
            Self::Boolean => "BOOLEAN",
            Self::SmallInt => "SMALLINT",
            Self::MediumInt => "MEDIUMINT",
            Self::Int => "INT",
            Self::Integer => "INTEGER",
            Self::BigInt => "BIGINT",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Decimal => "DECIMAL",
            Self::Date => "DATE",
            Self::DateTime => "DATETIME",
            Self::Timestamp => "TIMESTAMP",
            Self::Time => "TIME",
            Self::Year => "YEAR",
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::TinyInt
                | Self::SmallInt
                | Self::MediumInt
                | Self::Int
                | Self::Integer
                | Self::BigInt
        )
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || matches!(self, Self::Float | Self::Double | Self::Decimal)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            Self::Date | Self::DateTime | Self::Timestamp | Self::Time | Self::Year
        )
    }

    /// TEXT and BLOB families, which cannot be keyed without a prefix length
    pub fn is_large_object(&self) -> bool {
        matches!(
            self,
            Self::TinyBlob
                | Self::TinyText
                | Self::Text
                | Self::Blob
                | Self::MediumText
                | Self::MediumBlob
                | Self::LongText
                | Self::LongBlob
        )
    }

    /// Legal range of the size parameter, `None` when the type takes no size
    pub fn size_range(&self) -> Option<(u64, u64)> {
        match self {
            Self::Char | Self::Binary => Some((0, 255)),
            Self::Varchar | Self::Varbinary => Some((0, 65_535)),
            Self::Text | Self::Blob => Some((0, 4_294_967_295)),
            Self::TinyInt
            | Self::SmallInt
            | Self::MediumInt
            | Self::Int
            | Self::Integer
            | Self::BigInt => Some((1, 255)),
            Self::Bit => Some((1, 64)),
            Self::Decimal => Some((1, MAX_DECIMAL_DIGITS)),
            Self::Float | Self::Double => Some((1, MAX_FLOAT_DIGITS)),
            _ => None,
        }
    }

    fn value_kind(&self) -> ValueKind {
        match self {
            Self::Char
            | Self::Varchar
            | Self::TinyText
            | Self::Text
            | Self::MediumText
            | Self::LongText
            | Self::Enum
            | Self::Set => ValueKind::Text,
            Self::Binary
            | Self::Varbinary
            | Self::TinyBlob
            | Self::Blob
            | Self::MediumBlob
            | Self::LongBlob => ValueKind::Binary,
            Self::Bit => ValueKind::Bits,
            Self::TinyInt
            | Self::SmallInt
            | Self::MediumInt
            | Self::Int
            | Self::Integer
            | Self::BigInt => ValueKind::Integer,
            Self::Boolean => ValueKind::Boolean,
            Self::Float | Self::Double => ValueKind::Float,
            Self::Decimal => ValueKind::Decimal,
            Self::Date => ValueKind::Date,
            Self::DateTime | Self::Timestamp => ValueKind::DateTime,
            Self::Time => ValueKind::Time,
            Self::Year => ValueKind::Year,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql_name())
    }
}

/// An immutable, validated column descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    name: String,
    data_type: DataType,
    size: Option<u64>,
    digits: Option<u64>,
    precision: Option<u64>,
    values: Vec<String>,
    not_null: bool,
    unsigned: bool,
    auto_increment: bool,
    primary_key: bool,
}

impl ColumnDefinition {
    /// Start a column declaration, the data type is chosen next
    pub fn builder<S: ToString>(name: S) -> ColumnTypeStage {
        ColumnTypeStage {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn digits(&self) -> Option<u64> {
        self.digits
    }

    pub fn precision(&self) -> Option<u64> {
        self.precision
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn is_not_null(&self) -> bool {
        self.not_null
    }

    pub fn is_unsigned(&self) -> bool {
        self.unsigned
    }

    pub fn is_auto_increment(&self) -> bool {
        self.auto_increment
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// Coerce a raw value handed back by a driver into the value kind this
    /// column stores
    ///
    /// # Examples
    ///
    /// ```
    /// use porm_query::{ColumnDefinition, Value};
    ///
    /// let age = ColumnDefinition::builder("age").int().build().unwrap();
    ///
    /// assert_eq!(age.read_value(&Value::Bytes(b"42".to_vec())).unwrap(), Value::Int(42));
    /// assert_eq!(age.read_value(&Value::Null).unwrap(), Value::Null);
    /// ```
    pub fn read_value(&self, raw: &Value) -> Result<Value> {
        if raw.is_null() {
            return Ok(Value::Null);
        }

        let fail = || {
            porm_error::from_value!(
                "Cannot read {:?} as {} for column `{}`",
                raw,
                self.data_type,
                self.name
            )
        };
        let text = || raw.as_text().ok_or_else(fail);
        let token = || text().map(|s| s.trim().to_string());

        let value = match self.data_type.value_kind() {
            ValueKind::Text => match raw {
                Value::Str(_) => raw.clone(),
                Value::Bytes(_) => Value::Str(text()?),
                Value::Int(_) | Value::UInt(_) | Value::Float(_) | Value::Decimal(_) => {
                    Value::Str(raw.to_string())
                }
                _ => return Err(fail()),
            },
            ValueKind::Binary => match raw {
                Value::Bytes(_) => raw.clone(),
                Value::Str(s) => Value::Bytes(s.clone().into_bytes()),
                _ => return Err(fail()),
            },
            ValueKind::Bits => match raw {
                Value::UInt(_) => raw.clone(),
                Value::Int(v) => Value::UInt(u64::try_from(*v).map_err(|_| fail())?),
                Value::Bool(v) => Value::UInt(*v as u64),
                Value::Bytes(bytes) if bytes.len() <= 8 => {
                    Value::UInt(bytes.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64))
                }
                _ => return Err(fail()),
            },
            ValueKind::Integer => match raw {
                Value::Int(v) if self.unsigned && *v >= 0 => Value::UInt(*v as u64),
                Value::Int(_) => raw.clone(),
                Value::UInt(v) if !self.unsigned => {
                    Value::Int(i64::try_from(*v).map_err(|_| {
                        porm_error::out_of_range!("{} overflows column `{}`", v, self.name)
                    })?)
                }
                Value::UInt(_) => raw.clone(),
                Value::Bool(v) => Value::Int(*v as i64),
                Value::Str(_) | Value::Bytes(_) => {
                    let s = token()?;
                    if self.unsigned {
                        Value::UInt(s.parse().map_err(|_| fail())?)
                    } else {
                        Value::Int(s.parse().map_err(|_| fail())?)
                    }
                }
                _ => return Err(fail()),
            },
            ValueKind::Boolean => match raw {
                Value::Bool(_) => raw.clone(),
                Value::Int(v) => Value::Bool(*v != 0),
                Value::UInt(v) => Value::Bool(*v != 0),
                Value::Str(_) | Value::Bytes(_) => match token()?.to_ascii_lowercase().as_str() {
                    "1" | "true" => Value::Bool(true),
                    "0" | "false" => Value::Bool(false),
                    _ => return Err(fail()),
                },
                _ => return Err(fail()),
            },
            ValueKind::Float => match raw {
                Value::Float(_) => raw.clone(),
                Value::Int(v) => Value::Float(*v as f64),
                Value::UInt(v) => Value::Float(*v as f64),
                Value::Decimal(v) => Value::Float(v.to_f64().ok_or_else(fail)?),
                Value::Str(_) | Value::Bytes(_) => {
                    Value::Float(token()?.parse().map_err(|_| fail())?)
                }
                _ => return Err(fail()),
            },
            ValueKind::Decimal => match raw {
                Value::Decimal(_) => raw.clone(),
                Value::Int(v) => Value::Decimal(Decimal::from(*v)),
                Value::UInt(v) => Value::Decimal(Decimal::from(*v)),
                Value::Float(v) => Value::Decimal(Decimal::from_f64(*v).ok_or_else(fail)?),
                Value::Str(_) | Value::Bytes(_) => {
                    Value::Decimal(Decimal::from_str(&token()?).map_err(|_| fail())?)
                }
                _ => return Err(fail()),
            },
            ValueKind::Date => match raw {
                Value::Date(_) => raw.clone(),
                Value::DateTime(v) => Value::Date(v.date()),
                Value::Str(_) | Value::Bytes(_) => Value::Date(
                    NaiveDate::parse_from_str(&token()?, "%Y-%m-%d").map_err(|_| fail())?,
                ),
                _ => return Err(fail()),
            },
            ValueKind::DateTime => match raw {
                Value::DateTime(_) => raw.clone(),
                Value::Date(v) => Value::DateTime(v.and_hms_opt(0, 0, 0).ok_or_else(fail)?),
                Value::Str(_) | Value::Bytes(_) => Value::DateTime(
                    NaiveDateTime::parse_from_str(&token()?, "%Y-%m-%d %H:%M:%S%.f")
                        .map_err(|_| fail())?,
                ),
                _ => return Err(fail()),
            },
            ValueKind::Time => match raw {
                Value::Time(_) => raw.clone(),
                Value::DateTime(v) => Value::Time(v.time()),
                Value::Str(_) | Value::Bytes(_) => Value::Time(
                    NaiveTime::parse_from_str(&token()?, "%H:%M:%S%.f").map_err(|_| fail())?,
                ),
                _ => return Err(fail()),
            },
            ValueKind::Year => match raw {
                Value::Int(_) => raw.clone(),
                Value::UInt(v) => Value::Int(*v as i64),
                Value::Date(v) => Value::Int(chrono::Datelike::year(v) as i64),
                Value::Str(_) | Value::Bytes(_) => {
                    Value::Int(token()?.parse().map_err(|_| fail())?)
                }
                _ => return Err(fail()),
            },
        };

        Ok(value)
    }
}

impl fmt::Display for ColumnDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;

        if !self.values.is_empty() {
            let list = self
                .values
                .iter()
                .map(|v| format!("'{}'", v))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "({})", list)?;
        } else if let Some(precision) = self.precision {
            write!(f, "({})", precision)?;
        } else if let Some(size) = self.size {
            match self.digits {
                Some(digits) => write!(f, "({}, {})", size, digits)?,
                None => write!(f, "({})", size)?,
            }
        }

        if self.not_null {
            write!(f, " NOT NULL")?;
        }
        if self.unsigned {
            write!(f, " UNSIGNED")?;
        }
        if self.auto_increment {
            write!(f, " AUTO_INCREMENT")?;
        }
        if self.primary_key {
            write!(f, " PRIMARY KEY")?;
        }

        Ok(())
    }
}

/// Second stage: pick the data type
#[derive(Debug)]
pub struct ColumnTypeStage {
    name: String,
}

macro_rules! impl_type_selectors {
    ($stage:ident => $($fn_name:ident: $ty:ident),+ $(,)?) => {
        $(
            pub fn $fn_name(self) -> $stage {
                $stage::from(ColumnBuilder::new(self.name, DataType::$ty))
            }
        )+
    };
}

impl ColumnTypeStage {
    impl_type_selectors! { SizedColumnBuilder =>
        char: Char,
        varchar: Varchar,
        binary: Binary,
        varbinary: Varbinary,
        text: Text,
        blob: Blob,
        bit: Bit,
        tiny_int: TinyInt,
        small_int: SmallInt,
        medium_int: MediumInt,
        int: Int,
        integer: Integer,
        big_int: BigInt,
    }

    impl_type_selectors! { DigitsColumnBuilder =>
        float: Float,
        double: Double,
        decimal: Decimal,
    }

    impl_type_selectors! { PrecisionColumnBuilder =>
        date_time: DateTime,
        timestamp: Timestamp,
        time: Time,
    }

    impl_type_selectors! { ColumnBuilder =>
        tiny_text: TinyText,
        medium_text: MediumText,
        long_text: LongText,
        tiny_blob: TinyBlob,
        medium_blob: MediumBlob,
        long_blob: LongBlob,
        boolean: Boolean,
        date: Date,
        year: Year,
    }

    /// `ENUM` column holding one of `values`
    pub fn enumeration<T, S>(self, values: T) -> ColumnBuilder
    where
        T: IntoIterator<Item = S>,
        S: ToString,
    {
        let mut builder = ColumnBuilder::new(self.name, DataType::Enum);
        builder.values = values.into_iter().map(|v| v.to_string()).collect();
        builder
    }

    /// `SET` column holding any subset of `values`
    pub fn set<T, S>(self, values: T) -> ColumnBuilder
    where
        T: IntoIterator<Item = S>,
        S: ToString,
    {
        let mut builder = ColumnBuilder::new(self.name, DataType::Set);
        builder.values = values.into_iter().map(|v| v.to_string()).collect();
        builder
    }
}

/// Final stage shared by every data type
#[derive(Debug, Clone)]
pub struct ColumnBuilder {
    name: String,
    data_type: DataType,
    size: Option<u64>,
    digits: Option<u64>,
    precision: Option<u64>,
    values: Vec<String>,
    not_null: bool,
    unsigned: bool,
    auto_increment: bool,
    primary_key: bool,
}

impl ColumnBuilder {
    fn new(name: String, data_type: DataType) -> Self {
        Self {
            name,
            data_type,
            size: None,
            digits: None,
            precision: None,
            values: vec![],
            not_null: false,
            unsigned: false,
            auto_increment: false,
            primary_key: false,
        }
    }

    pub fn not_null(&mut self) -> &mut Self {
        self.not_null = true;
        self
    }

    pub fn unsigned(&mut self) -> &mut Self {
        self.unsigned = true;
        self
    }

    pub fn auto_increment(&mut self) -> &mut Self {
        self.auto_increment = true;
        self
    }

    pub fn primary_key(&mut self) -> &mut Self {
        self.primary_key = true;
        self
    }

    /// Build column definition
    pub fn build(&self) -> Result<ColumnDefinition> {
        // Validate builder
        self.validate()?;

        Ok(ColumnDefinition {
            name: self.name.clone(),
            data_type: self.data_type,
            size: self.size,
            digits: self.digits,
            precision: self.precision,
            values: self.values.clone(),
            not_null: self.not_null,
            unsigned: self.unsigned,
            auto_increment: self.auto_increment,
            primary_key: self.primary_key,
        })
    }

    /// Validate builder, every violation is reported
    fn validate(&self) -> Result<()> {
        let ty = self.data_type;
        let mut v = Violations::new(PREAMBLE);

        v.require_name(&self.name, "column name");

        if let (Some(size), Some((min, max))) = (self.size, ty.size_range()) {
            v.check_range(
                size,
                min,
                max,
                &format!("size of {} column `{}`", ty, self.name),
            );
        }

        if let Some(digits) = self.digits {
            v.check_range(
                digits,
                0,
                MAX_FRACTIONAL_DIGITS,
                &format!("digits of {} column `{}`", ty, self.name),
            );
            if let Some(size) = self.size {
                v.check(digits > size, || {
                    format!(
                        "digits of {} column `{}` must not exceed its size {}, got {}",
                        ty, self.name, size, digits
                    )
                });
            }
        }

        if let Some(precision) = self.precision {
            v.check_range(
                precision,
                0,
                MAX_PRECISION,
                &format!("fractional seconds precision of {} column `{}`", ty, self.name),
            );
        }

        match ty {
            DataType::Enum => {
                v.check_range(
                    self.values.len() as u64,
                    1,
                    MAX_ENUM_VALUES,
                    &format!("value count of ENUM column `{}`", self.name),
                );
            }
            DataType::Set => {
                v.check_range(
                    self.values.len() as u64,
                    1,
                    MAX_SET_VALUES,
                    &format!("value count of SET column `{}`", self.name),
                );
            }
            _ => {}
        }
        for (i, value) in self.values.iter().enumerate() {
            v.check(crate::validate::is_blank(value), || {
                format!("value #{} of {} column `{}` must not be blank", i, ty, self.name)
            });
        }

        v.check(self.unsigned && !ty.is_numeric(), || {
            format!("UNSIGNED is not allowed on {} column `{}`", ty, self.name)
        });
        v.check(self.auto_increment && !ty.is_integer(), || {
            format!("AUTO_INCREMENT is not allowed on {} column `{}`", ty, self.name)
        });
        v.check(self.primary_key && ty.is_large_object(), || {
            format!("PRIMARY KEY is not allowed on {} column `{}`", ty, self.name)
        });

        v.finish()
    }
}

macro_rules! impl_flags_for_stage {
    ($stage:ident) => {
        impl From<ColumnBuilder> for $stage {
            fn from(inner: ColumnBuilder) -> Self {
                Self { inner }
            }
        }

        impl $stage {
            pub fn not_null(&mut self) -> &mut Self {
                self.inner.not_null();
                self
            }

            pub fn unsigned(&mut self) -> &mut Self {
                self.inner.unsigned();
                self
            }

            pub fn auto_increment(&mut self) -> &mut Self {
                self.inner.auto_increment();
                self
            }

            pub fn primary_key(&mut self) -> &mut Self {
                self.inner.primary_key();
                self
            }

            /// Build column definition
            pub fn build(&self) -> Result<ColumnDefinition> {
                self.inner.build()
            }
        }
    };
}

/// Stage for types taking a single size (length, display width or bit count)
#[derive(Debug, Clone)]
pub struct SizedColumnBuilder {
    inner: ColumnBuilder,
}

impl SizedColumnBuilder {
    pub fn size(&mut self, size: u64) -> &mut Self {
        self.inner.size = Some(size);
        self
    }
}

/// Stage for types taking total digits and fractional digits
#[derive(Debug, Clone)]
pub struct DigitsColumnBuilder {
    inner: ColumnBuilder,
}

impl DigitsColumnBuilder {
    pub fn size(&mut self, size: u64) -> &mut Self {
        self.inner.size = Some(size);
        self.inner.digits = None;
        self
    }

    pub fn size_and_digits(&mut self, size: u64, digits: u64) -> &mut Self {
        self.inner.size = Some(size);
        self.inner.digits = Some(digits);
        self
    }
}

/// Stage for temporal types taking fractional seconds precision
#[derive(Debug, Clone)]
pub struct PrecisionColumnBuilder {
    inner: ColumnBuilder,
}

impl PrecisionColumnBuilder {
    pub fn precision(&mut self, precision: u64) -> &mut Self {
        self.inner.precision = Some(precision);
        self
    }
}

impl_flags_for_stage! { SizedColumnBuilder }
impl_flags_for_stage! { DigitsColumnBuilder }
impl_flags_for_stage! { PrecisionColumnBuilder }
