pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Connection: `{0}`")]
    Connection(String),
    #[error("Database: `{0}`")]
    Database(String),
    #[error("FromValue: `{0}`")]
    FromValue(String),
    #[error("OutOfRange: `{0}`")]
    OutOfRange(String),
    /// Construction error, the message already carries the builder preamble
    /// and one line per violation
    #[error("{0}")]
    QueryBuilder(String),
    #[error("Argument: `{0}`")]
    Argument(String),
    #[error("NotFound: `{0}`")]
    NotFound(String),
    #[error("MultipleRows: `{0}`")]
    MultipleRows(String),
    #[error("Instantiate: `{0}`")]
    Instantiate(String),
}

#[macro_export]
macro_rules! connection {
    ($($arg:tt)*) => { $crate::Error::Connection(format!($($arg)*)) };
}

#[macro_export]
macro_rules! database {
    ($($arg:tt)*) => { $crate::Error::Database(format!($($arg)*)) };
}

#[macro_export]
macro_rules! from_value {
    ($($arg:tt)*) => { $crate::Error::FromValue(format!($($arg)*)) };
}

#[macro_export]
macro_rules! out_of_range {
    ($($arg:tt)*) => { $crate::Error::OutOfRange(format!($($arg)*)) };
}

#[macro_export]
macro_rules! query_builder {
    ($($arg:tt)*) => { $crate::Error::QueryBuilder(format!($($arg)*)) };
}

#[macro_export]
macro_rules! argument {
    ($($arg:tt)*) => { $crate::Error::Argument(format!($($arg)*)) };
}

#[macro_export]
macro_rules! not_found {
    ($($arg:tt)*) => { $crate::Error::NotFound(format!($($arg)*)) };
}

#[macro_export]
macro_rules! multiple_rows {
    ($($arg:tt)*) => { $crate::Error::MultipleRows(format!($($arg)*)) };
}

#[macro_export]
macro_rules! instantiate {
    ($($arg:tt)*) => { $crate::Error::Instantiate(format!($($arg)*)) };
}
