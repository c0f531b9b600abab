mod connection;
mod drivers;

pub use connection::Connection;
pub use porm_query::{FromValue, Value};

pub mod driver {
    #[cfg(feature = "mysql")]
    pub use crate::drivers::mysql::MysqlConnProxy;
    #[cfg(feature = "mysql")]
    pub use mysql_lib;
}

use porm_error::Result;

/// Backend a [`Connection`] runs rendered SQL text through
pub trait Driver: Sync + Send {
    /// Run a query and collect every row
    fn query(&self, sql: &str) -> Result<Vec<Row>>;
    /// Run a statement, return affected row count
    fn execute(&self, sql: &str) -> Result<u64>;
    /// Run all statements in one transaction
    fn execute_many(&self, sqls: &[String]) -> Result<()>;
    /// Run an insert, return the generated identifier
    fn insert(&self, sql: &str) -> Result<Value>;
}

/// One result row, columns keep the order the driver returned them in
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: ToString,
    {
        let (columns, values) = pairs
            .into_iter()
            .map(|(c, v)| (c.to_string(), v))
            .unzip();

        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Look a value up by column name
    ///
    /// A table qualified name such as `user.id` also matches a bare `id`
    /// column, since servers label result columns without their table.
    ///
    /// # Examples
    ///
    /// ```
    /// use porm_conn::{Row, Value};
    ///
    /// let row = Row::from_pairs([("id", Value::Int(1))]);
    ///
    /// assert_eq!(row.get_value("id").unwrap(), &Value::Int(1));
    /// assert_eq!(row.get_value("user.id").unwrap(), &Value::Int(1));
    /// assert!(row.get_value("name").is_err());
    /// ```
    pub fn get_value(&self, name: &str) -> Result<&Value> {
        let bare = name.rsplit('.').next().unwrap_or(name);

        self.position(name)
            .or_else(|| self.position(bare))
            .and_then(|i| self.values.get(i))
            .ok_or_else(|| {
                porm_error::out_of_range!(
                    "Column `{}` not found, columns: {:?}",
                    name,
                    self.columns
                )
            })
    }

    pub fn get_index(&self, index: usize) -> Result<&Value> {
        self.values.get(index).ok_or_else(|| {
            porm_error::out_of_range!(
                "Index out of range: index: {}, values length: {}",
                index,
                self.values.len()
            )
        })
    }

    pub fn get<T: FromValue>(&self, name: &str) -> Result<T> {
        T::from_value(self.get_value(name)?)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_row_get() {
        let row = Row::from_pairs([
            ("id", Value::UInt(3)),
            ("name", Value::Str("bob".into())),
            ("email", Value::Null),
        ]);

        assert_eq!(row.len(), 3);
        assert_eq!(row.get::<u32>("id").unwrap(), 3);
        assert_eq!(row.get::<String>("user.name").unwrap(), "bob");
        assert_eq!(row.get::<Option<String>>("email").unwrap(), None);
        assert_eq!(row.get_index(1).unwrap(), &Value::Str("bob".into()));
        assert!(row.get_index(3).is_err());
    }

    #[test]
    fn test_qualified_exact_match_wins() {
        let row = Row::new(
            vec!["id".into(), "address.id".into()],
            vec![Value::Int(1), Value::Int(2)],
        );

        assert_eq!(row.get::<i64>("address.id").unwrap(), 2);
        assert_eq!(row.get::<i64>("user.id").unwrap(), 1);
    }
}
