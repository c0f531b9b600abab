use std::fmt;

use porm_error::Result;

use crate::{validate::Violations, Conditional, Value};

const PREAMBLE: &str = "Failed to build UPDATE statement:";

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    table: String,
    kvs: Vec<(String, Value)>,
    where_cond: Option<Conditional>,
}

impl Update {
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn assignments(&self) -> &[(String, Value)] {
        &self.kvs
    }

    pub fn where_cond(&self) -> Option<&Conditional> {
        self.where_cond.as_ref()
    }
}

impl fmt::Display for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::<String>::new();

        // Build prefix
        parts.push("UPDATE".into());
        parts.push(self.table.clone());

        // Build kvs
        parts.push("SET".into());
        parts.push(
            self.kvs
                .iter()
                .map(|(k, v)| format!("{} = {}", k, v))
                .collect::<Vec<_>>()
                .join(", "),
        );

        // Build where
        if let Some(cond) = &self.where_cond {
            parts.push("WHERE".into());
            parts.push(cond.to_string());
        }

        write!(f, "{}", parts.join(" "))
    }
}

/// First stage: at least one assignment is required
#[derive(Debug)]
pub struct UpdateSetStage {
    table: String,
}

impl UpdateSetStage {
    pub(crate) fn new(table: String) -> Self {
        Self { table }
    }

    /// Append kv pair
    ///
    /// # Examples
    ///
    /// ```
    /// use porm_query::{QueryBuilder, eq, sql_str};
    ///
    /// let sql = QueryBuilder::update("ta")
    ///     .set("a", 1)
    ///     .set("b", sql_str("abc"))
    ///     .where_cond(eq!("id", 3))
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(&sql.to_string(), "UPDATE ta SET a = 1, b = 'abc' WHERE id = 3");
    /// ```
    pub fn set<S, V>(self, col: S, val: V) -> UpdateBuilder
    where
        S: ToString,
        V: Into<Value>,
    {
        UpdateBuilder {
            table: self.table,
            kvs: vec![(col.to_string(), val.into())],
            where_cond: None,
        }
    }

    /// Set kv pair list
    pub fn sets<T, S>(self, kvs: T) -> UpdateBuilder
    where
        T: IntoIterator<Item = (S, Value)>,
        S: ToString,
    {
        UpdateBuilder {
            table: self.table,
            kvs: kvs.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            where_cond: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    table: String,
    kvs: Vec<(String, Value)>,
    where_cond: Option<Conditional>,
}

impl UpdateBuilder {
    pub fn set<S, V>(&mut self, col: S, val: V) -> &mut Self
    where
        S: ToString,
        V: Into<Value>,
    {
        self.kvs.push((col.to_string(), val.into()));
        self
    }

    pub fn where_cond(&mut self, cond: Conditional) -> &mut Self {
        self.where_cond = Some(cond);
        self
    }

    /// Build statement
    pub fn build(&self) -> Result<Update> {
        // Validate builder
        self.validate()?;

        Ok(Update {
            table: self.table.clone(),
            kvs: self.kvs.clone(),
            where_cond: self.where_cond.clone(),
        })
    }

    /// Validate builder
    fn validate(&self) -> Result<()> {
        let mut v = Violations::new(PREAMBLE);

        v.require_name(&self.table, "table name");
        v.check(self.kvs.is_empty(), || {
            "at least one assignment is required".into()
        });
        for (col, _) in &self.kvs {
            v.require_name(col, "assigned column name");
        }

        v.finish()
    }
}

#[cfg(test)]
mod test {
    use crate::*;

    #[test]
    fn test_update() {
        let sql = QueryBuilder::update("user")
            .sets([("name", sql_str("bob")), ("age", Value::Null)])
            .build()
            .unwrap();
        assert_eq!(&sql.to_string(), "UPDATE user SET name = 'bob', age = NULL");
    }

    #[test]
    fn test_violations() {
        let err = QueryBuilder::update(" ")
            .sets(Vec::<(String, Value)>::new())
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to build UPDATE statement:\n  - table name must not be blank\n  - at least one assignment is required"
        );
    }
}
