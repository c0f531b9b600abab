use std::fmt;

use porm_error::Result;

use crate::{validate::Violations, Value};

const PREAMBLE: &str = "Failed to build INSERT statement:";

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    table: String,
    columns: Option<Vec<String>>,
    values: Vec<Value>,
}

impl Insert {
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl fmt::Display for Insert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::<String>::new();

        // Build prefix
        parts.push(format!("INSERT INTO {}", self.table));

        // Build columns
        if let Some(cols) = &self.columns {
            parts.push(format!("({})", cols.join(", ")));
        }

        // Build values
        parts.push("VALUES".into());
        parts.push(format!(
            "({})",
            self.values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ));

        write!(f, "{}", parts.join(" "))
    }
}

/// First stage: optional column list, then values
#[derive(Debug)]
pub struct InsertColumnsStage {
    table: String,
}

impl InsertColumnsStage {
    pub(crate) fn new(table: String) -> Self {
        Self { table }
    }

    /// Set columns
    ///
    /// # Examples
    ///
    /// ```
    /// use porm_query::{QueryBuilder, sql_str};
    ///
    /// let sql = QueryBuilder::insert("ta")
    ///     .columns(["a", "b", "c"])
    ///     .values([1.into(), 2.into(), sql_str("abc")])
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(&sql.to_string(), "INSERT INTO ta (a, b, c) VALUES (1, 2, 'abc')");
    /// ```
    pub fn columns<T, S>(self, cols: T) -> InsertValuesStage
    where
        T: IntoIterator<Item = S>,
        S: ToString,
    {
        InsertValuesStage {
            table: self.table,
            columns: cols.into_iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Set values without naming columns
    ///
    /// # Examples
    ///
    /// ```
    /// use porm_query::QueryBuilder;
    ///
    /// let sql = QueryBuilder::insert("ta").values([1.into(), true.into()]).build().unwrap();
    ///
    /// assert_eq!(&sql.to_string(), "INSERT INTO ta VALUES (1, true)");
    /// ```
    pub fn values<T>(self, values: T) -> InsertBuilder
    where
        T: IntoIterator<Item = Value>,
    {
        InsertBuilder {
            table: self.table,
            columns: None,
            values: values.into_iter().collect(),
        }
    }
}

#[derive(Debug)]
pub struct InsertValuesStage {
    table: String,
    columns: Vec<String>,
}

impl InsertValuesStage {
    pub fn values<T>(self, values: T) -> InsertBuilder
    where
        T: IntoIterator<Item = Value>,
    {
        InsertBuilder {
            table: self.table,
            columns: Some(self.columns),
            values: values.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InsertBuilder {
    table: String,
    columns: Option<Vec<String>>,
    values: Vec<Value>,
}

impl InsertBuilder {
    /// Build statement
    pub fn build(&self) -> Result<Insert> {
        // Validate builder
        self.validate()?;

        Ok(Insert {
            table: self.table.clone(),
            columns: self.columns.clone(),
            values: self.values.clone(),
        })
    }

    /// Validate builder
    fn validate(&self) -> Result<()> {
        let mut v = Violations::new(PREAMBLE);

        v.require_name(&self.table, "table name");
        v.check(self.values.is_empty(), || "values must not be empty".into());

        if let Some(cols) = &self.columns {
            v.check(cols.is_empty(), || {
                "column list must not be empty when given".into()
            });
            v.check(!cols.is_empty() && cols.len() != self.values.len(), || {
                format!(
                    "column count {} does not match value count {}",
                    cols.len(),
                    self.values.len()
                )
            });
            for col in cols {
                v.require_name(col, "column name");
            }
        }

        v.finish()
    }
}

#[cfg(test)]
mod test {
    use crate::*;

    #[test]
    fn test_insert() {
        let sql = QueryBuilder::insert("user")
            .columns(["name", "age"])
            .values([sql_str("bob"), Value::Null])
            .build()
            .unwrap();
        assert_eq!(&sql.to_string(), "INSERT INTO user (name, age) VALUES ('bob', NULL)");
    }

    #[test]
    fn test_mismatch() {
        let err = QueryBuilder::insert("user")
            .columns(["a", "b"])
            .values([1.into()])
            .build()
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("column count 2 does not match value count 1"));
    }

    #[test]
    fn test_all_violations() {
        let err = QueryBuilder::insert("")
            .columns(Vec::<String>::new())
            .values(Vec::new())
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to build INSERT statement:\n  - table name must not be blank\n  - values must not be empty\n  - column list must not be empty when given"
        );
    }
}
