use std::fmt;

use porm_error::Result;

use crate::{validate::Violations, Conditional};

const PREAMBLE: &str = "Failed to build SELECT statement:";

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    distinct: bool,
    columns: Vec<String>,
    tables: Vec<String>,
    where_cond: Option<Conditional>,
    order_bys: Vec<(String, bool)>, // (column, is_asc)
    limit: Option<(u64, u64)>,      // (limit, offset)
}

impl Select {
    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// Return columns, empty means `*`
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn where_cond(&self) -> Option<&Conditional> {
        self.where_cond.as_ref()
    }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::<String>::new();

        // Build prefix
        parts.push("SELECT".into());
        if self.distinct {
            parts.push("DISTINCT".into());
        }

        // Build columns
        if self.columns.is_empty() {
            parts.push("*".into());
        } else {
            parts.push(self.columns.join(", "));
        }

        // Build tables
        parts.push("FROM".into());
        parts.push(self.tables.join(", "));

        // Build where
        if let Some(cond) = &self.where_cond {
            parts.push("WHERE".into());
            parts.push(cond.to_string());
        }

        // Build order by
        if !self.order_bys.is_empty() {
            parts.push("ORDER BY".into());
            parts.push(
                self.order_bys
                    .iter()
                    .map(|(name, is_asc)| {
                        format!("{} {}", name, if *is_asc { "ASC" } else { "DESC" })
                    })
                    .collect::<Vec<_>>()
                    .join(", "),
            );
        }

        // Build limit
        if let Some((limit, offset)) = self.limit {
            parts.push(format!("LIMIT {}", limit));
            if offset > 0 {
                parts.push(format!("OFFSET {}", offset));
            }
        }

        write!(f, "{}", parts.join(" "))
    }
}

/// First stage holds the return columns, `FROM` comes next
#[derive(Debug)]
pub struct SelectFromStage {
    columns: Vec<String>,
}

impl SelectFromStage {
    pub(crate) fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Set from tables
    ///
    /// # Examples
    ///
    /// ```
    /// use porm_query::{QueryBuilder, eq};
    ///
    /// let sql = QueryBuilder::select(["a", "b"])
    ///     .from(["ta", "tb"])
    ///     .where_cond(eq!("ta.a", 1))
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(&sql.to_string(), "SELECT a, b FROM ta, tb WHERE ta.a = 1");
    /// ```
    pub fn from<T, S>(self, tables: T) -> SelectBuilder
    where
        T: IntoIterator<Item = S>,
        S: ToString,
    {
        SelectBuilder {
            distinct: false,
            columns: self.columns,
            tables: tables.into_iter().map(|t| t.to_string()).collect(),
            where_cond: None,
            order_bys: vec![],
            limit: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectBuilder {
    distinct: bool,
    columns: Vec<String>,
    tables: Vec<String>,
    where_cond: Option<Conditional>,
    order_bys: Vec<(String, bool)>,
    limit: Option<(u64, u64)>,
}

impl SelectBuilder {
    /// Set distinct flag
    ///
    /// # Examples
    ///
    /// ```
    /// use porm_query::QueryBuilder;
    ///
    /// let sql = QueryBuilder::select_all().from(["ta"]).distinct().build().unwrap();
    ///
    /// assert_eq!(&sql.to_string(), "SELECT DISTINCT * FROM ta");
    /// ```
    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    /// Append from table
    pub fn from_table<S: ToString>(&mut self, table: S) -> &mut Self {
        self.tables.push(table.to_string());
        self
    }

    pub fn where_cond(&mut self, cond: Conditional) -> &mut Self {
        self.where_cond = Some(cond);
        self
    }

    /// Append order by
    ///
    /// # Examples
    ///
    /// ```
    /// use porm_query::QueryBuilder;
    ///
    /// let sql = QueryBuilder::select(["a"])
    ///     .from(["ta"])
    ///     .order_by("a", true)
    ///     .order_by("b", false)
    ///     .limit(10, 20)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(&sql.to_string(), "SELECT a FROM ta ORDER BY a ASC, b DESC LIMIT 10 OFFSET 20");
    /// ```
    pub fn order_by<S: ToString>(&mut self, col: S, is_asc: bool) -> &mut Self {
        self.order_bys.push((col.to_string(), is_asc));
        self
    }

    pub fn limit(&mut self, limit: u64, offset: u64) -> &mut Self {
        self.limit = Some((limit, offset));
        self
    }

    /// Build statement
    pub fn build(&self) -> Result<Select> {
        // Validate builder
        self.validate()?;

        Ok(Select {
            distinct: self.distinct,
            columns: self.columns.clone(),
            tables: self.tables.clone(),
            where_cond: self.where_cond.clone(),
            order_bys: self.order_bys.clone(),
            limit: self.limit,
        })
    }

    /// Validate builder
    fn validate(&self) -> Result<()> {
        let mut v = Violations::new(PREAMBLE);

        v.check(self.tables.is_empty(), || {
            "at least one from-table is required".into()
        });
        for table in &self.tables {
            v.require_name(table, "from-table name");
        }
        for col in &self.columns {
            v.require_name(col, "return column name");
        }
        for (col, _) in &self.order_bys {
            v.require_name(col, "order by column name");
        }

        v.finish()
    }
}

#[cfg(test)]
mod test {
    use crate::*;

    #[test]
    fn test_select() {
        let sql = QueryBuilder::select_all().from(["user"]).build().unwrap();
        assert_eq!(&sql.to_string(), "SELECT * FROM user");

        let sql = QueryBuilder::select(["user.id", "user.name"])
            .from(["user"])
            .from_table("address")
            .where_cond(Conditional::and(
                eq!("user.name", "bob"),
                ConditionalStatement::builder("user.address_id")
                    .operator(ComparisonOperator::Eq)
                    .column("address.id")
                    .build()
                    .unwrap(),
            ))
            .build()
            .unwrap();
        assert_eq!(
            &sql.to_string(),
            "SELECT user.id, user.name FROM user, address WHERE user.name = 'bob' AND user.address_id = address.id"
        );
        assert_eq!(sql.to_string(), sql.to_string());
        assert_eq!(sql.tables(), &["user".to_string(), "address".to_string()]);
    }

    #[test]
    fn test_limit_without_offset() {
        let sql = QueryBuilder::select_all().from(["t"]).limit(1, 0).build().unwrap();
        assert_eq!(&sql.to_string(), "SELECT * FROM t LIMIT 1");
    }

    #[test]
    fn test_requires_table() {
        let err = QueryBuilder::select(["a", " "])
            .from(Vec::<String>::new())
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to build SELECT statement:\n  - at least one from-table is required\n  - return column name must not be blank"
        );
    }
}
