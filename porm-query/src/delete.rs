use std::fmt;

use porm_error::Result;

use crate::{validate::Violations, Conditional};

const PREAMBLE: &str = "Failed to build DELETE statement:";

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    table: String,
    where_cond: Option<Conditional>,
}

impl Delete {
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn where_cond(&self) -> Option<&Conditional> {
        self.where_cond.as_ref()
    }
}

impl fmt::Display for Delete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DELETE FROM {}", self.table)?;

        if let Some(cond) = &self.where_cond {
            write!(f, " WHERE {}", cond)?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DeleteBuilder {
    table: String,
    where_cond: Option<Conditional>,
}

impl DeleteBuilder {
    pub(crate) fn new(table: String) -> Self {
        Self {
            table,
            where_cond: None,
        }
    }

    /// Set where condition
    ///
    /// # Examples
    ///
    /// ```
    /// use porm_query::{QueryBuilder, Conditional, gt, lt};
    ///
    /// let sql = QueryBuilder::delete("ta")
    ///     .where_cond(Conditional::and(gt!("a", 1), lt!("b", 5)))
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(&sql.to_string(), "DELETE FROM ta WHERE a > 1 AND b < 5");
    /// ```
    pub fn where_cond(&mut self, cond: Conditional) -> &mut Self {
        self.where_cond = Some(cond);
        self
    }

    /// Build statement
    pub fn build(&self) -> Result<Delete> {
        // Validate builder
        self.validate()?;

        Ok(Delete {
            table: self.table.clone(),
            where_cond: self.where_cond.clone(),
        })
    }

    /// Validate builder
    fn validate(&self) -> Result<()> {
        let mut v = Violations::new(PREAMBLE);
        v.require_name(&self.table, "table name");
        v.finish()
    }
}
