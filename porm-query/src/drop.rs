use std::fmt;

use porm_error::Result;

use crate::validate::Violations;

const PREAMBLE: &str = "Failed to build DROP statement:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropTarget {
    Table,
    Database,
}

impl fmt::Display for DropTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "TABLE"),
            Self::Database => write!(f, "DATABASE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropStatement {
    target: DropTarget,
    if_exists: bool,
    name: String,
}

impl DropStatement {
    pub fn target(&self) -> DropTarget {
        self.target
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for DropStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DROP {}", self.target)?;
        if self.if_exists {
            write!(f, " IF EXISTS")?;
        }
        write!(f, " {}", self.name)
    }
}

#[derive(Debug, Clone)]
pub struct DropBuilder {
    target: DropTarget,
    if_exists: bool,
    name: String,
}

impl DropBuilder {
    pub(crate) fn new(target: DropTarget, name: String) -> Self {
        Self {
            target,
            if_exists: false,
            name,
        }
    }

    /// Set `IF EXISTS`
    ///
    /// # Examples
    ///
    /// ```
    /// use porm_query::QueryBuilder;
    ///
    /// let sql = QueryBuilder::drop_table("ta").if_exists().build().unwrap();
    ///
    /// assert_eq!(&sql.to_string(), "DROP TABLE IF EXISTS ta");
    /// ```
    pub fn if_exists(&mut self) -> &mut Self {
        self.if_exists = true;
        self
    }

    /// Build statement
    pub fn build(&self) -> Result<DropStatement> {
        let mut v = Violations::new(PREAMBLE);
        v.require_name(&self.name, &format!("{} name", self.target.to_string().to_lowercase()));
        v.finish()?;

        Ok(DropStatement {
            target: self.target,
            if_exists: self.if_exists,
            name: self.name.clone(),
        })
    }
}

#[cfg(test)]
mod test {
    use crate::*;

    #[test]
    fn test_drop() {
        let sql = QueryBuilder::drop_database("shop").build().unwrap();
        assert_eq!(&sql.to_string(), "DROP DATABASE shop");

        let err = QueryBuilder::drop_database("").if_exists().build().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to build DROP statement:\n  - database name must not be blank"
        );
    }
}
