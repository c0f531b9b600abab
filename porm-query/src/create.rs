use std::fmt;

use porm_error::Result;

use crate::{validate::Violations, ColumnDefinition, ForeignKeyConstraint, Select};

const PREAMBLE: &str = "Failed to build CREATE statement:";

#[derive(Debug, Clone, PartialEq)]
pub enum CreateTarget {
    Table {
        columns: Vec<ColumnDefinition>,
        foreign_keys: Vec<ForeignKeyConstraint>,
        source: Option<Select>,
    },
    Database,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Create {
    name: String,
    if_not_exists: bool,
    target: CreateTarget,
}

impl Create {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &CreateTarget {
        &self.target
    }
}

impl fmt::Display for Create {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let if_not_exists = if self.if_not_exists {
            " IF NOT EXISTS"
        } else {
            ""
        };

        match &self.target {
            CreateTarget::Database => {
                write!(f, "CREATE DATABASE{} {}", if_not_exists, self.name)
            }
            CreateTarget::Table {
                source: Some(select),
                ..
            } => write!(f, "CREATE TABLE{} {} AS {}", if_not_exists, self.name, select),
            CreateTarget::Table {
                columns,
                foreign_keys,
                source: None,
            } => {
                let defs = columns
                    .iter()
                    .map(|c| c.to_string())
                    .chain(foreign_keys.iter().map(|fk| fk.to_string()))
                    .collect::<Vec<_>>();
                write!(
                    f,
                    "CREATE TABLE{} {}({})",
                    if_not_exists,
                    self.name,
                    defs.join(", ")
                )
            }
        }
    }
}

/// First stage of `CREATE TABLE`: columns or a source select
#[derive(Debug)]
pub struct CreateTableStage {
    name: String,
}

impl CreateTableStage {
    pub(crate) fn new(name: String) -> Self {
        Self { name }
    }

    /// Set column definitions
    ///
    /// # Examples
    ///
    /// ```
    /// use porm_query::{ColumnDefinition, QueryBuilder};
    ///
    /// let id = ColumnDefinition::builder("id").int().size(10).primary_key().build().unwrap();
    /// let name = ColumnDefinition::builder("name").varchar().size(20).build().unwrap();
    ///
    /// let sql = QueryBuilder::create_table("user")
    ///     .columns([id, name])
    ///     .if_not_exists()
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(
    ///     &sql.to_string(),
    ///     "CREATE TABLE IF NOT EXISTS user(id INT(10) PRIMARY KEY, name VARCHAR(20))"
    /// );
    /// ```
    pub fn columns<T>(self, columns: T) -> CreateBuilder
    where
        T: IntoIterator<Item = ColumnDefinition>,
    {
        CreateBuilder {
            name: self.name,
            if_not_exists: false,
            is_database: false,
            columns: columns.into_iter().collect(),
            foreign_keys: vec![],
            source: None,
        }
    }

    /// Create the table from a select statement
    pub fn as_select(self, select: Select) -> CreateBuilder {
        CreateBuilder {
            name: self.name,
            if_not_exists: false,
            is_database: false,
            columns: vec![],
            foreign_keys: vec![],
            source: Some(select),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateBuilder {
    name: String,
    if_not_exists: bool,
    is_database: bool,
    columns: Vec<ColumnDefinition>,
    foreign_keys: Vec<ForeignKeyConstraint>,
    source: Option<Select>,
}

impl CreateBuilder {
    pub(crate) fn database(name: String) -> Self {
        Self {
            name,
            if_not_exists: false,
            is_database: true,
            columns: vec![],
            foreign_keys: vec![],
            source: None,
        }
    }

    pub fn if_not_exists(&mut self) -> &mut Self {
        self.if_not_exists = true;
        self
    }

    /// Append column definition
    pub fn column(&mut self, column: ColumnDefinition) -> &mut Self {
        self.columns.push(column);
        self
    }

    /// Append foreign key constraint
    pub fn foreign_key(&mut self, fk: ForeignKeyConstraint) -> &mut Self {
        self.foreign_keys.push(fk);
        self
    }

    pub fn foreign_keys<T>(&mut self, fks: T) -> &mut Self
    where
        T: IntoIterator<Item = ForeignKeyConstraint>,
    {
        self.foreign_keys.extend(fks);
        self
    }

    /// Build statement
    pub fn build(&self) -> Result<Create> {
        // Validate builder
        self.validate()?;

        let target = if self.is_database {
            CreateTarget::Database
        } else {
            CreateTarget::Table {
                columns: self.columns.clone(),
                foreign_keys: self.foreign_keys.clone(),
                source: self.source.clone(),
            }
        };

        Ok(Create {
            name: self.name.clone(),
            if_not_exists: self.if_not_exists,
            target,
        })
    }

    /// Validate builder
    fn validate(&self) -> Result<()> {
        let mut v = Violations::new(PREAMBLE);

        if self.is_database {
            v.require_name(&self.name, "database name");
            return v.finish();
        }

        v.require_name(&self.name, "table name");
        v.check(self.source.is_none() && self.columns.is_empty(), || {
            "either a source select or at least one column is required".into()
        });
        v.check(
            self.source.is_some() && !(self.columns.is_empty() && self.foreign_keys.is_empty()),
            || "a table created from a select cannot declare columns or foreign keys".into(),
        );

        v.finish()
    }
}

#[cfg(test)]
mod test {
    use crate::*;

    fn col(name: &str) -> ColumnDefinition {
        ColumnDefinition::builder(name).int().build().unwrap()
    }

    #[test]
    fn test_create_with_foreign_key() {
        let fk = ForeignKeyConstraint::builder()
            .columns(["user_id"])
            .references("user")
            .ref_columns(["id"])
            .on_delete(ReferenceOption::Cascade)
            .build()
            .unwrap();

        let sql = QueryBuilder::create_table("address")
            .columns([col("id"), col("user_id")])
            .foreign_key(fk)
            .build()
            .unwrap();
        assert_eq!(
            &sql.to_string(),
            "CREATE TABLE address(id INT, user_id INT, FOREIGN KEY (user_id) REFERENCES user (id) ON DELETE CASCADE)"
        );
    }

    #[test]
    fn test_create_as_select() {
        let select = QueryBuilder::select_all().from(["user"]).build().unwrap();
        let sql = QueryBuilder::create_table("user_copy")
            .as_select(select)
            .build()
            .unwrap();
        assert_eq!(&sql.to_string(), "CREATE TABLE user_copy AS SELECT * FROM user");
    }

    #[test]
    fn test_create_database() {
        let sql = QueryBuilder::create_database("shop")
            .if_not_exists()
            .build()
            .unwrap();
        assert_eq!(&sql.to_string(), "CREATE DATABASE IF NOT EXISTS shop");
    }

    #[test]
    fn test_violations() {
        let err = QueryBuilder::create_table("")
            .columns(vec![])
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to build CREATE statement:\n  - table name must not be blank\n  - either a source select or at least one column is required"
        );
    }
}
