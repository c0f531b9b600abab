use std::fmt;

use porm_error::{query_builder, Result};

use crate::{validate::Violations, ColumnDefinition, ForeignKeyConstraint};

const PREAMBLE: &str = "Failed to build ALTER statement:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlterOperation {
    Add,
    Modify,
    Drop,
}

impl fmt::Display for AlterOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "ADD"),
            Self::Modify => write!(f, "MODIFY"),
            Self::Drop => write!(f, "DROP"),
        }
    }
}

/// What an `ALTER TABLE` acts on
#[derive(Debug, Clone, PartialEq)]
pub enum AlterTarget {
    Column(ColumnDefinition),
    ColumnName(String),
    ForeignKey(ForeignKeyConstraint),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alter {
    table: String,
    operation: AlterOperation,
    target: AlterTarget,
}

impl Alter {
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn operation(&self) -> AlterOperation {
        self.operation
    }

    pub fn target(&self) -> &AlterTarget {
        &self.target
    }
}

impl fmt::Display for Alter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ALTER TABLE {} {} ", self.table, self.operation)?;

        match &self.target {
            AlterTarget::Column(def) => write!(f, "COLUMN {}", def),
            AlterTarget::ColumnName(name) => write!(f, "COLUMN {}", name),
            AlterTarget::ForeignKey(fk) => write!(f, "{}", fk),
        }
    }
}

#[derive(Debug)]
pub struct AlterOperationStage {
    table: String,
}

impl AlterOperationStage {
    pub(crate) fn new(table: String) -> Self {
        Self { table }
    }

    /// Choose the operation
    ///
    /// # Examples
    ///
    /// ```
    /// use porm_query::{AlterOperation, ColumnDefinition, QueryBuilder};
    ///
    /// let def = ColumnDefinition::builder("age").tiny_int().unsigned().build().unwrap();
    /// let sql = QueryBuilder::alter_table("user")
    ///     .operation(AlterOperation::Add)
    ///     .column_definition(def)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(&sql.to_string(), "ALTER TABLE user ADD COLUMN age TINYINT UNSIGNED");
    /// ```
    pub fn operation(self, operation: AlterOperation) -> AlterBuilder {
        AlterBuilder {
            table: self.table,
            operation,
            column_definition: None,
            column_name: None,
            foreign_key: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AlterBuilder {
    table: String,
    operation: AlterOperation,
    column_definition: Option<ColumnDefinition>,
    column_name: Option<String>,
    foreign_key: Option<ForeignKeyConstraint>,
}

impl AlterBuilder {
    pub fn column_definition(&mut self, def: ColumnDefinition) -> &mut Self {
        self.column_definition = Some(def);
        self
    }

    pub fn column_name<S: ToString>(&mut self, name: S) -> &mut Self {
        self.column_name = Some(name.to_string());
        self
    }

    pub fn foreign_key(&mut self, fk: ForeignKeyConstraint) -> &mut Self {
        self.foreign_key = Some(fk);
        self
    }

    /// Build statement
    pub fn build(&self) -> Result<Alter> {
        // Validate builder
        self.validate()?;

        let target = match (self.operation, &self.column_definition, &self.foreign_key) {
            (AlterOperation::Drop, _, _) => {
                AlterTarget::ColumnName(self.column_name.clone().unwrap_or_default())
            }
            (_, Some(def), _) => AlterTarget::Column(def.clone()),
            (_, None, Some(fk)) => AlterTarget::ForeignKey(fk.clone()),
            (_, None, None) => return Err(query_builder!("{} missing alter target", PREAMBLE)),
        };

        Ok(Alter {
            table: self.table.clone(),
            operation: self.operation,
            target,
        })
    }

    /// Validate builder
    fn validate(&self) -> Result<()> {
        let mut v = Violations::new(PREAMBLE);

        v.require_name(&self.table, "table name");

        match self.operation {
            AlterOperation::Add => {
                v.check(
                    self.column_definition.is_some() == self.foreign_key.is_some(),
                    || "ADD requires exactly one of a column definition or a foreign key".into(),
                );
            }
            AlterOperation::Modify => {
                v.check(self.column_definition.is_none(), || {
                    "MODIFY requires a column definition".into()
                });
                v.check(self.foreign_key.is_some(), || {
                    "MODIFY does not accept a foreign key".into()
                });
            }
            AlterOperation::Drop => match &self.column_name {
                Some(name) => {
                    v.require_name(name, "dropped column name");
                }
                None => {
                    v.push("DROP requires a column name");
                }
            },
        }

        v.finish()
    }
}

#[cfg(test)]
mod test {
    use crate::*;

    #[test]
    fn test_add_foreign_key() {
        let fk = ForeignKeyConstraint::builder()
            .columns(["group_id"])
            .references("grp")
            .ref_columns(["id"])
            .build()
            .unwrap();
        let sql = QueryBuilder::alter_table("user")
            .operation(AlterOperation::Add)
            .foreign_key(fk)
            .build()
            .unwrap();
        assert_eq!(
            &sql.to_string(),
            "ALTER TABLE user ADD FOREIGN KEY (group_id) REFERENCES grp (id)"
        );
    }

    #[test]
    fn test_modify_and_drop() {
        let def = ColumnDefinition::builder("name")
            .varchar()
            .size(64)
            .not_null()
            .build()
            .unwrap();
        let sql = QueryBuilder::alter_table("user")
            .operation(AlterOperation::Modify)
            .column_definition(def)
            .build()
            .unwrap();
        assert_eq!(
            &sql.to_string(),
            "ALTER TABLE user MODIFY COLUMN name VARCHAR(64) NOT NULL"
        );

        let sql = QueryBuilder::alter_table("user")
            .operation(AlterOperation::Drop)
            .column_name("name")
            .build()
            .unwrap();
        assert_eq!(&sql.to_string(), "ALTER TABLE user DROP COLUMN name");
    }

    #[test]
    fn test_violations() {
        let err = QueryBuilder::alter_table("user")
            .operation(AlterOperation::Add)
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to build ALTER statement:\n  - ADD requires exactly one of a column definition or a foreign key"
        );

        let err = QueryBuilder::alter_table("")
            .operation(AlterOperation::Drop)
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to build ALTER statement:\n  - table name must not be blank\n  - DROP requires a column name"
        );

        assert!(QueryBuilder::alter_table("user")
            .operation(AlterOperation::Modify)
            .column_name("x")
            .build()
            .is_err());
    }
}
