use std::fmt;

use porm_error::Result;

use crate::{validate::Violations, ColumnDefinition, ColumnRef, TableRef};

const PREAMBLE: &str = "Failed to build foreign key constraint:";

/// Action applied to referencing rows on delete or update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceOption {
    Restrict,
    Cascade,
    SetNull,
    NoAction,
    SetDefault,
}

impl fmt::Display for ReferenceOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::NoAction => "NO ACTION",
            Self::SetDefault => "SET DEFAULT",
        };
        write!(f, "{}", s)
    }
}

/// Immutable multi-column reference to another table
///
/// # Examples
///
/// ```
/// use porm_query::ForeignKeyConstraint;
///
/// let fk = ForeignKeyConstraint::builder()
///     .columns(["a", "b"])
///     .references("t")
///     .ref_columns(["x", "y"])
///     .build()
///     .unwrap();
///
/// assert_eq!(&fk.to_string(), "FOREIGN KEY (a, b) REFERENCES t (x, y)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyConstraint {
    columns: Vec<String>,
    ref_table: String,
    ref_columns: Vec<String>,
    on_delete: Option<ReferenceOption>,
    on_update: Option<ReferenceOption>,
}

impl ForeignKeyConstraint {
    pub fn builder() -> ForeignKeyColumnsStage {
        ForeignKeyColumnsStage
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn ref_table(&self) -> &str {
        &self.ref_table
    }

    pub fn ref_columns(&self) -> &[String] {
        &self.ref_columns
    }

    pub fn on_delete(&self) -> Option<ReferenceOption> {
        self.on_delete
    }

    pub fn on_update(&self) -> Option<ReferenceOption> {
        self.on_update
    }
}

impl fmt::Display for ForeignKeyConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FOREIGN KEY ({}) REFERENCES {} ({})",
            self.columns.join(", "),
            self.ref_table,
            self.ref_columns.join(", ")
        )?;

        if let Some(action) = self.on_delete {
            write!(f, " ON DELETE {}", action)?;
        }
        if let Some(action) = self.on_update {
            write!(f, " ON UPDATE {}", action)?;
        }

        Ok(())
    }
}

fn names<T, S>(list: T) -> Vec<String>
where
    T: IntoIterator<Item = S>,
    S: ToString,
{
    list.into_iter().map(|s| s.to_string()).collect()
}

/// First stage: local columns
#[derive(Debug)]
pub struct ForeignKeyColumnsStage;

impl ForeignKeyColumnsStage {
    pub fn columns<T, S>(self, cols: T) -> ForeignKeyTableStage
    where
        T: IntoIterator<Item = S>,
        S: ToString,
    {
        ForeignKeyTableStage {
            columns: names(cols),
        }
    }

    pub fn column_refs(self, cols: &[ColumnRef]) -> ForeignKeyTableStage {
        self.columns(cols.iter().map(|c| c.name()))
    }

    pub fn column_definitions(self, cols: &[ColumnDefinition]) -> ForeignKeyTableStage {
        self.columns(cols.iter().map(|c| c.name()))
    }
}

/// Second stage: referenced table
#[derive(Debug)]
pub struct ForeignKeyTableStage {
    columns: Vec<String>,
}

impl ForeignKeyTableStage {
    pub fn references<S: ToString>(self, table: S) -> ForeignKeyRefColumnsStage {
        ForeignKeyRefColumnsStage {
            columns: self.columns,
            ref_table: table.to_string(),
        }
    }

    pub fn references_table(self, table: &TableRef) -> ForeignKeyRefColumnsStage {
        self.references(table.name())
    }
}

/// Third stage: referenced columns
#[derive(Debug)]
pub struct ForeignKeyRefColumnsStage {
    columns: Vec<String>,
    ref_table: String,
}

impl ForeignKeyRefColumnsStage {
    pub fn ref_columns<T, S>(self, cols: T) -> ForeignKeyBuilder
    where
        T: IntoIterator<Item = S>,
        S: ToString,
    {
        ForeignKeyBuilder {
            columns: self.columns,
            ref_table: self.ref_table,
            ref_columns: names(cols),
            on_delete: None,
            on_update: None,
        }
    }

    pub fn ref_column_refs(self, cols: &[ColumnRef]) -> ForeignKeyBuilder {
        self.ref_columns(cols.iter().map(|c| c.name()))
    }

    pub fn ref_column_definitions(self, cols: &[ColumnDefinition]) -> ForeignKeyBuilder {
        self.ref_columns(cols.iter().map(|c| c.name()))
    }
}

#[derive(Debug, Clone)]
pub struct ForeignKeyBuilder {
    columns: Vec<String>,
    ref_table: String,
    ref_columns: Vec<String>,
    on_delete: Option<ReferenceOption>,
    on_update: Option<ReferenceOption>,
}

impl ForeignKeyBuilder {
    pub fn on_delete(&mut self, action: ReferenceOption) -> &mut Self {
        self.on_delete = Some(action);
        self
    }

    pub fn on_update(&mut self, action: ReferenceOption) -> &mut Self {
        self.on_update = Some(action);
        self
    }

    /// Build foreign key constraint
    pub fn build(&self) -> Result<ForeignKeyConstraint> {
        // Validate builder
        self.validate()?;

        Ok(ForeignKeyConstraint {
            columns: self.columns.clone(),
            ref_table: self.ref_table.clone(),
            ref_columns: self.ref_columns.clone(),
            on_delete: self.on_delete,
            on_update: self.on_update,
        })
    }

    /// Validate builder
    fn validate(&self) -> Result<()> {
        let mut v = Violations::new(PREAMBLE);

        v.check(self.columns.is_empty(), || {
            "local column list must not be empty".into()
        });
        v.require_name(&self.ref_table, "referenced table name");
        v.check(self.ref_columns.is_empty(), || {
            "referenced column list must not be empty".into()
        });

        v.finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_render() {
        let fk = ForeignKeyConstraint::builder()
            .columns(["a", "b"])
            .references("t")
            .ref_columns(["x", "y"])
            .build()
            .unwrap();
        assert_eq!(&fk.to_string(), "FOREIGN KEY (a, b) REFERENCES t (x, y)");

        let fk = ForeignKeyConstraint::builder()
            .column_refs(&[ColumnRef::qualified("order", "user_id")])
            .references_table(&TableRef::new("user"))
            .ref_column_refs(&[ColumnRef::new("id")])
            .on_delete(ReferenceOption::Cascade)
            .on_update(ReferenceOption::SetNull)
            .build()
            .unwrap();
        assert_eq!(
            &fk.to_string(),
            "FOREIGN KEY (user_id) REFERENCES user (id) ON DELETE CASCADE ON UPDATE SET NULL"
        );
    }

    #[test]
    fn test_column_definition_entry_points() {
        let user_id = ColumnDefinition::builder("user_id").int().build().unwrap();
        let id = ColumnDefinition::builder("id").int().build().unwrap();

        let fk = ForeignKeyConstraint::builder()
            .column_definitions(&[user_id])
            .references("user")
            .ref_column_definitions(&[id])
            .on_update(ReferenceOption::Restrict)
            .build()
            .unwrap();
        assert_eq!(
            &fk.to_string(),
            "FOREIGN KEY (user_id) REFERENCES user (id) ON UPDATE RESTRICT"
        );
    }

    #[test]
    fn test_all_violations() {
        let err = ForeignKeyConstraint::builder()
            .columns(Vec::<String>::new())
            .references(" ")
            .ref_columns(Vec::<String>::new())
            .build()
            .unwrap_err();

        assert_eq!(
            err,
            porm_error::Error::QueryBuilder(
                "Failed to build foreign key constraint:\n  \
                 - local column list must not be empty\n  \
                 - referenced table name must not be blank\n  \
                 - referenced column list must not be empty"
                    .into()
            )
        );
    }
}
