//! # Pojo
//!
//! A pojo is a mutable record: declared columns (the column name doubles as
//! the field key), the current value of each field, nested child pojos and
//! foreign keys. The persistence engine turns this metadata into statements.
//!
//! ```
//! use porm::Pojo;
//! use porm::query::{ColumnDefinition, Value};
//!
//! let mut user = Pojo::builder("User", "user")
//!     .id_column("id")
//!     .column(ColumnDefinition::builder("id").int().auto_increment().primary_key().build().unwrap())
//!     .column(ColumnDefinition::builder("name").varchar().size(20).build().unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert!(user.id().is_none());
//!
//! user.set("name", "bob").unwrap();
//! assert_eq!(user.get("name"), Some(&Value::Str("bob".into())));
//! assert!(user.set("age", 3).is_err());
//! ```

use std::collections::{HashMap, HashSet};

use porm_error::Result;
use porm_query::{
    validate::Violations, ColumnDefinition, ForeignKeyConstraint, FromValue, Value,
};

use crate::SubPojoDefinition;

const PREAMBLE: &str = "Failed to build pojo:";

#[derive(Debug, Clone, PartialEq)]
pub struct Pojo {
    type_tag: String,
    table: String,
    id_column: String,
    columns: Vec<ColumnDefinition>,
    values: HashMap<String, Value>,
    sub_pojo_defs: Vec<SubPojoDefinition>,
    sub_pojos: HashMap<String, Pojo>,
    foreign_keys: Vec<ForeignKeyConstraint>,
}

impl Pojo {
    pub fn builder<T: ToString, S: ToString>(type_tag: T, table: S) -> PojoBuilder {
        PojoBuilder {
            type_tag: type_tag.to_string(),
            table: table.to_string(),
            id_column: String::new(),
            columns: vec![],
            defaults: vec![],
            sub_pojo_defs: vec![],
            foreign_keys: vec![],
        }
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn sub_pojo_definitions(&self) -> &[SubPojoDefinition] {
        &self.sub_pojo_defs
    }

    pub fn sub_pojo_definition(&self, key: &str) -> Option<&SubPojoDefinition> {
        self.sub_pojo_defs.iter().find(|d| d.key() == key)
    }

    pub fn foreign_keys(&self) -> &[ForeignKeyConstraint] {
        &self.foreign_keys
    }

    /// Current identifier, `None` while unset or NULL
    pub fn id(&self) -> Option<&Value> {
        self.get(&self.id_column).filter(|v| !v.is_null())
    }

    /// Current value of a field, `None` while the field was never populated
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Read a field as `T`, an unpopulated field reads as NULL
    pub fn get_as<T: FromValue>(&self, column: &str) -> Result<T> {
        if self.column(column).is_none() {
            return Err(self.unknown_column(column));
        }

        T::from_value(self.values.get(column).unwrap_or(&Value::Null))
    }

    /// Populate a declared field
    pub fn set<V: Into<Value>>(&mut self, column: &str, value: V) -> Result<()> {
        if self.column(column).is_none() {
            return Err(self.unknown_column(column));
        }

        self.values.insert(column.to_string(), value.into());

        Ok(())
    }

    /// Forget the value of a field, returning it
    pub fn unset(&mut self, column: &str) -> Option<Value> {
        self.values.remove(column)
    }

    /// Declared columns whose current value is set and not NULL, in declared
    /// order
    pub fn non_null_values(&self) -> impl Iterator<Item = (&ColumnDefinition, &Value)> {
        self.columns.iter().filter_map(|c| {
            self.values
                .get(c.name())
                .filter(|v| !v.is_null())
                .map(|v| (c, v))
        })
    }

    /// Attach a child under a declared key, returning the child it replaces
    pub fn attach(&mut self, key: &str, child: Pojo) -> Result<Option<Pojo>> {
        if self.sub_pojo_definition(key).is_none() {
            return Err(porm_error::argument!(
                "Pojo `{}` declares no sub pojo `{}`",
                self.type_tag,
                key
            ));
        }

        Ok(self.sub_pojos.insert(key.to_string(), child))
    }

    pub fn detach(&mut self, key: &str) -> Option<Pojo> {
        self.sub_pojos.remove(key)
    }

    pub fn sub_pojo(&self, key: &str) -> Option<&Pojo> {
        self.sub_pojos.get(key)
    }

    pub fn sub_pojo_mut(&mut self, key: &str) -> Option<&mut Pojo> {
        self.sub_pojos.get_mut(key)
    }

    pub(crate) fn put_value(&mut self, column: &str, value: Value) {
        self.values.insert(column.to_string(), value);
    }

    pub(crate) fn put_sub_pojo(&mut self, key: &str, child: Pojo) {
        self.sub_pojos.insert(key.to_string(), child);
    }

    fn unknown_column(&self, column: &str) -> porm_error::Error {
        porm_error::argument!(
            "Pojo `{}` declares no column `{}`",
            self.type_tag,
            column
        )
    }
}

#[derive(Debug, Clone)]
pub struct PojoBuilder {
    type_tag: String,
    table: String,
    id_column: String,
    columns: Vec<ColumnDefinition>,
    defaults: Vec<(String, Value)>,
    sub_pojo_defs: Vec<SubPojoDefinition>,
    foreign_keys: Vec<ForeignKeyConstraint>,
}

impl PojoBuilder {
    pub fn id_column<S: ToString>(&mut self, column: S) -> &mut Self {
        self.id_column = column.to_string();
        self
    }

    /// Declare a column, declaration order is kept for every statement
    pub fn column(&mut self, def: ColumnDefinition) -> &mut Self {
        self.columns.push(def);
        self
    }

    pub fn columns<T>(&mut self, defs: T) -> &mut Self
    where
        T: IntoIterator<Item = ColumnDefinition>,
    {
        self.columns.extend(defs);
        self
    }

    /// Value a field starts out with
    pub fn default_value<S, V>(&mut self, column: S, value: V) -> &mut Self
    where
        S: ToString,
        V: Into<Value>,
    {
        self.defaults.push((column.to_string(), value.into()));
        self
    }

    pub fn sub_pojo(&mut self, def: SubPojoDefinition) -> &mut Self {
        self.sub_pojo_defs.push(def);
        self
    }

    pub fn foreign_key(&mut self, fk: ForeignKeyConstraint) -> &mut Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Build pojo
    pub fn build(&self) -> Result<Pojo> {
        // Validate builder
        self.validate()?;

        Ok(Pojo {
            type_tag: self.type_tag.clone(),
            table: self.table.clone(),
            id_column: self.id_column.clone(),
            columns: self.columns.clone(),
            values: self.defaults.iter().cloned().collect(),
            sub_pojo_defs: self.sub_pojo_defs.clone(),
            sub_pojos: HashMap::new(),
            foreign_keys: self.foreign_keys.clone(),
        })
    }

    /// Validate builder
    fn validate(&self) -> Result<()> {
        let mut v = Violations::new(PREAMBLE);

        v.require_name(&self.type_tag, "type tag");
        v.require_name(&self.table, "table name");
        v.require_name(&self.id_column, "id column");
        v.check(self.columns.is_empty(), || {
            "at least one column is required".into()
        });

        let mut names = HashSet::new();
        for col in &self.columns {
            v.check(!names.insert(col.name()), || {
                format!("column `{}` is declared twice", col.name())
            });
        }
        let declared = |name: &str| names.contains(name);

        v.check(
            !self.id_column.trim().is_empty() && !declared(&self.id_column),
            || format!("id column `{}` is not a declared column", self.id_column),
        );
        for (col, _) in &self.defaults {
            v.check(!declared(col), || {
                format!("default value for undeclared column `{}`", col)
            });
        }

        let mut keys = HashSet::new();
        for def in &self.sub_pojo_defs {
            v.check(!keys.insert(def.key()), || {
                format!("sub pojo key `{}` is declared twice", def.key())
            });
            if let Some(col) = def.id_column() {
                v.check(!declared(col), || {
                    format!(
                        "sub pojo `{}` id column `{}` is not a declared column",
                        def.key(),
                        col
                    )
                });
            }
        }

        v.finish()
    }
}

#[cfg(test)]
mod test {
    use porm_query::sql_str;

    use super::*;

    fn user() -> Pojo {
        Pojo::builder("User", "user")
            .id_column("id")
            .column(ColumnDefinition::builder("id").int().primary_key().build().unwrap())
            .column(ColumnDefinition::builder("name").varchar().build().unwrap())
            .column(ColumnDefinition::builder("address_id").int().build().unwrap())
            .default_value("name", "nobody")
            .sub_pojo(
                SubPojoDefinition::builder("address")
                    .id_column("address_id")
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_defaults_and_access() {
        let mut pojo = user();
        assert_eq!(pojo.get("name"), Some(&sql_str("nobody")));
        assert_eq!(pojo.get("address_id"), None);
        assert_eq!(pojo.get_as::<Option<i32>>("address_id").unwrap(), None);
        assert!(pojo.get_as::<i32>("missing").is_err());

        pojo.set("id", Value::Null).unwrap();
        assert!(pojo.id().is_none());
        pojo.set("id", 4).unwrap();
        assert_eq!(pojo.id(), Some(&Value::Int(4)));
        assert_eq!(pojo.get_as::<u32>("id").unwrap(), 4);

        let names = pojo
            .non_null_values()
            .map(|(c, _)| c.name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["id", "name"]);
    }

    #[test]
    fn test_attach() {
        let mut pojo = user();
        let child = user();

        assert!(pojo.attach("friend", child.clone()).is_err());
        assert_eq!(pojo.attach("address", child.clone()).unwrap(), None);
        assert_eq!(pojo.sub_pojo("address"), Some(&child));
        assert_eq!(pojo.detach("address"), Some(child));
        assert!(pojo.sub_pojo("address").is_none());
    }

    #[test]
    fn test_violations() {
        let err = Pojo::builder("User", "")
            .id_column("uid")
            .column(ColumnDefinition::builder("id").int().build().unwrap())
            .column(ColumnDefinition::builder("id").int().build().unwrap())
            .default_value("age", 1)
            .sub_pojo(SubPojoDefinition::builder("a").id_column("a_id").build().unwrap())
            .sub_pojo(SubPojoDefinition::builder("a").build().unwrap())
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to build pojo:\n  - table name must not be blank\n  - column `id` is declared twice\n  - id column `uid` is not a declared column\n  - default value for undeclared column `age`\n  - sub pojo `a` id column `a_id` is not a declared column\n  - sub pojo key `a` is declared twice"
        );
    }
}
