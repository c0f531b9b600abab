#[macro_use]
mod conditional;

mod alter;
mod column;
mod create;
mod delete;
mod drop;
mod foreign_key;
mod insert;
mod reference;
mod select;
mod statement;
mod update;
pub mod validate;
mod value;

pub use alter::{Alter, AlterBuilder, AlterOperation, AlterOperationStage, AlterTarget};
pub use column::{
    ColumnBuilder, ColumnDefinition, ColumnTypeStage, DataType, DigitsColumnBuilder,
    PrecisionColumnBuilder, SizedColumnBuilder,
};
pub use conditional::{
    ComparisonOperator, Conditional, ConditionalBuilder, ConditionalStatement,
    ConjunctiveOperator, Operand, StatementBuilder, StatementOperandStage, StatementOperatorStage,
};
pub use create::{Create, CreateBuilder, CreateTableStage, CreateTarget};
pub use delete::{Delete, DeleteBuilder};
pub use drop::{DropBuilder, DropStatement, DropTarget};
pub use foreign_key::{
    ForeignKeyBuilder, ForeignKeyColumnsStage, ForeignKeyConstraint, ForeignKeyRefColumnsStage,
    ForeignKeyTableStage, ReferenceOption,
};
pub use insert::{Insert, InsertBuilder, InsertColumnsStage, InsertValuesStage};
pub use reference::{ColumnRef, TableRef};
pub use select::{Select, SelectBuilder, SelectFromStage};
pub use statement::Statement;
pub use update::{Update, UpdateBuilder, UpdateSetStage};
pub use value::{sql_str, FromValue, Value};

#[derive(Debug)]
pub struct QueryBuilder {}

impl QueryBuilder {
    pub fn select<T, S>(columns: T) -> SelectFromStage
    where
        T: IntoIterator<Item = S>,
        S: ToString,
    {
        SelectFromStage::new(columns.into_iter().map(|c| c.to_string()).collect())
    }

    /// `SELECT *`
    pub fn select_all() -> SelectFromStage {
        SelectFromStage::new(vec![])
    }

    pub fn insert<S: ToString>(table: S) -> InsertColumnsStage {
        InsertColumnsStage::new(table.to_string())
    }

    pub fn update<S: ToString>(table: S) -> UpdateSetStage {
        UpdateSetStage::new(table.to_string())
    }

    pub fn delete<S: ToString>(table: S) -> DeleteBuilder {
        DeleteBuilder::new(table.to_string())
    }

    pub fn create_table<S: ToString>(name: S) -> CreateTableStage {
        CreateTableStage::new(name.to_string())
    }

    pub fn create_database<S: ToString>(name: S) -> CreateBuilder {
        CreateBuilder::database(name.to_string())
    }

    pub fn alter_table<S: ToString>(table: S) -> AlterOperationStage {
        AlterOperationStage::new(table.to_string())
    }

    pub fn drop_table<S: ToString>(name: S) -> DropBuilder {
        DropBuilder::new(DropTarget::Table, name.to_string())
    }

    pub fn drop_database<S: ToString>(name: S) -> DropBuilder {
        DropBuilder::new(DropTarget::Database, name.to_string())
    }
}
