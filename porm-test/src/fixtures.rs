//! Pojo types shared by the integration tests: a `User` living at an
//! `Address`, joined by `user.address_id = address.id`.

use porm::{
    conn::{Row, Value},
    error::Result,
    query::{ColumnDefinition, ColumnRef, ForeignKeyConstraint, ReferenceOption},
    Pojo, Registry, SubPojoDefinition,
};

pub const USER: &str = "User";
pub const ADDRESS: &str = "Address";

pub fn address() -> Result<Pojo> {
    Pojo::builder(ADDRESS, "address")
        .id_column("id")
        .column(
            ColumnDefinition::builder("id")
                .int()
                .not_null()
                .auto_increment()
                .primary_key()
                .build()?,
        )
        .column(ColumnDefinition::builder("city").varchar().size(50).build()?)
        .column(ColumnDefinition::builder("street").varchar().size(100).build()?)
        .build()
}

pub fn user() -> Result<Pojo> {
    Pojo::builder(USER, "user")
        .id_column("id")
        .column(
            ColumnDefinition::builder("id")
                .int()
                .not_null()
                .auto_increment()
                .primary_key()
                .build()?,
        )
        .column(
            ColumnDefinition::builder("name")
                .varchar()
                .size(20)
                .not_null()
                .build()?,
        )
        .column(ColumnDefinition::builder("address_id").int().build()?)
        .default_value("name", "NONAME")
        .sub_pojo(
            SubPojoDefinition::builder("address")
                .id_column("address_id")
                .pojo_type(ADDRESS)
                .junction(
                    ColumnRef::qualified("user", "address_id"),
                    ColumnRef::qualified("address", "id"),
                )
                .build()?,
        )
        .foreign_key(
            ForeignKeyConstraint::builder()
                .columns(["address_id"])
                .references("address")
                .ref_columns(["id"])
                .on_delete(ReferenceOption::SetNull)
                .build()?,
        )
        .build()
}

pub fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.register(USER, user).register(ADDRESS, address);

    registry
}

/// Row as the server labels it: bare column names
pub fn address_row(id: i64, city: &str, street: &str) -> Row {
    Row::from_pairs([
        ("id", Value::Int(id)),
        ("city", Value::Bytes(city.as_bytes().to_vec())),
        ("street", Value::Bytes(street.as_bytes().to_vec())),
    ])
}

pub fn user_row(id: i64, name: &str, address_id: Option<i64>) -> Row {
    Row::from_pairs([
        ("id", Value::Int(id)),
        ("name", Value::Bytes(name.as_bytes().to_vec())),
        ("address_id", address_id.into()),
    ])
}
