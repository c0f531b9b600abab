use porm::{
    conn::Value,
    error::{Error, Result},
    query::{sql_str, ColumnDefinition},
    Pojo,
};
use porm_test::{
    fixtures::{self, address, user},
    mock_engine,
};

#[test]
fn test_insert_assigns_generated_id() {
    let (engine, driver) = mock_engine(fixtures::registry());
    driver.push_id(7u64);

    let mut bob = user().unwrap();
    bob.set("name", "bob").unwrap();

    let id = engine.store_values(&mut bob, false).unwrap();

    assert_eq!(id, Some(Value::Int(7)));
    assert_eq!(bob.id(), Some(&Value::Int(7)));
    assert_eq!(bob.get_as::<u32>("id").unwrap(), 7);
    assert_eq!(
        driver.statements(),
        vec!["INSERT INTO user (name, address_id) VALUES ('bob', NULL)"]
    );
}

#[test]
fn test_insert_uses_defaults() {
    let (engine, driver) = mock_engine(fixtures::registry());

    let mut nobody = user().unwrap();
    engine.store_values(&mut nobody, false).unwrap();

    assert_eq!(
        driver.last_statement().unwrap(),
        "INSERT INTO user (name, address_id) VALUES ('NONAME', NULL)"
    );
}

#[test]
fn test_update_returns_none() {
    let (engine, driver) = mock_engine(fixtures::registry());

    let mut bob = user().unwrap();
    bob.set("id", 3).unwrap();
    bob.set("name", "bob").unwrap();
    bob.set("address_id", 9).unwrap();

    let id = engine.store_values(&mut bob, false).unwrap();

    assert_eq!(id, None);
    assert_eq!(
        driver.statements(),
        vec!["UPDATE user SET name = 'bob', address_id = 9 WHERE id = 3"]
    );
}

#[test]
fn test_store_children_backfills_foreign_id() {
    let (engine, driver) = mock_engine(fixtures::registry());

    let mut home = address().unwrap();
    home.set("city", "Paris").unwrap();
    home.set("street", "Main").unwrap();

    let mut bob = user().unwrap();
    bob.set("name", "bob").unwrap();
    bob.attach("address", home).unwrap();

    let id = engine.store_values(&mut bob, true).unwrap();

    assert_eq!(id, Some(Value::Int(1)));
    assert_eq!(bob.get("address_id"), Some(&Value::Int(2)));
    assert_eq!(
        bob.sub_pojo("address").unwrap().id(),
        Some(&Value::Int(2))
    );
    assert_eq!(
        driver.statements(),
        vec![
            "INSERT INTO user (name, address_id) VALUES ('bob', NULL)",
            "INSERT INTO address (city, street) VALUES ('Paris', 'Main')",
            "UPDATE user SET address_id = 2 WHERE id = 1",
        ]
    );

    // Unchanged foreign id, no extra update
    driver.clear();
    let id = engine.store_values(&mut bob, true).unwrap();

    assert_eq!(id, None);
    assert_eq!(
        driver.statements(),
        vec![
            "UPDATE user SET name = 'bob', address_id = 2 WHERE id = 1",
            "UPDATE address SET city = 'Paris', street = 'Main' WHERE id = 2",
        ]
    );
}

#[test]
fn test_store_without_children_flag() {
    let (engine, driver) = mock_engine(fixtures::registry());

    let mut bob = user().unwrap();
    bob.attach("address", address().unwrap()).unwrap();
    engine.store_values(&mut bob, false).unwrap();

    assert_eq!(driver.statements().len(), 1);
    assert_eq!(bob.sub_pojo("address").unwrap().id(), None);
}

#[test]
fn test_driver_error_propagates() {
    let (engine, driver) = mock_engine(fixtures::registry());
    driver.fail_next("Duplicate entry");

    let mut bob = user().unwrap();
    bob.set("name", sql_str("bob")).unwrap();
    let err = engine.store_values(&mut bob, false).unwrap_err();

    assert!(matches!(err, Error::Database(_)));
    assert!(err.to_string().contains("Duplicate entry"));
    assert_eq!(bob.id(), None);
}

fn unsigned_address() -> Result<Pojo> {
    Pojo::builder(fixtures::ADDRESS, "address")
        .id_column("id")
        .column(
            ColumnDefinition::builder("id")
                .int()
                .unsigned()
                .auto_increment()
                .primary_key()
                .build()?,
        )
        .column(ColumnDefinition::builder("city").varchar().size(50).build()?)
        .build()
}

#[test]
fn test_backfilled_id_follows_parent_column() {
    let (engine, driver) = mock_engine(fixtures::registry());

    let mut home = unsigned_address().unwrap();
    home.set("city", "Paris").unwrap();
    let mut bob = user().unwrap();
    bob.attach("address", home).unwrap();

    engine.store_values(&mut bob, true).unwrap();

    assert_eq!(bob.sub_pojo("address").unwrap().id(), Some(&Value::UInt(2)));
    assert_eq!(bob.get("address_id"), Some(&Value::Int(2)));
    assert_eq!(
        driver.last_statement().unwrap(),
        "UPDATE user SET address_id = 2 WHERE id = 1"
    );

    // Same id in another variant is not a change
    driver.clear();
    engine.store_values(&mut bob, true).unwrap();

    assert_eq!(bob.get("address_id"), Some(&Value::Int(2)));
    assert_eq!(
        driver.statements(),
        vec![
            "UPDATE user SET name = 'NONAME', address_id = 2 WHERE id = 1",
            "UPDATE address SET city = 'Paris' WHERE id = 2",
        ]
    );
}
