use porm::{conn::Value, error::Error};
use porm_test::{
    fixtures::{self, address, user},
    mock_engine,
};

const CREATE_USER: &str = "CREATE TABLE user(id INT NOT NULL AUTO_INCREMENT PRIMARY KEY, \
    name VARCHAR(20) NOT NULL, address_id INT, \
    FOREIGN KEY (address_id) REFERENCES address (id) ON DELETE SET NULL)";
const CREATE_ADDRESS: &str = "CREATE TABLE address(id INT NOT NULL AUTO_INCREMENT PRIMARY KEY, \
    city VARCHAR(50), street VARCHAR(100))";

#[test]
fn test_create_table() {
    let (engine, driver) = mock_engine(fixtures::registry());

    engine.create_table(&user().unwrap()).unwrap();

    assert_eq!(driver.statements(), vec![CREATE_USER]);
}

#[test]
fn test_create_tables() {
    let (engine, driver) = mock_engine(fixtures::registry());
    let (home, bob) = (address().unwrap(), user().unwrap());

    engine.create_tables(&[&home, &bob]).unwrap();

    assert_eq!(driver.statements(), vec![CREATE_ADDRESS, CREATE_USER]);
}

#[test]
fn test_drop_and_delete() {
    let (engine, driver) = mock_engine(fixtures::registry());
    let mut bob = user().unwrap();

    let err = engine.delete_values(&bob).unwrap_err();
    assert!(matches!(err, Error::Argument(_)));

    bob.set("id", Value::UInt(4)).unwrap();
    assert_eq!(engine.delete_values(&bob).unwrap(), 1);
    engine.drop_table(&bob).unwrap();

    assert_eq!(
        driver.statements(),
        vec!["DELETE FROM user WHERE id = 4", "DROP TABLE IF EXISTS user"]
    );
}
