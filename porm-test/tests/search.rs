use porm::{conn::Value, error::Error};
use porm_test::{
    fixtures::{self, address, user, user_row},
    mock_engine,
};

#[test]
fn test_search_returns_rows_in_order() {
    let (engine, driver) = mock_engine(fixtures::registry());
    driver.push_rows([
        user_row(1, "bob", Some(2)),
        user_row(3, "bob", None),
        user_row(4, "bob", Some(8)),
    ]);

    let mut filter = user().unwrap();
    filter.set("name", "bob").unwrap();

    let found = engine.do_search(&filter, fixtures::USER, &[]).unwrap();

    assert_eq!(found.len(), 3);
    assert_eq!(
        found.iter().map(|u| u.id().cloned()).collect::<Vec<_>>(),
        vec![Some(Value::Int(1)), Some(Value::Int(3)), Some(Value::Int(4))]
    );
    assert_eq!(found[1].get("address_id"), Some(&Value::Null));
    assert_eq!(found[2].get_as::<String>("name").unwrap(), "bob");
    assert_eq!(
        driver.statements(),
        vec!["SELECT user.id, user.name, user.address_id FROM user WHERE user.name = 'bob'"]
    );
}

#[test]
fn test_search_joins_filtered_child() {
    let (engine, driver) = mock_engine(fixtures::registry());

    let mut home = address().unwrap();
    home.set("city", "Paris").unwrap();
    let mut filter = user().unwrap();
    filter.set("name", "bob").unwrap();
    filter.attach("address", home).unwrap();

    let found = engine.do_search(&filter, fixtures::USER, &["address"]).unwrap();

    assert!(found.is_empty());
    assert_eq!(
        driver.last_statement().unwrap(),
        "SELECT user.id, user.name, user.address_id FROM user, address \
         WHERE (user.name = 'bob' AND address.city = 'Paris') AND user.address_id = address.id"
    );
}

#[test]
fn test_search_skips_unfiltered_child() {
    let (engine, driver) = mock_engine(fixtures::registry());

    let mut filter = user().unwrap();
    filter.attach("address", address().unwrap()).unwrap();

    engine.do_search(&filter, fixtures::USER, &["address"]).unwrap();

    assert_eq!(
        driver.last_statement().unwrap(),
        "SELECT user.id, user.name, user.address_id FROM user WHERE user.name = 'NONAME'"
    );
}

#[test]
fn test_search_child_not_selected() {
    let (engine, driver) = mock_engine(fixtures::registry());

    let mut home = address().unwrap();
    home.set("city", "Paris").unwrap();
    let mut filter = user().unwrap();
    filter.unset("name");
    filter.attach("address", home).unwrap();

    engine.do_search(&filter, fixtures::USER, &[]).unwrap();

    assert_eq!(
        driver.last_statement().unwrap(),
        "SELECT user.id, user.name, user.address_id FROM user"
    );
}

#[test]
fn test_search_errors() {
    let (engine, driver) = mock_engine(fixtures::registry());
    let filter = user().unwrap();

    let err = engine.do_search(&filter, fixtures::USER, &["friend"]).unwrap_err();
    assert!(matches!(err, Error::Argument(_)));
    assert!(driver.statements().is_empty());

    driver.push_rows([user_row(1, "bob", None)]);
    let err = engine.do_search(&filter, "Ghost", &[]).unwrap_err();
    assert!(matches!(err, Error::Instantiate(_)));
}
