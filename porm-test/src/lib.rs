pub mod fixtures;

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard},
};

use porm::{
    conn::{Connection, Driver, Row, Value},
    error::Result,
    PojoEngine, Registry,
};

pub fn init_logger() {
    env_logger::builder().is_test(true).try_init().ok();
}

/// Engine over a fresh [`MockDriver`], the driver handle stays with the test
pub fn mock_engine(registry: Registry) -> (PojoEngine, MockDriver) {
    init_logger();

    let driver = MockDriver::new();
    let engine = PojoEngine::new(driver.connection(), registry);

    (engine, driver)
}

#[derive(Debug, Default)]
struct MockState {
    statements: Vec<String>,
    results: VecDeque<Vec<Row>>,
    ids: VecDeque<Value>,
    next_id: u64,
    failure: Option<String>,
}

/// Scripted driver: records every statement, answers queries with queued
/// row sets (empty when none is queued) and inserts with queued ids (a
/// counter starting at 1 when none is queued)
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    state: Arc<Mutex<MockState>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection(&self) -> Connection {
        Connection::new(self.clone())
    }

    /// Queue the rows returned by the next query
    pub fn push_rows<I: IntoIterator<Item = Row>>(&self, rows: I) -> &Self {
        self.lock().results.push_back(rows.into_iter().collect());
        self
    }

    /// Queue the id returned by the next insert
    pub fn push_id<V: Into<Value>>(&self, id: V) -> &Self {
        self.lock().ids.push_back(id.into());
        self
    }

    /// Make the next driver call fail with a database error
    pub fn fail_next<S: ToString>(&self, msg: S) -> &Self {
        self.lock().failure = Some(msg.to_string());
        self
    }

    pub fn statements(&self) -> Vec<String> {
        self.lock().statements.clone()
    }

    pub fn last_statement(&self) -> Option<String> {
        self.lock().statements.last().cloned()
    }

    pub fn clear(&self) {
        self.lock().statements.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn record(&self, sql: &str) -> Result<MutexGuard<'_, MockState>> {
        let mut state = self.lock();
        log::trace!("Mock `{}`", sql);

        if let Some(msg) = state.failure.take() {
            return Err(porm::error::database!("{}, sql: `{}`", msg, sql));
        }
        state.statements.push(sql.to_string());

        Ok(state)
    }
}

impl Driver for MockDriver {
    fn query(&self, sql: &str) -> Result<Vec<Row>> {
        let mut state = self.record(sql)?;

        Ok(state.results.pop_front().unwrap_or_default())
    }

    fn execute(&self, sql: &str) -> Result<u64> {
        let _state = self.record(sql)?;

        Ok(1)
    }

    fn execute_many(&self, sqls: &[String]) -> Result<()> {
        for sql in sqls {
            let _state = self.record(sql)?;
        }

        Ok(())
    }

    fn insert(&self, sql: &str) -> Result<Value> {
        let mut state = self.record(sql)?;

        match state.ids.pop_front() {
            Some(id) => Ok(id),
            None => {
                state.next_id += 1;
                Ok(Value::UInt(state.next_id))
            }
        }
    }
}
