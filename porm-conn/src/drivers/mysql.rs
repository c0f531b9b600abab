use std::sync::Mutex;

use chrono::{NaiveDate, NaiveTime};
use mysql_lib::prelude::Queryable;
use porm_error::Result;

use crate::{Driver, Row, Value};

pub struct MysqlConnProxy {
    conn: Mutex<mysql_lib::Conn>,
}

impl MysqlConnProxy {
    pub fn new(conn: mysql_lib::Conn) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut mysql_lib::Conn) -> Result<T>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| porm_error::connection!("MysqlConnProxy lock error: {}", e))?;

        f(&mut conn)
    }
}

impl Driver for MysqlConnProxy {
    fn query(&self, sql: &str) -> Result<Vec<Row>> {
        self.with_conn(|conn| {
            log::trace!("Query `{}`", sql);
            let sql_rows = conn
                .query_iter(sql)
                .map_err(|e| porm_error::database!("Query error: {}, sql: `{}`", e, sql))?;

            let mut rows = Vec::<Row>::new();
            for res in sql_rows {
                let mysql_row = res.map_err(|e| porm_error::database!("Get row error: {}", e))?;
                let row = mysql_row_to_porm_row(mysql_row)?;
                log::trace!("Append row: {:?}", row);
                rows.push(row);
            }

            Ok(rows)
        })
    }

    fn execute(&self, sql: &str) -> Result<u64> {
        self.with_conn(|conn| {
            log::trace!("Execute `{}`", sql);
            conn.query_drop(sql)
                .map_err(|e| porm_error::database!("Execute error: {}, sql: `{}`", e, sql))?;

            Ok(conn.affected_rows())
        })
    }

    fn execute_many(&self, sqls: &[String]) -> Result<()> {
        self.with_conn(|conn| {
            log::trace!("Start transaction");
            let mut tx = conn
                .start_transaction(mysql_lib::TxOpts::default())
                .map_err(|e| porm_error::database!("Start transaction error: {}", e))?;

            for sql in sqls {
                log::trace!("Execute `{}`", sql);
                tx.query_drop(sql)
                    .map_err(|e| porm_error::database!("Execute error: {}, sql: `{}`", e, sql))?;
            }

            log::trace!("Commit transaction");
            tx.commit()
                .map_err(|e| porm_error::database!("Commit error: {}", e))
        })
    }

    fn insert(&self, sql: &str) -> Result<Value> {
        self.with_conn(|conn| {
            log::trace!("Insert `{}`", sql);
            conn.query_drop(sql)
                .map_err(|e| porm_error::database!("Insert error: {}, sql: `{}`", e, sql))?;

            Ok(Value::UInt(conn.last_insert_id()))
        })
    }
}

fn mysql_row_to_porm_row(src: mysql_lib::Row) -> Result<Row> {
    let mut columns = Vec::with_capacity(src.len());
    let mut values = Vec::with_capacity(src.len());
    let cols = src.columns_ref();
    for i in 0..src.len() {
        let column_name = cols
            .get(i)
            .ok_or_else(|| porm_error::database!("Cannot get column name of index {}", i))?
            .name_str()
            .to_string();

        let value = match src.as_ref(i) {
            Some(mysql_value) => mysql_value_to_porm_value(mysql_value)?,
            None => Value::Null,
        };

        columns.push(column_name);
        values.push(value);
    }

    Ok(Row::new(columns, values))
}

fn mysql_value_to_porm_value(src: &mysql_lib::Value) -> Result<Value> {
    let invalid = || porm_error::database!("Unsupported mysql value: {:?}", src);

    let value = match src {
        mysql_lib::Value::NULL => Value::Null,
        mysql_lib::Value::Bytes(v) => Value::Bytes(v.clone()),
        mysql_lib::Value::Int(v) => Value::Int(*v),
        mysql_lib::Value::UInt(v) => Value::UInt(*v),
        mysql_lib::Value::Float(v) => Value::Float(*v as f64),
        mysql_lib::Value::Double(v) => Value::Float(*v),
        mysql_lib::Value::Date(y, m, d, h, mi, s, us) => {
            let date = NaiveDate::from_ymd_opt(*y as i32, *m as u32, *d as u32)
                .ok_or_else(invalid)?;
            if (*h, *mi, *s, *us) == (0, 0, 0, 0) {
                Value::Date(date)
            } else {
                Value::DateTime(
                    date.and_hms_micro_opt(*h as u32, *mi as u32, *s as u32, *us)
                        .ok_or_else(invalid)?,
                )
            }
        }
        mysql_lib::Value::Time(false, 0, h, mi, s, us) => Value::Time(
            NaiveTime::from_hms_micro_opt(*h as u32, *mi as u32, *s as u32, *us)
                .ok_or_else(invalid)?,
        ),
        mysql_lib::Value::Time(..) => return Err(invalid()),
    };

    Ok(value)
}
