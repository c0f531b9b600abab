use porm_conn::{Connection, Row};
use porm_error::Result;
use porm_query::{
    eq, ColumnRef, ComparisonOperator, Conditional, ConditionalStatement, Operand, QueryBuilder,
    Value,
};

use crate::{Pojo, Registry};

/// Runs pojo persistence over a [`Connection`], instantiating pojos it
/// creates itself through a [`Registry`]
#[derive(Debug, Clone)]
pub struct PojoEngine {
    conn: Connection,
    registry: Registry,
}

impl PojoEngine {
    pub fn new(conn: Connection, registry: Registry) -> Self {
        Self { conn, registry }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// `CREATE TABLE` from the declared columns and foreign keys
    pub fn create_table(&self, pojo: &Pojo) -> Result<()> {
        let sql = create_table_sql(pojo)?;
        self.conn
            .execute_update(&format!("Create table `{}`", pojo.table()), &sql)?;

        Ok(())
    }

    /// Create the tables of several pojos in one transaction, in the order
    /// given
    pub fn create_tables(&self, pojos: &[&Pojo]) -> Result<()> {
        let pairs = pojos
            .iter()
            .map(|p| -> Result<(String, String)> {
                Ok((format!("Create table `{}`", p.table()), create_table_sql(p)?))
            })
            .collect::<Result<Vec<_>>>()?;

        self.conn.execute_updates("Create tables", &pairs)
    }

    pub fn drop_table(&self, pojo: &Pojo) -> Result<()> {
        let sql = QueryBuilder::drop_table(pojo.table())
            .if_exists()
            .build()?
            .to_string();
        self.conn
            .execute_update(&format!("Drop table `{}`", pojo.table()), &sql)?;

        Ok(())
    }

    /// Load the row identified by `id` into `pojo`
    ///
    /// With `hydrate_children` every declared sub pojo is loaded as well:
    /// an attached child is reloaded by its own identifier, an unattached one
    /// is instantiated and loaded by the parent's foreign id value.
    pub fn retrieve_values<V: Into<Value>>(
        &self,
        pojo: &mut Pojo,
        id: V,
        hydrate_children: bool,
    ) -> Result<()> {
        let id = id.into();
        log::debug!("Retrieve `{}` {} = {}", pojo.type_tag(), pojo.id_column(), id);

        let sql = QueryBuilder::select(pojo.columns().iter().map(|c| c.name()))
            .from([pojo.table()])
            .where_cond(eq!(pojo.id_column(), id.clone()))
            .build()?
            .to_string();
        let row = self.conn.query_one_map(
            &format!("Retrieve `{}` {}", pojo.table(), id),
            &sql,
            |row| Ok(row.clone()),
        )?;
        populate(pojo, &row)?;

        if hydrate_children {
            self.hydrate(pojo)?;
        }

        Ok(())
    }

    fn hydrate(&self, pojo: &mut Pojo) -> Result<()> {
        let defs = pojo.sub_pojo_definitions().to_vec();

        for def in defs {
            let key = def.key();

            if let Some(mut child) = pojo.detach(key) {
                let res = match child.id().cloned() {
                    Some(child_id) => {
                        log::trace!("Reload sub pojo `{}` of `{}`", key, pojo.type_tag());
                        self.retrieve_values(&mut child, child_id, true)
                    }
                    None => Err(porm_error::argument!(
                        "Sub pojo `{}` of `{}` has no identifier value",
                        key,
                        pojo.type_tag()
                    )),
                };
                pojo.put_sub_pojo(key, child);
                res?;
            } else if let (Some(id_column), Some(pojo_type)) = (def.id_column(), def.pojo_type())
            {
                let child_id = match pojo.get(id_column) {
                    Some(v) if !v.is_null() => v.clone(),
                    _ => {
                        log::trace!(
                            "Sub pojo `{}` of `{}` has no foreign id",
                            key,
                            pojo.type_tag()
                        );
                        continue;
                    }
                };

                log::trace!(
                    "Load sub pojo `{}` of `{}` as `{}` {}",
                    key,
                    pojo.type_tag(),
                    pojo_type,
                    child_id
                );
                let mut child = self.registry.instantiate(pojo_type)?;
                self.retrieve_values(&mut child, child_id, true)?;
                pojo.put_sub_pojo(key, child);
            }
        }

        Ok(())
    }

    /// Insert `pojo` when it has no identifier, update it otherwise
    ///
    /// Returns the generated identifier after an insert, `None` after an
    /// update. With `store_children` every attached child is stored after the
    /// parent and its identifier is copied into the parent's foreign id
    /// column; when that changes a foreign id the parent row is updated once
    /// more.
    pub fn store_values(&self, pojo: &mut Pojo, store_children: bool) -> Result<Option<Value>> {
        let generated = self.upsert(pojo)?;

        if store_children {
            self.store_children(pojo)?;
        }

        Ok(generated)
    }

    fn upsert(&self, pojo: &mut Pojo) -> Result<Option<Value>> {
        let (columns, values): (Vec<String>, Vec<Value>) = pojo
            .columns()
            .iter()
            .filter(|c| c.name() != pojo.id_column())
            .map(|c| {
                let value = pojo.get(c.name()).cloned().unwrap_or(Value::Null);
                (c.name().to_string(), value)
            })
            .unzip();

        match pojo.id().cloned() {
            None => {
                log::debug!("Insert `{}`", pojo.type_tag());

                let raw = if columns.is_empty() {
                    self.conn.insert_and_get_id(
                        pojo.table(),
                        pojo.id_column(),
                        &[pojo.id_column().to_string()],
                        &[Value::Null],
                    )?
                } else {
                    self.conn
                        .insert_and_get_id(pojo.table(), pojo.id_column(), &columns, &values)?
                };

                let id_def = pojo.column(pojo.id_column()).ok_or_else(|| {
                    porm_error::argument!(
                        "Pojo `{}` declares no column `{}`",
                        pojo.type_tag(),
                        pojo.id_column()
                    )
                })?;
                let id = id_def.read_value(&raw)?;
                let id_column = pojo.id_column().to_string();
                pojo.put_value(&id_column, id.clone());

                Ok(Some(id))
            }
            Some(id) => {
                log::debug!("Update `{}` {} = {}", pojo.type_tag(), pojo.id_column(), id);

                if !columns.is_empty() {
                    self.conn.update(
                        pojo.table(),
                        &columns,
                        &values,
                        &[pojo.id_column().to_string()],
                        &[id],
                    )?;
                }

                Ok(None)
            }
        }
    }

    fn store_children(&self, pojo: &mut Pojo) -> Result<()> {
        let defs = pojo.sub_pojo_definitions().to_vec();
        let mut backfilled = Vec::<(String, Value)>::new();

        for def in defs {
            let key = def.key();
            let mut child = match pojo.detach(key) {
                Some(child) => child,
                None => continue,
            };

            log::trace!("Store sub pojo `{}` of `{}`", key, pojo.type_tag());
            let res = self.store_values(&mut child, true);
            let child_id = child.id().cloned();
            pojo.put_sub_pojo(key, child);
            res?;

            if let (Some(id_column), Some(child_id)) = (def.id_column(), child_id) {
                let child_id = match pojo.column(id_column) {
                    Some(col) => col.read_value(&child_id)?,
                    None => child_id,
                };
                if pojo.get(id_column) != Some(&child_id) {
                    pojo.put_value(id_column, child_id.clone());
                    backfilled.push((id_column.to_string(), child_id));
                }
            }
        }

        if backfilled.is_empty() {
            return Ok(());
        }

        let id = pojo.id().cloned().ok_or_else(|| {
            porm_error::argument!("Pojo `{}` has no identifier value", pojo.type_tag())
        })?;
        log::debug!(
            "Update foreign ids of `{}` {} = {}",
            pojo.type_tag(),
            pojo.id_column(),
            id
        );
        let (columns, values): (Vec<String>, Vec<Value>) = backfilled.into_iter().unzip();
        self.conn.update(
            pojo.table(),
            &columns,
            &values,
            &[pojo.id_column().to_string()],
            &[id],
        )?;

        Ok(())
    }

    /// Search rows matching every non-NULL value of `pojo` and of the
    /// attached children selected by `sub_keys`
    ///
    /// Each row becomes a new pojo of `result_type`. A selected child without
    /// any non-NULL value adds neither its table nor its junction.
    pub fn do_search(
        &self,
        pojo: &Pojo,
        result_type: &str,
        sub_keys: &[&str],
    ) -> Result<Vec<Pojo>> {
        let mut tables = vec![pojo.table().to_string()];
        let mut conds = filters(pojo);

        for key in sub_keys {
            let def = pojo.sub_pojo_definition(key).ok_or_else(|| {
                porm_error::argument!(
                    "Pojo `{}` declares no sub pojo `{}`",
                    pojo.type_tag(),
                    key
                )
            })?;
            let child = match pojo.sub_pojo(key) {
                Some(child) => child,
                None => continue,
            };

            let child_conds = filters(child);
            if child_conds.is_empty() {
                log::trace!("Sub pojo `{}` has no filter, skip join", key);
                continue;
            }

            let junction = def.junction().ok_or_else(|| {
                porm_error::argument!(
                    "Sub pojo `{}` of `{}` declares no junction",
                    key,
                    pojo.type_tag()
                )
            })?;
            tables.push(child.table().to_string());
            conds.extend(child_conds);
            conds.push(ConditionalStatement::compare(
                junction.parent().clone(),
                ComparisonOperator::Eq,
                Operand::Column(junction.child().clone()),
            ));
        }

        let mut builder = QueryBuilder::select(
            pojo.columns()
                .iter()
                .map(|c| ColumnRef::qualified(pojo.table(), c.name())),
        )
        .from(tables);
        if let Some(cond) = Conditional::all(conds) {
            builder.where_cond(cond);
        }
        let sql = builder.build()?.to_string();

        self.conn.query_many_map(
            &format!("Search `{}` as `{}`", pojo.type_tag(), result_type),
            &sql,
            |row| {
                let mut result = self.registry.instantiate(result_type)?;
                populate(&mut result, row)?;
                Ok(result)
            },
        )
    }

    /// `DELETE` the row identified by the pojo's identifier
    pub fn delete_values(&self, pojo: &Pojo) -> Result<u64> {
        let id = pojo.id().cloned().ok_or_else(|| {
            porm_error::argument!("Pojo `{}` has no identifier value", pojo.type_tag())
        })?;
        log::debug!("Delete `{}` {} = {}", pojo.type_tag(), pojo.id_column(), id);

        let sql = QueryBuilder::delete(pojo.table())
            .where_cond(eq!(pojo.id_column(), id))
            .build()?
            .to_string();

        self.conn
            .execute_update(&format!("Delete from `{}`", pojo.table()), &sql)
    }
}

fn create_table_sql(pojo: &Pojo) -> Result<String> {
    Ok(QueryBuilder::create_table(pojo.table())
        .columns(pojo.columns().to_vec())
        .foreign_keys(pojo.foreign_keys().to_vec())
        .build()?
        .to_string())
}

/// Equality filter on every non-NULL value, table qualified
fn filters(pojo: &Pojo) -> Vec<Conditional> {
    pojo.non_null_values()
        .map(|(c, v)| eq!(ColumnRef::qualified(pojo.table(), c.name()), v.clone()))
        .collect()
}

/// Assign every declared column from the row
fn populate(pojo: &mut Pojo, row: &Row) -> Result<()> {
    let mut values = Vec::with_capacity(pojo.columns().len());
    for def in pojo.columns() {
        let raw = row.get_value(&format!("{}.{}", pojo.table(), def.name()))?;
        values.push((def.name().to_string(), def.read_value(raw)?));
    }

    for (column, value) in values {
        pojo.put_value(&column, value);
    }

    Ok(())
}
