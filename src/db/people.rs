//! Person store: insert, filtered list, partial update, delete
//!
//! Every operation issues exactly one statement, assembled from the ordered
//! parts the query builder produced. Store-specific failures are converted
//! into the crate error taxonomy right here at the boundary.

use sqlx::postgres::PgArguments;
use sqlx::query::{Query, QueryAs};
use sqlx::{PgPool, Postgres};
use tracing::debug;

use crate::db::query::{BindValue, QueryParts};
use crate::error::{Error, Result};
use crate::model::{Person, PersonPatch};

/// PostgreSQL SQLSTATE for a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Person persistence over a shared connection pool.
#[derive(Clone)]
pub struct PersonStore {
    pool: PgPool,
}

impl PersonStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert the provided fields and return the generated id.
    ///
    /// A natural-key collision surfaces as [`Error::AlreadyExists`].
    pub async fn add(&self, patch: &PersonPatch) -> Result<i64> {
        let parts = QueryParts::from_patch(patch);
        if parts.is_empty() {
            return Err(Error::InvalidInput("no fields to insert".to_string()));
        }

        let sql = format!(
            "INSERT INTO people ({}) VALUES ({}) RETURNING id",
            parts.column_list(),
            parts.placeholder_list(),
        );
        debug!(sql = %sql, "inserting person");

        let (id,): (i64,) = bind_values_as(sqlx::query_as(&sql), &parts.values)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        debug!(id, "person added");
        Ok(id)
    }

    /// List persons matching every provided field of `filter`.
    ///
    /// A positive `limit` appends `LIMIT`/`OFFSET` as two extra positional
    /// parameters numbered after the filter columns. An empty filter scans
    /// the whole table. No match is an empty vec, not an error.
    pub async fn list(&self, filter: &PersonPatch, limit: i64, offset: i64) -> Result<Vec<Person>> {
        let parts = QueryParts::from_patch(filter);

        let mut sql =
            "SELECT id, name, surname, patronymic, age, gender, nationality FROM people"
                .to_string();
        if !parts.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&parts.where_clause());
        }
        if limit > 0 {
            sql.push_str(&format!(
                " LIMIT ${} OFFSET ${}",
                parts.next_index(),
                parts.next_index() + 1,
            ));
        }
        debug!(sql = %sql, "listing persons");

        let mut query = bind_values_as::<PersonRow>(sqlx::query_as(&sql), &parts.values);
        if limit > 0 {
            query = query.bind(limit).bind(offset);
        }

        let rows = query.fetch_all(&self.pool).await.map_err(map_db_error)?;
        debug!(count = rows.len(), "persons found");

        Ok(rows.into_iter().map(Person::from).collect())
    }

    /// Apply the provided fields of `patch` to the row with `id`.
    ///
    /// Omitted fields are left untouched. Refuses an entirely sparse patch
    /// before any statement is issued.
    pub async fn update(&self, id: i64, patch: &PersonPatch) -> Result<()> {
        let parts = QueryParts::from_patch(patch);
        if parts.is_empty() {
            return Err(Error::NothingToUpdate);
        }

        let sql = format!(
            "UPDATE people SET {} WHERE id = ${}",
            parts.set_clause(),
            parts.next_index(),
        );
        debug!(sql = %sql, id, "updating person");

        let result = bind_values(sqlx::query(&sql), &parts.values)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            debug!(id, "person not found for update");
            return Err(Error::NotFound);
        }

        debug!(id, "person updated");
        Ok(())
    }

    /// Delete the row with `id`.
    pub async fn delete(&self, id: i64) -> Result<()> {
        debug!(id, "deleting person");

        let result = sqlx::query("DELETE FROM people WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            debug!(id, "person not found for delete");
            return Err(Error::NotFound);
        }

        debug!(id, "person deleted");
        Ok(())
    }
}

/// Raw row shape: nullable columns stay options until converted to the
/// domain model. Kept separate from [`Person`] so the NULL-to-absent
/// conversion is testable without a live database.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
struct PersonRow {
    id: i64,
    name: String,
    surname: String,
    patronymic: Option<String>,
    age: Option<i64>,
    gender: Option<String>,
    nationality: Option<String>,
}

impl From<PersonRow> for Person {
    fn from(row: PersonRow) -> Self {
        Person {
            id: row.id,
            name: row.name,
            surname: row.surname,
            patronymic: row.patronymic,
            age: row.age,
            gender: row.gender,
            nationality: row.nationality,
        }
    }
}

/// Bind builder values, in order, onto a plain query.
fn bind_values<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    values: &'q [BindValue],
) -> Query<'q, Postgres, PgArguments> {
    for value in values {
        query = match value {
            BindValue::Int(v) => query.bind(*v),
            BindValue::Text(v) => query.bind(v.as_str()),
        };
    }
    query
}

/// Bind builder values, in order, onto a row-decoding query.
fn bind_values_as<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    values: &'q [BindValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for value in values {
        query = match value {
            BindValue::Int(v) => query.bind(*v),
            BindValue::Text(v) => query.bind(v.as_str()),
        };
    }
    query
}

/// Convert store-level failures into the crate taxonomy.
fn map_db_error(err: sqlx::Error) -> Error {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return Error::AlreadyExists;
        }
    }
    Error::Database(err)
}
