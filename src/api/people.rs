//! Person CRUD handlers
//!
//! Create and update run the enrichment pipeline before touching the store;
//! update skips it when the incoming name matches the stored one, since all
//! three classifications are keyed by first name only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::enrich;
use crate::error::{Error, Result};
use crate::model::{Person, PersonPatch};
use crate::AppState;

/// Request body for POST /people and PUT /people/:id.
#[derive(Debug, Deserialize)]
pub struct PersonRequest {
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub patronymic: Option<String>,
}

impl PersonRequest {
    /// Validate required fields and build the sparse payload.
    fn into_patch(self) -> Result<PersonPatch> {
        let patch = PersonPatch {
            name: Some(self.name),
            surname: Some(self.surname),
            patronymic: self.patronymic,
            ..Default::default()
        }
        .normalize();

        if patch.name.is_none() {
            return Err(Error::InvalidInput("name must not be empty".to_string()));
        }
        if patch.surname.is_none() {
            return Err(Error::InvalidInput("surname must not be empty".to_string()));
        }

        Ok(patch)
    }
}

/// Query parameters for GET /people. Every person field is an optional
/// equality filter; limit/offset bound the result when limit is positive.
///
/// Numeric params go through [`empty_tolerant_i64`]: a `?age=` with no value
/// means "not provided", the same way empty string fields are normalized
/// away, not a malformed number.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default, deserialize_with = "empty_tolerant_i64")]
    pub id: Option<i64>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    #[serde(default, deserialize_with = "empty_tolerant_i64")]
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    #[serde(default, deserialize_with = "empty_tolerant_i64")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "empty_tolerant_i64")]
    pub offset: Option<i64>,
}

/// Query-string numbers arrive as text and may be empty-valued.
fn empty_tolerant_i64<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

impl ListQuery {
    fn into_filter(self) -> Result<(PersonPatch, i64, i64)> {
        let limit = self.limit.unwrap_or(0);
        let offset = self.offset.unwrap_or(0);
        if limit < 0 {
            return Err(Error::InvalidInput("limit must not be negative".to_string()));
        }
        if offset < 0 {
            return Err(Error::InvalidInput("offset must not be negative".to_string()));
        }

        let filter = PersonPatch {
            id: self.id,
            name: self.name,
            surname: self.surname,
            patronymic: self.patronymic,
            age: self.age,
            gender: self.gender,
            nationality: self.nationality,
        }
        .normalize();

        Ok((filter, limit, offset))
    }
}

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub id: i64,
    pub message: &'static str,
}

/// POST /people
pub async fn create_person(
    State(state): State<AppState>,
    Json(request): Json<PersonRequest>,
) -> Result<(StatusCode, Json<MutationResponse>)> {
    let mut patch = request.into_patch()?;
    debug!(?patch, "creating person");

    enrich::enrich(state.sources.as_ref(), &mut patch).await?;

    let id = state.store.add(&patch).await?;
    info!(id, "person added");

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            id,
            message: "person added",
        }),
    ))
}

/// GET /people
pub async fn list_people(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Person>>> {
    let (filter, limit, offset) = query.into_filter()?;
    debug!(?filter, limit, offset, "listing persons");

    let persons = state.store.list(&filter, limit, offset).await?;
    info!(count = persons.len(), "persons listed");

    Ok(Json(persons))
}

/// PUT /people/:id
pub async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<PersonRequest>,
) -> Result<Json<MutationResponse>> {
    let mut patch = request.into_patch()?;
    debug!(id, ?patch, "updating person");

    let incoming_name = patch
        .name
        .clone()
        .ok_or_else(|| Error::InvalidInput("name must not be empty".to_string()))?;

    // Classifications key off the first name; keep the stored values when
    // the name did not change.
    if name_changed(&state, id, &incoming_name).await? {
        debug!(id, "name changed, re-enriching");
        enrich::enrich(state.sources.as_ref(), &mut patch).await?;
    } else {
        debug!(id, "name unchanged, enrichment skipped");
    }

    state.store.update(id, &patch).await?;
    info!(id, "person updated");

    Ok(Json(MutationResponse {
        id,
        message: "person updated",
    }))
}

/// DELETE /people/:id
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MutationResponse>> {
    state.store.delete(id).await?;
    info!(id, "person deleted");

    Ok(Json(MutationResponse {
        id,
        message: "person deleted",
    }))
}

/// Compare the incoming name against the stored row.
///
/// A missing row is `NotFound`: updating a person that does not exist is a
/// distinct, reportable condition rather than a lookup failure.
async fn name_changed(state: &AppState, id: i64, incoming_name: &str) -> Result<bool> {
    let by_id = PersonPatch {
        id: Some(id),
        ..Default::default()
    };
    let stored = state.store.list(&by_id, 0, 0).await?;

    let Some(person) = stored.first() else {
        return Err(Error::NotFound);
    };

    Ok(person.name != incoming_name)
}
