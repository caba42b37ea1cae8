//! Person domain model
//!
//! Two representations exist on purpose. `Person` is a fully decoded stored
//! row: `name` and `surname` are always present, the rest is optional because
//! the matching columns are nullable. `PersonPatch` is the sparse payload used
//! for inserts, equality filters and partial updates: every attribute is an
//! explicit `Option`, so "not provided" is distinguishable from any real
//! value. There is deliberately no way to express "clear this field".

use serde::Serialize;

/// A person as stored, with nullable columns decoded to options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub surname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patronymic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
}

/// Sparse person payload: `None` fields do not participate in the operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonPatch {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
}

impl PersonPatch {
    /// True when no field is provided at all.
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.name.is_none()
            && self.surname.is_none()
            && self.patronymic.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.nationality.is_none()
    }

    /// Collapse empty strings to `None`.
    ///
    /// Wire input cannot distinguish "field omitted" from "field sent empty";
    /// both mean "not provided" here, so an empty value can never reach the
    /// query builder and be written out as an empty column.
    pub fn normalize(mut self) -> Self {
        fn drop_empty(field: &mut Option<String>) {
            if matches!(field.as_deref(), Some("")) {
                *field = None;
            }
        }

        drop_empty(&mut self.name);
        drop_empty(&mut self.surname);
        drop_empty(&mut self.patronymic);
        drop_empty(&mut self.gender);
        drop_empty(&mut self.nationality);
        self
    }
}
