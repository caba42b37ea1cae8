//! Attribute-driven query construction
//!
//! Translates a sparse [`PersonPatch`] into the ordered column / value /
//! placeholder lists the store operations assemble their statements from.
//! Pure code: no I/O, deterministic output, and the only place that knows
//! the fixed field order.

use crate::model::PersonPatch;

/// A value bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Int(i64),
    Text(String),
}

/// Ordered columns, bound values and `$N` placeholders for the provided
/// fields of one sparse person.
///
/// The three vectors always have equal length and placeholder numbering is
/// contiguous starting at `$1`. Callers appending extra positional arguments
/// (pagination bounds, the id of an UPDATE's WHERE clause) must continue
/// numbering from [`QueryParts::next_index`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct QueryParts {
    pub columns: Vec<&'static str>,
    pub values: Vec<BindValue>,
    pub placeholders: Vec<String>,
}

impl QueryParts {
    /// Collect the provided fields of `patch` in the fixed order
    /// id, name, surname, patronymic, age, gender, nationality.
    pub fn from_patch(patch: &PersonPatch) -> Self {
        let mut parts = QueryParts::default();

        if let Some(id) = patch.id {
            parts.push("id", BindValue::Int(id));
        }
        if let Some(name) = &patch.name {
            parts.push("name", BindValue::Text(name.clone()));
        }
        if let Some(surname) = &patch.surname {
            parts.push("surname", BindValue::Text(surname.clone()));
        }
        if let Some(patronymic) = &patch.patronymic {
            parts.push("patronymic", BindValue::Text(patronymic.clone()));
        }
        if let Some(age) = patch.age {
            parts.push("age", BindValue::Int(age));
        }
        if let Some(gender) = &patch.gender {
            parts.push("gender", BindValue::Text(gender.clone()));
        }
        if let Some(nationality) = &patch.nationality {
            parts.push("nationality", BindValue::Text(nationality.clone()));
        }

        parts
    }

    fn push(&mut self, column: &'static str, value: BindValue) {
        self.placeholders.push(format!("${}", self.values.len() + 1));
        self.columns.push(column);
        self.values.push(value);
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Placeholder index for the next positional argument after these parts.
    pub fn next_index(&self) -> usize {
        self.len() + 1
    }

    /// `"name, age"` — for an INSERT column list.
    pub fn column_list(&self) -> String {
        self.columns.join(", ")
    }

    /// `"$1, $2"` — for an INSERT VALUES list.
    pub fn placeholder_list(&self) -> String {
        self.placeholders.join(", ")
    }

    /// `"name = $1, age = $2"` — for an UPDATE SET clause.
    pub fn set_clause(&self) -> String {
        self.pairs().join(", ")
    }

    /// `"name = $1 AND age = $2"` — for a WHERE equality predicate.
    pub fn where_clause(&self) -> String {
        self.pairs().join(" AND ")
    }

    fn pairs(&self) -> Vec<String> {
        self.columns
            .iter()
            .zip(&self.placeholders)
            .map(|(column, placeholder)| format!("{} = {}", column, placeholder))
            .collect()
    }
}
