//! Name-based enrichment pipeline
//!
//! Three independent classification sources are consulted for the person's
//! first name, always in the same order: gender, then age, then nationality.
//! The pipeline is fail-fast: the first stage failure aborts it with a
//! stage-tagged error and later stages are not attempted, so a caller never
//! persists a half-enriched person without knowing a dependency failed.

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::PersonPatch;

pub mod http;

pub use http::HttpSources;

/// Pipeline stage names, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Gender,
    Age,
    Nationality,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Gender => "gender",
            Stage::Age => "age",
            Stage::Nationality => "nationality",
        };
        f.write_str(name)
    }
}

/// Failure of a single classification fetch.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport failure or non-2xx status
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// Response body did not decode as the expected JSON shape
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Gender judgment for a name. The source may return `null` when it has no
/// opinion; that leaves the field unset rather than failing the stage.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenderReading {
    pub gender: Option<String>,
    #[serde(default)]
    pub probability: f64,
}

/// Age estimate for a name, `null` when the source has no data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgeReading {
    pub age: Option<i64>,
}

/// Ranked nationality candidates for a name, pre-sorted by the source in
/// descending probability.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NationalityReading {
    #[serde(rename = "country", default)]
    pub countries: Vec<CountryCandidate>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CountryCandidate {
    pub country_id: String,
    pub probability: f64,
}

impl NationalityReading {
    /// Highest-ranked candidate, if the source returned any.
    pub fn top(&self) -> Option<&CountryCandidate> {
        self.countries.first()
    }
}

/// The three classification sources the pipeline consults.
///
/// Implemented over HTTP by [`HttpSources`]; tests substitute stubs.
#[async_trait]
pub trait ClassifySources: Send + Sync {
    async fn gender(&self, name: &str) -> std::result::Result<GenderReading, SourceError>;
    async fn age(&self, name: &str) -> std::result::Result<AgeReading, SourceError>;
    async fn nationality(&self, name: &str)
        -> std::result::Result<NationalityReading, SourceError>;
}

/// Run the three stages in order, mutating `person` in place.
///
/// On error, stages completed before the failure have already been applied;
/// later fields are untouched.
pub async fn enrich<S: ClassifySources>(sources: &S, person: &mut PersonPatch) -> Result<()> {
    let name = person
        .name
        .clone()
        .ok_or_else(|| Error::InvalidInput("name is required for enrichment".to_string()))?;

    info!(name = %name, "starting enrichment");

    let gender = sources.gender(&name).await.map_err(|source| Error::Enrichment {
        stage: Stage::Gender,
        source,
    })?;
    person.gender = gender.gender;
    debug!(gender = ?person.gender, "gender stage complete");

    let age = sources.age(&name).await.map_err(|source| Error::Enrichment {
        stage: Stage::Age,
        source,
    })?;
    person.age = age.age;
    debug!(age = ?person.age, "age stage complete");

    let nationality = sources
        .nationality(&name)
        .await
        .map_err(|source| Error::Enrichment {
            stage: Stage::Nationality,
            source,
        })?;
    // An empty candidate list is not an error; nationality stays unset.
    person.nationality = nationality.top().map(|c| c.country_id.clone());
    debug!(nationality = ?person.nationality, "nationality stage complete");

    info!(name = %name, "enrichment complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Stub sources recording which stages were called.
    struct StubSources {
        calls: Mutex<Vec<Stage>>,
        gender: std::result::Result<GenderReading, String>,
        age: std::result::Result<AgeReading, String>,
        nationality: std::result::Result<NationalityReading, String>,
    }

    impl StubSources {
        fn happy() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                gender: Ok(GenderReading {
                    gender: Some("female".to_string()),
                    probability: 0.98,
                }),
                age: Ok(AgeReading { age: Some(30) }),
                nationality: Ok(NationalityReading {
                    countries: vec![
                        CountryCandidate {
                            country_id: "RU".to_string(),
                            probability: 0.7,
                        },
                        CountryCandidate {
                            country_id: "UA".to_string(),
                            probability: 0.3,
                        },
                    ],
                }),
            }
        }

        fn called(&self) -> Vec<Stage> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ClassifySources for StubSources {
        async fn gender(&self, _: &str) -> std::result::Result<GenderReading, SourceError> {
            self.calls.lock().unwrap().push(Stage::Gender);
            self.gender.clone().map_err(SourceError::Unavailable)
        }

        async fn age(&self, _: &str) -> std::result::Result<AgeReading, SourceError> {
            self.calls.lock().unwrap().push(Stage::Age);
            self.age.clone().map_err(SourceError::Unavailable)
        }

        async fn nationality(
            &self,
            _: &str,
        ) -> std::result::Result<NationalityReading, SourceError> {
            self.calls.lock().unwrap().push(Stage::Nationality);
            self.nationality.clone().map_err(SourceError::Unavailable)
        }
    }

    fn named(name: &str) -> PersonPatch {
        PersonPatch {
            name: Some(name.to_string()),
            surname: Some("Lee".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn all_stages_in_order() {
        let sources = StubSources::happy();
        let mut person = named("Ann");

        enrich(&sources, &mut person).await.unwrap();

        assert_eq!(person.gender.as_deref(), Some("female"));
        assert_eq!(person.age, Some(30));
        assert_eq!(person.nationality.as_deref(), Some("RU"));
        assert_eq!(
            sources.called(),
            vec![Stage::Gender, Stage::Age, Stage::Nationality]
        );
    }

    #[tokio::test]
    async fn gender_failure_aborts_before_later_stages() {
        let mut sources = StubSources::happy();
        sources.gender = Err("connection refused".to_string());
        let mut person = named("Ann");

        let err = enrich(&sources, &mut person).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Enrichment {
                stage: Stage::Gender,
                ..
            }
        ));
        assert_eq!(person.gender, None);
        assert_eq!(person.age, None);
        assert_eq!(person.nationality, None);
        assert_eq!(sources.called(), vec![Stage::Gender]);
    }

    #[tokio::test]
    async fn age_failure_keeps_completed_gender_stage() {
        let mut sources = StubSources::happy();
        sources.age = Err("status 503".to_string());
        let mut person = named("Ann");

        let err = enrich(&sources, &mut person).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Enrichment {
                stage: Stage::Age,
                ..
            }
        ));
        assert_eq!(person.gender.as_deref(), Some("female"));
        assert_eq!(person.age, None);
        assert_eq!(person.nationality, None);
        assert_eq!(sources.called(), vec![Stage::Gender, Stage::Age]);
    }

    #[tokio::test]
    async fn empty_candidate_list_is_success_without_nationality() {
        let mut sources = StubSources::happy();
        sources.nationality = Ok(NationalityReading { countries: vec![] });
        let mut person = named("Ann");

        enrich(&sources, &mut person).await.unwrap();

        assert_eq!(person.nationality, None);
        assert_eq!(person.gender.as_deref(), Some("female"));
        assert_eq!(person.age, Some(30));
    }

    #[tokio::test]
    async fn highest_ranked_candidate_wins() {
        let sources = StubSources::happy();
        let mut person = named("Ann");

        enrich(&sources, &mut person).await.unwrap();

        // First element as returned by the source, never a lower-ranked one.
        assert_eq!(person.nationality.as_deref(), Some("RU"));
    }

    #[tokio::test]
    async fn missing_name_is_invalid_input() {
        let sources = StubSources::happy();
        let mut person = PersonPatch::default();

        let err = enrich(&sources, &mut person).await.unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(sources.called().is_empty());
    }

    #[test]
    fn decodes_gender_payload() {
        let reading: GenderReading =
            serde_json::from_str(r#"{"count":1234,"name":"Ann","gender":"female","probability":0.98}"#)
                .unwrap();
        assert_eq!(reading.gender.as_deref(), Some("female"));
    }

    #[test]
    fn decodes_null_gender_as_unset() {
        let reading: GenderReading =
            serde_json::from_str(r#"{"count":0,"name":"Xq","gender":null,"probability":0.0}"#)
                .unwrap();
        assert_eq!(reading.gender, None);
    }

    #[test]
    fn decodes_age_payload_including_null() {
        let reading: AgeReading =
            serde_json::from_str(r#"{"count":1234,"name":"Ann","age":30}"#).unwrap();
        assert_eq!(reading.age, Some(30));

        let reading: AgeReading =
            serde_json::from_str(r#"{"count":0,"name":"Xq","age":null}"#).unwrap();
        assert_eq!(reading.age, None);
    }

    #[test]
    fn decodes_nationality_payload() {
        let reading: NationalityReading = serde_json::from_str(
            r#"{"count":10,"name":"Ann","country":[
                {"country_id":"RU","probability":0.7},
                {"country_id":"UA","probability":0.3}
            ]}"#,
        )
        .unwrap();
        assert_eq!(reading.top().unwrap().country_id, "RU");

        let reading: NationalityReading =
            serde_json::from_str(r#"{"count":0,"name":"Xq","country":[]}"#).unwrap();
        assert!(reading.top().is_none());
    }
}
