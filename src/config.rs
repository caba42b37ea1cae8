//! Service configuration
//!
//! Every knob is both a CLI flag and an environment variable with a usable
//! default, so the binary starts with zero configuration against a local
//! PostgreSQL and the public classification APIs.

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "people-svc", version, about = "Person registry with name-based enrichment")]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "PEOPLE_HTTP_ADDR", default_value = "127.0.0.1:7007")]
    pub http_addr: String,

    /// PostgreSQL connection URL
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://postgres@localhost:5432/people"
    )]
    pub database_url: String,

    /// Gender classification endpoint
    #[arg(long, env = "PEOPLE_GENDER_URL", default_value = "https://api.genderize.io/")]
    pub gender_url: String,

    /// Age classification endpoint
    #[arg(long, env = "PEOPLE_AGE_URL", default_value = "https://api.agify.io/")]
    pub age_url: String,

    /// Nationality classification endpoint
    #[arg(
        long,
        env = "PEOPLE_NATIONALITY_URL",
        default_value = "https://api.nationalize.io/"
    )]
    pub nationality_url: String,

    /// Enable debug-level logging
    #[arg(long, env = "PEOPLE_DEBUG")]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_without_arguments() {
        let config = Config::parse_from(["people-svc"]);
        assert_eq!(config.http_addr, "127.0.0.1:7007");
        assert!(config.gender_url.starts_with("https://api.genderize.io"));
        assert!(!config.debug);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::parse_from([
            "people-svc",
            "--http-addr",
            "0.0.0.0:8080",
            "--gender-url",
            "http://localhost:9001/",
            "--debug",
        ]);
        assert_eq!(config.http_addr, "0.0.0.0:8080");
        assert_eq!(config.gender_url, "http://localhost:9001/");
        assert!(config.debug);
    }
}
