// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! OAuth and session handling live in the surrounding application; this
//! service only needs deployment settings and the engine's sample policy.
//! Engine inputs (target distances, time windows, unit system) arrive as
//! request parameters, never from ambient state.

use crate::engine::segment::MalformedSamplePolicy;
use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// How the engine treats malformed stream samples
    pub malformed_sample_policy: MalformedSamplePolicy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// For local development, settings can be placed in a `.env` file; in
    /// production Cloud Run injects them as environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let malformed_sample_policy = match env::var("MALFORMED_SAMPLE_POLICY") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("MALFORMED_SAMPLE_POLICY"))?,
            Err(_) => MalformedSamplePolicy::default(),
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            malformed_sample_policy,
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            malformed_sample_policy: MalformedSamplePolicy::Reject,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test because the cases share the MALFORMED_SAMPLE_POLICY env
    // var and tests run in parallel.
    #[test]
    fn test_config_from_env() {
        env::remove_var("MALFORMED_SAMPLE_POLICY");
        env::remove_var("PORT");

        let config = Config::from_env().expect("Config should load");
        assert_eq!(config.port, 8080);
        assert_eq!(config.gcp_project_id, "local-dev");
        assert_eq!(
            config.malformed_sample_policy,
            MalformedSamplePolicy::Reject
        );

        env::set_var("MALFORMED_SAMPLE_POLICY", "drop");
        let config = Config::from_env().expect("Config should load");
        assert_eq!(config.malformed_sample_policy, MalformedSamplePolicy::Drop);

        env::set_var("MALFORMED_SAMPLE_POLICY", "ignore");
        assert!(Config::from_env().is_err());

        env::remove_var("MALFORMED_SAMPLE_POLICY");
    }
}
