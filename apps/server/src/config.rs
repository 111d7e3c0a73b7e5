// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration loaded from environment variables.

use std::time::Duration;

const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:3000,http://localhost:5173,http://localhost:8081,http://127.0.0.1:3000,http://127.0.0.1:5173";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Backend project URL (without the `/rest/v1` suffix).
    pub backend_url: String,
    /// Anonymous API key sent as `apikey` and bearer token.
    pub backend_key: String,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Overview counts refresh interval in seconds.
    pub overview_poll_secs: u64,
    /// Activity leaderboard refresh interval in seconds.
    pub activity_poll_secs: u64,
    /// Allowed CORS origins (comma-separated, or "*" for all in development).
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = var("NAVME_BACKEND_URL")
            .or_else(|| var("SUPABASE_URL"))
            .unwrap_or_else(|| "http://localhost:54321".into());

        Self {
            port: var("PORT")
                .unwrap_or_else(|| "8080".into())
                .parse()
                .unwrap_or(8080),
            backend_url: backend_url.trim_end_matches('/').to_string(),
            backend_key: var("NAVME_BACKEND_KEY")
                .or_else(|| var("SUPABASE_ANON_KEY"))
                .unwrap_or_default(),
            request_timeout_secs: var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".into())
                .parse()
                .unwrap_or(30),
            overview_poll_secs: var("OVERVIEW_POLL_SECS")
                .unwrap_or_else(|| "30".into())
                .parse()
                .unwrap_or(30u64)
                .max(1),
            activity_poll_secs: var("ACTIVITY_POLL_SECS")
                .unwrap_or_else(|| "60".into())
                .parse()
                .unwrap_or(60u64)
                .max(1),
            cors_origins: var("CORS_ORIGINS")
                .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.into())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// PostgREST root, e.g. `http://localhost:54321/rest/v1`.
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.backend_url)
    }

    pub fn overview_interval(&self) -> Duration {
        Duration::from_secs(self.overview_poll_secs)
    }

    pub fn activity_interval(&self) -> Duration {
        Duration::from_secs(self.activity_poll_secs)
    }

    /// True when CORS should allow any origin.
    pub fn cors_permissive(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|k| map.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = config(&[]);
        assert_eq!(c.port, 8080);
        assert_eq!(c.rest_url(), "http://localhost:54321/rest/v1");
        assert_eq!(c.backend_key, "");
        assert_eq!(c.overview_poll_secs, 30);
        assert_eq!(c.activity_poll_secs, 60);
        assert!(!c.cors_permissive());
        assert!(c.cors_origins.contains(&"http://localhost:5173".to_string()));
    }

    #[test]
    fn test_supabase_fallback_and_trailing_slash() {
        let c = config(&[
            ("SUPABASE_URL", "https://demo.supabase.co/"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]);
        assert_eq!(c.rest_url(), "https://demo.supabase.co/rest/v1");
        assert_eq!(c.backend_key, "anon");

        let c = config(&[
            ("NAVME_BACKEND_URL", "http://backend:3000"),
            ("SUPABASE_URL", "https://ignored.example"),
        ]);
        assert_eq!(c.backend_url, "http://backend:3000");
    }

    #[test]
    fn test_invalid_numbers_fall_back_and_intervals_clamp() {
        let c = config(&[
            ("PORT", "not-a-port"),
            ("OVERVIEW_POLL_SECS", "0"),
            ("ACTIVITY_POLL_SECS", "abc"),
            ("CORS_ORIGINS", " * , "),
        ]);
        assert_eq!(c.port, 8080);
        assert_eq!(c.overview_interval(), Duration::from_secs(1));
        assert_eq!(c.activity_poll_secs, 60);
        assert_eq!(c.cors_origins, vec!["*".to_string()]);
        assert!(c.cors_permissive());
    }
}
