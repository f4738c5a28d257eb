//! Server configuration, read from the environment.

use std::fmt;

/// Default listen address.
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

/// Default cap on request body size (64 KiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but can't be parsed.
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Everything the server binary needs to start.
///
/// | variable | field | required |
/// |---|---|---|
/// | `SUPABASE_URL` | `supabase_url` | yes |
/// | `SUPABASE_SERVICE_ROLE_KEY` | `service_role_key` | yes |
/// | `GAMEGATE_BIND` | `bind_addr` | no, `0.0.0.0:8000` |
/// | `GAMEGATE_MAX_BODY_BYTES` | `max_body_bytes` | no, 65536 |
#[derive(Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub max_body_bytes: usize,
    pub supabase_url: String,
    pub service_role_key: String,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("supabase_url", &self.supabase_url)
            .field("service_role_key", &"<redacted>")
            .finish()
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable
    /// name to its value. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let max_body_bytes = match get("GAMEGATE_MAX_BODY_BYTES") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                ConfigError::Invalid {
                    name: "GAMEGATE_MAX_BODY_BYTES",
                    reason: e.to_string(),
                }
            })?,
            None => DEFAULT_MAX_BODY_BYTES,
        };
        if max_body_bytes == 0 {
            return Err(ConfigError::Invalid {
                name: "GAMEGATE_MAX_BODY_BYTES",
                reason: "must be greater than zero".into(),
            });
        }

        Ok(Self {
            bind_addr: get("GAMEGATE_BIND")
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            max_body_bytes,
            supabase_url: require("SUPABASE_URL")?,
            service_role_key: require("SUPABASE_SERVICE_ROLE_KEY")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(
        vars: &[(&str, &str)],
    ) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("SUPABASE_URL", "https://p.supabase.co"),
        ("SUPABASE_SERVICE_ROLE_KEY", "secret"),
    ];

    #[test]
    fn test_defaults_applied() {
        let cfg = ServerConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(cfg.bind_addr, DEFAULT_BIND);
        assert_eq!(cfg.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert_eq!(cfg.supabase_url, "https://p.supabase.co");
        assert_eq!(cfg.service_role_key, "secret");
    }

    #[test]
    fn test_overrides_read() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("GAMEGATE_BIND", "127.0.0.1:9000"));
        vars.push(("GAMEGATE_MAX_BODY_BYTES", "1024"));
        let cfg = ServerConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:9000");
        assert_eq!(cfg.max_body_bytes, 1024);
    }

    #[test]
    fn test_missing_url() {
        let err = ServerConfig::from_lookup(lookup(&[(
            "SUPABASE_SERVICE_ROLE_KEY",
            "secret",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SUPABASE_URL")));
    }

    #[test]
    fn test_empty_key_counts_as_missing() {
        let err = ServerConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://p.supabase.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", ""),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Missing("SUPABASE_SERVICE_ROLE_KEY")
        ));
    }

    #[test]
    fn test_bad_body_limit() {
        for raw in ["lots", "0"] {
            let mut vars = REQUIRED.to_vec();
            vars.push(("GAMEGATE_MAX_BODY_BYTES", raw));
            let err = ServerConfig::from_lookup(lookup(&vars)).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { .. }), "{raw}");
        }
    }

    #[test]
    fn test_debug_redacts_key() {
        let cfg = ServerConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        assert!(!format!("{cfg:?}").contains("secret"));
    }
}
