//! Startup configuration: which provider to talk to and where its API key
//! comes from.
//!
//! The key is looked up in a TOML secrets file first (keyed by the provider's
//! environment variable name, e.g. `GEMINI_API_KEY = "..."`) and then in the
//! process environment.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TubekitError};

/// Hosted model providers exposing an OpenAI-compatible chat completions API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    Openai,
    Grok,
}

/// Where and how to reach one provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub provider: Provider,
    /// Spelling accepted on the command line.
    pub id: &'static str,
    pub display_name: &'static str,
    pub chat_url: &'static str,
    pub default_model: &'static str,
    /// Environment variable, and secrets-file key, holding the API key.
    pub key_var: &'static str,
}

/// One row per [`Provider`], in declaration order.
pub const ENDPOINTS: [Endpoint; 3] = [
    Endpoint {
        provider: Provider::Gemini,
        id: "gemini",
        display_name: "Gemini",
        chat_url: "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions",
        default_model: "gemini-1.5-flash",
        key_var: "GEMINI_API_KEY",
    },
    Endpoint {
        provider: Provider::Openai,
        id: "openai",
        display_name: "OpenAI",
        chat_url: "https://api.openai.com/v1/chat/completions",
        default_model: "gpt-4o-mini",
        key_var: "OPENAI_API_KEY",
    },
    Endpoint {
        provider: Provider::Grok,
        id: "grok",
        display_name: "Grok",
        chat_url: "https://api.x.ai/v1/chat/completions",
        default_model: "grok-4-fast",
        key_var: "XAI_API_KEY",
    },
];

impl Provider {
    pub fn endpoint(self) -> &'static Endpoint {
        &ENDPOINTS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.endpoint().display_name
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint().id)
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        ENDPOINTS
            .iter()
            .find(|e| e.id.eq_ignore_ascii_case(wanted) || e.display_name.eq_ignore_ascii_case(wanted))
            .map(|e| e.provider)
            .ok_or_else(|| {
                let ids: Vec<&str> = ENDPOINTS.iter().map(|e| e.id).collect();
                format!("unknown provider '{s}', expected one of: {}", ids.join(", "))
            })
    }
}

pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tubekit")
}

pub fn default_secrets_path() -> PathBuf {
    get_config_dir().join("secrets.toml")
}

/// Reads a secrets file. A missing file is not an error and yields an empty table.
///
/// Entries other than the wanted key may have any TOML type.
pub fn load_secrets(path: &Path) -> Result<toml::Table> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no secrets file");
            return Ok(toml::Table::new());
        }
        Err(e) => return Err(e.into()),
    };

    content
        .parse::<toml::Table>()
        .map_err(|e| TubekitError::InvalidSecrets {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Resolves the API key for `provider`, secrets file before environment.
pub fn resolve_api_key(provider: Provider, secrets_path: &Path) -> Result<String> {
    resolve_api_key_with(provider, secrets_path, |name| std::env::var(name).ok())
}

pub fn resolve_api_key_with(
    provider: Provider,
    secrets_path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String> {
    let key_var = provider.endpoint().key_var;
    let secrets = load_secrets(secrets_path)?;

    let from_secrets = secrets
        .get(key_var)
        .and_then(toml::Value::as_str)
        .filter(|key| !key.trim().is_empty())
        .map(str::to_string);
    if from_secrets.is_some() {
        debug!(key_var, "API key taken from secrets file");
    }

    from_secrets
        .or_else(|| env(key_var).filter(|key| !key.trim().is_empty()))
        .ok_or_else(|| TubekitError::MissingApiKey {
            env_var: key_var.to_string(),
            secrets_path: secrets_path.to_path_buf(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn secrets_file_wins_over_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        std::fs::write(&path, "GEMINI_API_KEY = \"from-file\"\n").unwrap();

        let key = resolve_api_key_with(Provider::Gemini, &path, |_| {
            Some("from-env".to_string())
        })
        .unwrap();
        assert_eq!(key, "from-file");
    }

    #[test]
    fn environment_is_used_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let key = resolve_api_key_with(Provider::Openai, &path, |name| {
            (name == "OPENAI_API_KEY").then(|| "sk-env".to_string())
        })
        .unwrap();
        assert_eq!(key, "sk-env");
    }

    #[test]
    fn missing_key_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        std::fs::write(&path, "OPENAI_API_KEY = \"other\"\n").unwrap();

        let err = resolve_api_key_with(Provider::Gemini, &path, no_env).unwrap_err();
        assert!(matches!(err, TubekitError::MissingApiKey { ref env_var, .. } if env_var == "GEMINI_API_KEY"));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        std::fs::write(&path, "XAI_API_KEY = \"  \"\n").unwrap();

        let err = resolve_api_key_with(Provider::Grok, &path, no_env).unwrap_err();
        assert!(matches!(err, TubekitError::MissingApiKey { .. }));
    }

    #[test]
    fn unrelated_entries_of_any_type_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        std::fs::write(
            &path,
            "GEMINI_API_KEY = \"k\"\nretries = 3\n[connections]\nurl = \"x\"\n",
        )
        .unwrap();

        let key = resolve_api_key_with(Provider::Gemini, &path, no_env).unwrap();
        assert_eq!(key, "k");
    }

    #[test]
    fn non_string_key_falls_back_to_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        std::fs::write(&path, "OPENAI_API_KEY = 42\n").unwrap();

        let key = resolve_api_key_with(Provider::Openai, &path, |_| Some("sk-env".into())).unwrap();
        assert_eq!(key, "sk-env");
    }

    #[test]
    fn endpoint_table_follows_provider_order() {
        for (i, endpoint) in ENDPOINTS.iter().enumerate() {
            assert_eq!(endpoint.provider as usize, i);
            assert_eq!(endpoint.provider.endpoint(), endpoint);
        }
        assert_eq!(Provider::Grok.endpoint().key_var, "XAI_API_KEY");
    }

    #[test]
    fn providers_parse_by_id_or_display_name() {
        assert_eq!("openai".parse::<Provider>().unwrap(), Provider::Openai);
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::Openai);
        assert_eq!(" GROK ".parse::<Provider>().unwrap(), Provider::Grok);
        assert!("claude".parse::<Provider>().is_err());
        assert_eq!(Provider::Gemini.to_string(), "gemini");
    }

    #[test]
    fn malformed_secrets_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        std::fs::write(&path, "GEMINI_API_KEY = ").unwrap();

        let err = load_secrets(&path).unwrap_err();
        assert!(matches!(err, TubekitError::InvalidSecrets { .. }));
    }
}
