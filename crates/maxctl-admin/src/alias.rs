use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use maxctl_auth::Credentials;
use maxctl_common::error::{MaxctlError, Result};
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

pub const ENV_HOST_PREFIX: &str = "MAXCTL_HOST_";
pub const CONFIG_FILE: &str = "config.json";

/// Connection details for one cluster alias.
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    pub url: Url,
    pub access_key: String,
    pub secret_key: String,
    pub region: Option<String>,
}

impl HostConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.access_key.clone(), self.secret_key.clone())
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    pub alias: String,
    pub host: HostConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AliasConfig {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub aliases: HashMap<String, AliasEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasEntry {
    pub url: String,
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub api: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub region: Option<String>,
}

impl AliasConfig {
    pub fn path_in(config_dir: &Path) -> PathBuf {
        config_dir.join(CONFIG_FILE)
    }

    /// Reads `<config_dir>/config.json`. A missing file yields an empty config.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let path = Self::path_in(config_dir);
        let raw = match std::fs::read(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no alias config file");
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };

        serde_json::from_slice(&raw).map_err(|err| {
            MaxctlError::Config(format!("unable to parse {}: {err}", path.display()))
        })
    }

    fn host(&self, alias: &str) -> Result<Option<HostConfig>> {
        let Some(entry) = self.aliases.get(alias) else {
            return Ok(None);
        };
        let url = Url::parse(&entry.url).map_err(|err| {
            MaxctlError::Config(format!("alias `{alias}` has invalid url {}: {err}", entry.url))
        })?;
        Ok(Some(HostConfig {
            url,
            access_key: entry.access_key.clone(),
            secret_key: entry.secret_key.clone(),
            region: entry.region.clone(),
        }))
    }
}

/// Splits `alias[/path]` and resolves the alias, environment first.
pub fn resolve_target<F>(target: &str, config: &AliasConfig, env: F) -> Result<ResolvedTarget>
where
    F: Fn(&str) -> Option<String>,
{
    let cleaned = target.trim().trim_end_matches('/');
    let alias = cleaned.split('/').next().unwrap_or_default();
    if alias.is_empty() {
        return Err(MaxctlError::InvalidArgument(format!(
            "`{target}` does not name an alias"
        )));
    }

    if let Some(value) = env(&format!("{ENV_HOST_PREFIX}{alias}")) {
        debug!(alias, "alias resolved from environment");
        let host = parse_env_host(&value)?;
        return Ok(ResolvedTarget {
            alias: alias.to_string(),
            host,
        });
    }

    if let Some(host) = config.host(alias)? {
        debug!(alias, url = %host.url, "alias resolved from config");
        return Ok(ResolvedTarget {
            alias: alias.to_string(),
            host,
        });
    }

    if target.starts_with("http://") || target.starts_with("https://") {
        return Err(MaxctlError::InvalidArgument(format!(
            "`{target}` is a URL, not an alias; add an alias for it first"
        )));
    }

    Err(MaxctlError::NotFound(format!(
        "The specified alias: {alias} not found"
    )))
}

/// Parses `http(s)://ACCESS:SECRET@host:port` as found in `MAXCTL_HOST_<alias>`.
pub fn parse_env_host(value: &str) -> Result<HostConfig> {
    match parse_env_url(value) {
        Ok(host) => Ok(host),
        // Keys holding reserved characters such as `#` break URL parsing;
        // split them off by hand and parse the remainder.
        Err(err) => {
            let (scheme, rest) = value
                .split_once("://")
                .filter(|(scheme, _)| matches!(*scheme, "http" | "https"))
                .ok_or(err)?;
            let (access_key, rest) = rest.split_once(':').ok_or_else(|| invalid_env_url(value))?;
            let (secret_key, host) = rest.split_once('@').ok_or_else(|| invalid_env_url(value))?;

            let mut parsed = parse_env_url(&format!("{scheme}://{host}"))?;
            parsed.access_key = access_key.to_string();
            parsed.secret_key = secret_key.to_string();
            Ok(parsed)
        }
    }
}

fn parse_env_url(value: &str) -> Result<HostConfig> {
    let mut url = Url::parse(value).map_err(|_| invalid_env_url(value))?;

    let valid = matches!(url.scheme(), "http" | "https")
        && matches!(url.path(), "" | "/")
        && url.query().is_none()
        && url.fragment().is_none()
        && url.host_str().is_some();
    if !valid {
        return Err(invalid_env_url(value));
    }

    let access_key = decode_userinfo(url.username());
    let secret_key = url.password().map(decode_userinfo).unwrap_or_default();
    // Clearing userinfo cannot fail on an http(s) URL that has a host.
    let _ = url.set_username("");
    let _ = url.set_password(None);

    Ok(HostConfig {
        url,
        access_key,
        secret_key,
        region: None,
    })
}

fn decode_userinfo(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

fn invalid_env_url(value: &str) -> MaxctlError {
    let shown = match value.split_once('@') {
        Some((_, host)) => format!("<credentials>@{host}"),
        None => value.to_string(),
    };
    MaxctlError::InvalidArgument(format!("invalid host url `{shown}`"))
}
