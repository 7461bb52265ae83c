/*
 * Responsibility
 * - Load console settings from the environment (.env supported)
 * - Validate values (bad input fails start-up)
 * - Backend / Keycloak endpoints, token look-ahead window, unknown-route policy
 */
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// What the console answers for a path no route matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownRoutePolicy {
    /// Render a "page not found" notice (404).
    NotFound,
    /// Redirect to the public landing route.
    RedirectToEntry,
}

impl FromStr for UnknownRoutePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "not_found" | "not-found" | "404" => Ok(Self::NotFound),
            "redirect" | "redirect_to_entry" => Ok(Self::RedirectToEntry),
            _ => Err(ConfigError::Invalid("UNKNOWN_ROUTE_POLICY")),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    // Where the operator's browser reaches this console (used for OIDC redirects)
    pub public_base_url: String,

    pub backend_base_url: String,

    pub keycloak_url: String,
    pub keycloak_realm: String,
    pub keycloak_client_id: String,

    // A token expiring sooner than this is refreshed before use
    pub token_min_validity_seconds: u64,
    pub http_timeout_seconds: u64,

    pub unknown_route_policy: UnknownRoutePolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (the process environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        // Loopback unless the operator opts in: whoever reaches the port acts as
        // the logged-in operator.
        let bind_ip: IpAddr = match lookup("BIND_ADDR") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("BIND_ADDR"))?,
            None => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };
        let addr = SocketAddr::new(bind_ip, port);

        let public_base_url = lookup("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", port));
        let public_base_url = normalize_base_url(&public_base_url, "PUBLIC_BASE_URL")?;

        // Local defaults match the development docker-compose; production must be explicit.
        let backend_base_url = required_in_production(
            &lookup,
            app_env,
            "BACKEND_BASE_URL",
            "http://localhost:8080",
        )?;
        let backend_base_url = normalize_base_url(&backend_base_url, "BACKEND_BASE_URL")?;

        let keycloak_url =
            required_in_production(&lookup, app_env, "KEYCLOAK_URL", "http://localhost:9090")?;
        let keycloak_url = normalize_base_url(&keycloak_url, "KEYCLOAK_URL")?;

        let keycloak_realm = non_empty(&lookup, "KEYCLOAK_REALM", "sisgr-realm")?;
        let keycloak_client_id = non_empty(&lookup, "KEYCLOAK_CLIENT_ID", "sisgr-frontend")?;

        let token_min_validity_seconds = match lookup("TOKEN_MIN_VALIDITY_SECONDS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("TOKEN_MIN_VALIDITY_SECONDS"))?,
            None => 30,
        };

        let http_timeout_seconds = match lookup("HTTP_TIMEOUT_SECONDS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|v| *v > 0)
                .ok_or(ConfigError::Invalid("HTTP_TIMEOUT_SECONDS"))?,
            None => 30,
        };

        let unknown_route_policy = match lookup("UNKNOWN_ROUTE_POLICY") {
            Some(raw) => raw.parse()?,
            None => UnknownRoutePolicy::NotFound,
        };

        Ok(Self {
            addr,
            app_env,
            public_base_url,
            backend_base_url,
            keycloak_url,
            keycloak_realm,
            keycloak_client_id,
            token_min_validity_seconds,
            http_timeout_seconds,
            unknown_route_policy,
        })
    }

    pub fn redirect_uri(&self) -> String {
        format!("{}/auth/callback", self.public_base_url)
    }
}

fn required_in_production<F>(
    lookup: &F,
    app_env: AppEnv,
    key: &'static str,
    default: &str,
) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) => Ok(v),
        None if app_env.is_production() => Err(ConfigError::Missing(key)),
        None => Ok(default.to_string()),
    }
}

fn non_empty<F>(lookup: &F, key: &'static str, default: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| default.to_string());
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(ConfigError::Invalid(key));
    }
    Ok(value)
}

// Base URLs are stored without a trailing slash so paths can be appended verbatim.
fn normalize_base_url(raw: &str, key: &'static str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed).map_err(|_| ConfigError::Invalid(key))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid(key));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_match_local_development() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.backend_base_url, "http://localhost:8080");
        assert_eq!(config.keycloak_url, "http://localhost:9090");
        assert_eq!(config.keycloak_realm, "sisgr-realm");
        assert_eq!(config.keycloak_client_id, "sisgr-frontend");
        assert_eq!(config.token_min_validity_seconds, 30);
        assert_eq!(config.unknown_route_policy, UnknownRoutePolicy::NotFound);
        assert_eq!(
            config.redirect_uri(),
            "http://localhost:3000/auth/callback"
        );
    }

    #[test]
    fn trailing_slashes_are_stripped() {
        let config = config_from(&[
            ("BACKEND_BASE_URL", "https://api.toolrent.test/"),
            ("PUBLIC_BASE_URL", "https://console.toolrent.test//"),
        ])
        .unwrap();

        assert_eq!(config.backend_base_url, "https://api.toolrent.test");
        assert_eq!(config.public_base_url, "https://console.toolrent.test");
    }

    #[test]
    fn production_requires_explicit_endpoints() {
        let err = config_from(&[("APP_ENV", "prod")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("BACKEND_BASE_URL")));

        let err = config_from(&[
            ("APP_ENV", "production"),
            ("BACKEND_BASE_URL", "https://api.toolrent.test"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("KEYCLOAK_URL")));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            config_from(&[("PORT", "abc")]).unwrap_err(),
            ConfigError::Invalid("PORT")
        ));
        assert!(matches!(
            config_from(&[("BACKEND_BASE_URL", "ftp://files")]).unwrap_err(),
            ConfigError::Invalid("BACKEND_BASE_URL")
        ));
        assert!(matches!(
            config_from(&[("UNKNOWN_ROUTE_POLICY", "teleport")]).unwrap_err(),
            ConfigError::Invalid("UNKNOWN_ROUTE_POLICY")
        ));
        assert!(matches!(
            config_from(&[("HTTP_TIMEOUT_SECONDS", "0")]).unwrap_err(),
            ConfigError::Invalid("HTTP_TIMEOUT_SECONDS")
        ));
    }

    #[test]
    fn bind_addr_opts_in_to_other_interfaces() {
        let config = config_from(&[("BIND_ADDR", "0.0.0.0"), ("PORT", "8081")]).unwrap();
        assert_eq!(config.addr, SocketAddr::from(([0, 0, 0, 0], 8081)));

        let config = config_from(&[("BIND_ADDR", "::1")]).unwrap();
        assert!(config.addr.ip().is_loopback());

        assert!(matches!(
            config_from(&[("BIND_ADDR", "localhost")]).unwrap_err(),
            ConfigError::Invalid("BIND_ADDR")
        ));
    }

    #[test]
    fn unknown_route_policy_accepts_redirect() {
        let config = config_from(&[("UNKNOWN_ROUTE_POLICY", "redirect")]).unwrap();
        assert_eq!(
            config.unknown_route_policy,
            UnknownRoutePolicy::RedirectToEntry
        );
    }
}
