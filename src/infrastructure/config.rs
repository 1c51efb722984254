//! Server configuration loaded from the environment.
//!
//! # Environment Variables
//!
//! - `HOST`: Server host address (default: `0.0.0.0`)
//! - `PORT`: Server port (default: `3001`)

use std::env;
use std::net::SocketAddr;

use thiserror::Error;

/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 3001;

/// Errors raised while reading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// `PORT` is set but is not a valid port number.
    #[error("Invalid PORT: {0}")]
    InvalidPort(String),

    /// `HOST` and `PORT` do not form a socket address.
    #[error("Invalid server address: {0}")]
    InvalidAddress(String),

    /// A variable holds a non-UTF-8 value.
    #[error("Non-UTF-8 value for {0}")]
    NotUnicode(&'static str),
}

/// Network settings for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host or IP address to bind.
    pub host: String,
    /// TCP port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Reads `HOST` and `PORT`, treating empty values as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if `PORT` does not parse as a `u16`
    /// or a variable is not valid UTF-8.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|name| env::var(name))
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&'static str) -> Result<String, env::VarError>,
    {
        let host = read_trimmed(&lookup, "HOST")?.unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match read_trimmed(&lookup, "PORT")? {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigurationError::InvalidPort(value))?,
            None => DEFAULT_PORT,
        };

        Ok(Self { host, port })
    }

    /// Resolves the configured host and port into a socket address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidAddress`] if the host is not an
    /// IP address literal.
    pub fn socket_address(&self) -> Result<SocketAddr, ConfigurationError> {
        let address = format!("{}:{}", self.host, self.port);
        address
            .parse()
            .map_err(|_| ConfigurationError::InvalidAddress(address))
    }
}

fn read_trimmed<F>(lookup: &F, name: &'static str) -> Result<Option<String>, ConfigurationError>
where
    F: Fn(&'static str) -> Result<String, env::VarError>,
{
    match lookup(name) {
        Ok(value) => {
            let value = value.trim();
            Ok((!value.is_empty()).then(|| value.to_string()))
        }
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigurationError::NotUnicode(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn lookup_from(
        pairs: Vec<(&'static str, &'static str)>,
    ) -> impl Fn(&'static str) -> Result<String, env::VarError> {
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
                .ok_or(env::VarError::NotPresent)
        }
    }

    #[rstest]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup_from(vec![])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 3001);
    }

    #[rstest]
    fn test_reads_host_and_port() {
        let config =
            ServerConfig::from_lookup(lookup_from(vec![("HOST", "127.0.0.1"), ("PORT", "8080")]))
                .unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.socket_address().unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
    }

    #[rstest]
    fn test_blank_values_fall_back_to_defaults() {
        let config =
            ServerConfig::from_lookup(lookup_from(vec![("HOST", "  "), ("PORT", "")])).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[rstest]
    #[case("abc")]
    #[case("70000")]
    #[case("-1")]
    fn test_invalid_port(#[case] port: &'static str) {
        let result = ServerConfig::from_lookup(lookup_from(vec![("PORT", port)]));
        assert_eq!(result, Err(ConfigurationError::InvalidPort(port.to_string())));
    }

    #[rstest]
    fn test_invalid_address() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            port: 1,
        };
        assert!(matches!(
            config.socket_address(),
            Err(ConfigurationError::InvalidAddress(_))
        ));
    }
}
