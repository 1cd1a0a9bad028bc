//! Target descriptor parsing.

use crate::domain::error::ConfigError;

/// A parsed `[user@]host[:port]` target descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// `[user@]host` as handed to the transport clients.
    pub host: String,
    /// Explicit port, when the descriptor carries one.
    pub port: Option<u16>,
}

impl Target {
    /// Parse a descriptor, splitting host and port on the last colon.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTarget`] if the host part is empty or the
    /// port is not a number in `0..=65535`.
    pub fn parse(descriptor: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidTarget {
            target: descriptor.to_string(),
            reason: reason.to_string(),
        };

        let (host, port) = match descriptor.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| invalid("port must be a number between 0 and 65535"))?;
                (host, Some(port))
            }
            None => (descriptor, None),
        };

        if host.is_empty() || host.ends_with('@') {
            return Err(invalid("host name is empty"));
        }

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}
