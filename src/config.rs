//! Process configuration, read once at startup.

use std::net::{IpAddr, SocketAddr};

use crate::error::Error;
use crate::flags::{EnvSnapshot, Environment, resolve_environment};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Settings the HTTP entry point needs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub addr: SocketAddr,
    pub environment: Environment,
}

impl Config {
    /// Reads `HOST` and `PORT` from `env`; both are optional.
    pub fn from_env(env: &EnvSnapshot) -> Result<Self, Error> {
        let host = env.get("HOST").unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host
            .parse()
            .map_err(|_| Error::config("HOST", format!("not an IP address: `{host}`")))?;

        let port = match env.get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| Error::config("PORT", format!("not a port number: `{raw}`")))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            addr: SocketAddr::new(ip, port),
            environment: resolve_environment(env),
        })
    }

    pub fn from_process_env() -> Result<Self, Error> {
        Self::from_env(&EnvSnapshot::from_process())
    }
}
