use crate::api::connection::{Connection, ConnectionConfig};
use crate::api::{ccv2, ccv3, logcache, uaa};
use crate::command::Clients;
use crate::config::Config;
use crate::error::Error;

/// Real HTTP clients built from the config's endpoints, token and timeouts.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpClients;

fn connection_config(config: &Config) -> ConnectionConfig {
    ConnectionConfig {
        skip_ssl_validation: config.skip_ssl_validation(),
        dial_timeout: config.dial_timeout(),
    }
}

fn token(config: &Config) -> Option<String> {
    Some(config.access_token().to_string()).filter(|t| !t.is_empty())
}

impl HttpClients {
    fn connection(&self, base_url: &str, config: &Config) -> Result<Connection, Error> {
        Ok(Connection::new(
            base_url,
            token(config),
            &connection_config(config),
        )?)
    }
}

impl Clients for HttpClients {
    type V2 = ccv2::Client;
    type V3 = ccv3::Client;
    type LogCache = logcache::Client;
    type Uaa = uaa::Client;

    fn cloud_controller_v2(&self, target: &str, config: &Config) -> Result<Self::V2, Error> {
        Ok(ccv2::Client::new(self.connection(target, config)?))
    }

    fn cloud_controller_v3(&self, target: &str, config: &Config) -> Result<Self::V3, Error> {
        Ok(ccv3::Client::new(self.connection(target, config)?))
    }

    fn log_cache(&self, config: &Config) -> Result<Self::LogCache, Error> {
        let endpoint = config.log_cache_endpoint();
        Ok(logcache::Client::new(self.connection(endpoint, config)?))
    }

    fn uaa(&self, config: &Config) -> Result<Self::Uaa, Error> {
        Ok(uaa::Client::new(
            config.uaa_endpoint(),
            config.uaa_oauth_client(),
            config.uaa_oauth_client_secret(),
            &connection_config(config),
        )?)
    }
}
