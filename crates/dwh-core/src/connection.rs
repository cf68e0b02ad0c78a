//! Client creation from configuration
//!
//! Builds a [`WarehouseClient`] from a resolved profile, with
//! `DWH_API_URL` / `DWH_API_TOKEN` environment overrides taking
//! precedence over the config file.

use dwh_api::WarehouseClient;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;

const DWH_USER_AGENT: &str = concat!("dwh-core/", env!("CARGO_PKG_VERSION"));

/// Create an API client for the given profile (or the default profile
/// when `profile_name` is `None`).
///
/// Environment variables override the config file: with both
/// `DWH_API_URL` and `DWH_API_TOKEN` set, no profile is required at
/// all. With only one of them set, the other comes from the resolved
/// profile.
pub fn create_client(config: &Config, profile_name: Option<&str>) -> Result<WarehouseClient> {
    let env_url = std::env::var("DWH_API_URL").ok();
    let env_token = std::env::var("DWH_API_TOKEN").ok();

    let (api_url, api_token) = match (env_url, env_token) {
        (Some(url), Some(token)) => {
            info!("using DWH API credentials from environment");
            (url, token)
        }
        (env_url, env_token) => {
            let (name, profile) = config.resolve_profile(profile_name)?;
            debug!("using profile '{name}'");
            let (url, token) = profile.resolve_credentials()?;
            (env_url.unwrap_or(url), env_token.unwrap_or(token))
        }
    };

    let client = WarehouseClient::builder()
        .base_url(api_url)
        .api_token(api_token)
        .user_agent(DWH_USER_AGENT)
        .build()?;
    debug!("created DWH client for {}", client.base_url());
    Ok(client)
}
