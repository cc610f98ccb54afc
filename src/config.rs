use dotenv::dotenv;
use std::env;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::BridgeError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Behaviour switches for the bridge. All default to the portal's stock
/// behaviour: no guard, no failure message, binding fixed at mount time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeOptions {
    /// Ignore a second interaction on a control while its request is pending.
    pub in_flight_guard: bool,
    /// Alert shown when the request or the reply decode fails.
    pub failure_notice: Option<String>,
    /// Handle clicks on booking controls added after mount.
    pub delegate_booking_clicks: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub base_url: String,
    pub session_cookie: Option<String>,
    pub request_timeout: Option<Duration>,
    pub options: BridgeOptions,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_cookie: None,
            request_timeout: None,
            options: BridgeOptions::default(),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from the process environment, reading `.env` first.
    pub fn from_env() -> Result<Self, BridgeError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BridgeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("PORTAL_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let session_cookie = lookup("PORTAL_SESSION_COOKIE").filter(|v| !v.is_empty());

        let request_timeout = match lookup("PORTAL_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    BridgeError::Config(format!(
                        "PORTAL_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                        raw
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let options = BridgeOptions {
            in_flight_guard: flag(&lookup, "PORTAL_IN_FLIGHT_GUARD"),
            failure_notice: lookup("PORTAL_FAILURE_NOTICE").filter(|v| !v.is_empty()),
            delegate_booking_clicks: flag(&lookup, "PORTAL_DELEGATE_BOOKING_CLICKS"),
        };

        info!("Portal base URL: {}", base_url);
        if session_cookie.is_some() {
            info!("Session cookie provided - requests will be sent authenticated");
        }
        debug!("Bridge options: {:?}", options);

        Ok(Self {
            base_url,
            session_cookie,
            request_timeout,
            options,
        })
    }
}

fn flag<F>(lookup: &F, key: &str) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|val| val.to_lowercase() == "true")
        .unwrap_or(false)
}
