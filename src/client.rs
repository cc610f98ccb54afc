use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::{Client, Response, Url};
use tracing::{debug, info};

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::models::slot::{BookingRequest, PortalResponse, SlotCreationRequest};

/// Client for the portal's slot endpoints
#[derive(Debug, Clone)]
pub struct PortalClient {
    client: Client,
    base_url: Url,
}

impl PortalClient {
    /// Create a client from loaded configuration
    pub fn new(config: &BridgeConfig) -> Result<Self, BridgeError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| BridgeError::Config(format!("invalid session cookie: {}", e)))?;
            headers.insert(COOKIE, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: parse_base_url(&config.base_url)?,
        })
    }

    /// Create an unauthenticated client without timeout for a portal origin
    pub fn with_base_url(base_url: &str) -> Result<Self, BridgeError> {
        Ok(Self {
            client: Client::new(),
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn add_slot_url(&self) -> Url {
        self.endpoint("api/add_slot")
    }

    pub fn book_slot_url(&self, slot_id: &str) -> Result<Url, BridgeError> {
        Ok(self.endpoint(&format!("api/book_slot/{}", slot_path_segment(slot_id)?)))
    }

    /// Publish a new availability slot
    pub async fn add_slot(
        &self,
        request: &SlotCreationRequest,
    ) -> Result<PortalResponse, BridgeError> {
        let url = self.add_slot_url();

        info!("Submitting availability slot");
        debug!("API URL: {}", url);

        let res = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        Self::decode(res).await
    }

    /// Book a slot; the request carries no body
    pub async fn book_slot(&self, booking: &BookingRequest) -> Result<PortalResponse, BridgeError> {
        let url = self.book_slot_url(&booking.slot_id)?;

        info!("Booking slot {}", booking.slot_id);
        debug!("API URL: {}", url);

        let res = self.client.post(url).send().await?;

        Self::decode(res).await
    }

    // The HTTP status is not consulted: the portal reports outcomes in the body.
    async fn decode(res: Response) -> Result<PortalResponse, BridgeError> {
        info!("Response received with status: {}", res.status());

        let body = res.text().await?;
        debug!("Response body: {}", body);

        PortalResponse::from_body(&body)
    }

    // `tail` must already be a valid path: set_path leaves '%' escapes alone.
    fn endpoint(&self, tail: &str) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}/{}", self.base_url.path().trim_end_matches('/'), tail);
        url.set_path(&path);
        url
    }
}

/// Render a slot id as exactly one path segment.
///
/// Existing `%` escapes pass through as the page would send them. Separators
/// are escaped, and ids the URL parser would treat as a dot segment (or an
/// empty one) are rejected since they would address a different route.
fn slot_path_segment(slot_id: &str) -> Result<String, BridgeError> {
    let dots = slot_id.to_ascii_lowercase().replace("%2e", ".");
    if slot_id.is_empty() || dots == "." || dots == ".." {
        return Err(BridgeError::InvalidSlotId(slot_id.to_string()));
    }

    let mut segment = String::with_capacity(slot_id.len());
    for ch in slot_id.chars() {
        match ch {
            '/' => segment.push_str("%2F"),
            '\\' => segment.push_str("%5C"),
            '?' => segment.push_str("%3F"),
            '#' => segment.push_str("%23"),
            _ => segment.push(ch),
        }
    }
    Ok(segment)
}

fn parse_base_url(raw: &str) -> Result<Url, BridgeError> {
    let url = Url::parse(raw).map_err(|e| BridgeError::InvalidBaseUrl(format!("{}: {}", raw, e)))?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(BridgeError::InvalidBaseUrl(raw.to_string()));
    }

    Ok(url)
}
