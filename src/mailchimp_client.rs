use std::time::Duration;

use reqwest::Client;
use reqwest::Response;
use reqwest::Url;
use secrecy::ExposeSecret;
use secrecy::Secret;

use crate::domain::Datacenter;
use crate::domain::MemberPayload;

/// Placeholder in `api_base_url` that is replaced by the account's datacenter
pub const DATACENTER_PLACEHOLDER: &str = "{dc}";

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("invalid Mailchimp API URL: {0}")]
    InvalidUrl(String),
    /// DNS, connection, timeout, or a response that couldn't be read
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

/// Thin wrapper over the Mailchimp Marketing API (v3). Holds no credentials;
/// those come with each form's config.
///
/// `Client` keeps a connection pool internally, so a single `MailchimpClient`
/// should be built at startup and shared.
#[derive(Debug, Clone)]
pub struct MailchimpClient {
    http_client: Client,
    /// e.g. `https://{dc}.api.mailchimp.com/3.0`. Tests point this at a mock
    /// server, in which case there is no placeholder to fill in.
    api_base_url: String,
    timeout: Duration,
}

impl MailchimpClient {
    pub fn new(
        api_base_url: String,
        timeout: Duration,
    ) -> Self {
        Self {
            http_client: Client::new(),
            api_base_url,
            timeout,
        }
    }

    pub fn base_url(
        &self,
        datacenter: &Datacenter,
    ) -> String {
        self.api_base_url
            .replace(DATACENTER_PLACEHOLDER, datacenter.as_ref())
    }

    /// `{base}/lists/{list_id}/members`. `list_id` is a single path segment,
    /// so `/` or `?` in it are escaped rather than changing the endpoint.
    pub fn members_url(
        &self,
        datacenter: &Datacenter,
        list_id: &str,
    ) -> Result<Url, ClientError> {
        let base = self.base_url(datacenter);
        let mut url =
            Url::parse(&base).map_err(|e| ClientError::InvalidUrl(format!("{base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(base.clone()))?
            .pop_if_empty()
            .extend(["lists", list_id, "members"]);
        Ok(url)
    }

    /// Add (or re-add) a member to an audience. Any response, including 4xx/5xx,
    /// is returned as-is for the caller to interpret; `Err` means the request
    /// itself failed (bad URL, DNS, connection, timeout...).
    #[tracing::instrument(
        name = "Adding member to Mailchimp list",
        skip(self, datacenter, api_key, payload),
        fields(datacenter = %datacenter.as_ref())
    )]
    pub async fn add_member(
        &self,
        datacenter: &Datacenter,
        list_id: &str,
        api_key: &Secret<String>,
        payload: &MemberPayload,
    ) -> Result<Response, ClientError> {
        let response = self
            .http_client
            .post(self.members_url(datacenter, list_id)?)
            .bearer_auth(api_key.expose_secret())
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await?;
        Ok(response)
    }
}
