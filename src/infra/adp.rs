use std::path::{Path, PathBuf};

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::ACCEPT;
use reqwest::{Identity, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::config::{AdpConfig, AdpCredentials};
use crate::workflows::recruiting::{PageFetch, PageFetchError, PagedSource, SourceError};

/// Media type that asks the API for unmasked personal data.
const UNMASKED_JSON: &str = "application/json;masked=false";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("unable to read {}: {source}", path.display())]
    Certificate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("client certificate and key do not form a usable identity: {0}")]
    Identity(#[source] reqwest::Error),
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("token request failed: {0}")]
    TokenRequest(#[source] reqwest::Error),
    #[error("token endpoint returned status {0}")]
    TokenStatus(u16),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Authenticated connection to the HR API, shared by every record source in a run.
pub struct AdpClient {
    http: Client,
    api_base: String,
    access_token: String,
}

impl AdpClient {
    /// Build the mutual-TLS client and exchange the client credentials for a bearer token.
    pub fn connect(
        config: &AdpConfig,
        credentials: &AdpCredentials,
    ) -> Result<Self, TransportError> {
        let certificate = read_pem(&credentials.cert_path)?;
        let key = read_pem(&credentials.key_path)?;
        let identity =
            Identity::from_pkcs8_pem(&certificate, &key).map_err(TransportError::Identity)?;

        let http = Client::builder()
            .identity(identity)
            .build()
            .map_err(TransportError::Client)?;

        let response = http
            .post(&config.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
            ])
            .send()
            .map_err(TransportError::TokenRequest)?;

        if !response.status().is_success() {
            return Err(TransportError::TokenStatus(response.status().as_u16()));
        }

        let token: TokenResponse = response.json().map_err(TransportError::TokenRequest)?;
        info!(api_base = %config.api_base, "obtained access token");

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            access_token: token.access_token,
        })
    }

    fn get(&self, endpoint: AdpEndpoint) -> RequestBuilder {
        self.http
            .get(format!("{}{}", self.api_base, endpoint.path()))
            .bearer_auth(&self.access_token)
            .header(ACCEPT, UNMASKED_JSON)
    }

    pub fn source(&self, endpoint: AdpEndpoint) -> AdpRecordSource<'_> {
        AdpRecordSource {
            client: self,
            endpoint,
        }
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>, TransportError> {
    std::fs::read(path).map_err(|source| TransportError::Certificate {
        path: path.to_path_buf(),
        source,
    })
}

/// The three record collections pulled on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdpEndpoint {
    Workers,
    JobApplications,
    JobRequisitions,
}

impl AdpEndpoint {
    pub const fn path(self) -> &'static str {
        match self {
            AdpEndpoint::Workers => "/hr/v2/workers",
            AdpEndpoint::JobApplications => "/staffing/v2/job-applications",
            AdpEndpoint::JobRequisitions => "/staffing/v1/job-requisitions",
        }
    }

    /// Key of the record array inside a page body.
    pub const fn collection_key(self) -> &'static str {
        match self {
            AdpEndpoint::Workers => "workers",
            AdpEndpoint::JobApplications => "jobApplications",
            AdpEndpoint::JobRequisitions => "jobRequisitions",
        }
    }

    /// Upstream page limits differ per endpoint.
    pub const fn page_size(self) -> u64 {
        match self {
            AdpEndpoint::Workers => 100,
            AdpEndpoint::JobApplications | AdpEndpoint::JobRequisitions => 20,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            AdpEndpoint::Workers => "staff",
            AdpEndpoint::JobApplications => "job applications",
            AdpEndpoint::JobRequisitions => "job requisitions",
        }
    }
}

/// One endpoint viewed as a paged record source.
pub struct AdpRecordSource<'a> {
    client: &'a AdpClient,
    endpoint: AdpEndpoint,
}

impl AdpRecordSource<'_> {
    fn count_error(&self, detail: impl ToString) -> SourceError {
        SourceError::Count {
            source_name: self.endpoint.name(),
            detail: detail.to_string(),
        }
    }
}

impl PagedSource for AdpRecordSource<'_> {
    fn name(&self) -> &'static str {
        self.endpoint.name()
    }

    fn page_size(&self) -> u64 {
        self.endpoint.page_size()
    }

    fn fetch_count(&self) -> Result<u64, SourceError> {
        let response = self
            .client
            .get(self.endpoint)
            .query(&[("count", "true")])
            .send()
            .map_err(|err| self.count_error(err))?;

        if !response.status().is_success() {
            return Err(self.count_error(format!("status {}", response.status().as_u16())));
        }

        let body: Value = response.json().map_err(|err| self.count_error(err))?;
        total_number(&body).ok_or_else(|| self.count_error("meta.totalNumber missing from body"))
    }

    fn fetch_page(&self, offset: u64, page_size: u64) -> PageFetch {
        let result = self
            .client
            .get(self.endpoint)
            .query(&[("$top", page_size), ("$skip", offset)])
            .send();

        match result {
            Ok(response) => read_page(response, self.endpoint.collection_key()),
            Err(err) => PageFetch::Failed(PageFetchError::Transport(err.to_string())),
        }
    }
}

fn read_page(response: Response, collection_key: &str) -> PageFetch {
    match response.status() {
        StatusCode::OK => match response.json::<Value>() {
            Ok(body) => records_from_body(body, collection_key),
            Err(err) => PageFetch::Failed(PageFetchError::Payload(err.to_string())),
        },
        StatusCode::NO_CONTENT => PageFetch::Empty,
        status => PageFetch::Failed(PageFetchError::Status(status.as_u16())),
    }
}

/// Record total reported by a `count=true` request.
pub(crate) fn total_number(body: &Value) -> Option<u64> {
    let total = body.get("meta")?.get("totalNumber")?;
    total
        .as_u64()
        .or_else(|| total.as_str().and_then(|text| text.trim().parse().ok()))
}

pub(crate) fn records_from_body(mut body: Value, collection_key: &str) -> PageFetch {
    match body.get_mut(collection_key).map(Value::take) {
        Some(Value::Array(records)) => PageFetch::Records(records),
        Some(_) => PageFetch::Failed(PageFetchError::Payload(format!(
            "{collection_key} is not an array"
        ))),
        None => PageFetch::Failed(PageFetchError::Payload(format!(
            "{collection_key} missing from page"
        ))),
    }
}
