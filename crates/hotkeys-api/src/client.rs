// REST store HTTP client
//
// Wraps `reqwest::Client` with table URL construction, credential headers,
// and PostgREST error-envelope parsing. Table-specific endpoints live in
// `catalog.rs` as inherent methods so this module stays focused on
// transport mechanics.

use std::sync::RwLock;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::query::Query;
use crate::transport::TransportConfig;

/// Path prefix under which the store exposes its tables.
const REST_PREFIX: &str = "/rest/v1";

/// Error body returned by the store on non-2xx responses.
#[derive(serde::Deserialize)]
struct StoreErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

/// Raw HTTP client for the catalog store.
///
/// Every request carries the project `apikey` header and an
/// `Authorization: Bearer` header (the user's access token when one is set,
/// the API key otherwise). Writes ask for `return=representation` so the
/// affected rows come back in the response body.
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
    /// Access token of the signed-in user. Row-level security on the
    /// `favorites` table keys off this token.
    access_token: RwLock<Option<SecretString>>,
}

impl RestClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// The `base_url` is the project root (e.g. `https://xyz.supabase.co`);
    /// the `/rest/v1` prefix is appended per request.
    pub fn new(
        base_url: Url,
        api_key: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = transport.build_client_with_headers(headers)?;
        Ok(Self::with_client(http, base_url, api_key))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, api_key: SecretString) -> Self {
        Self {
            http,
            base_url,
            api_key,
            access_token: RwLock::new(None),
        }
    }

    /// The project base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Set or clear the signed-in user's access token.
    pub fn set_access_token(&self, token: Option<SecretString>) {
        debug!(present = token.is_some(), "updating access token");
        *self.access_token.write().expect("access token lock poisoned") = token;
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/rest/v1/{table}?{query}`.
    pub(crate) fn table_url(&self, table: &str, query: &Query) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{REST_PREFIX}/{table}"))?;
        query.apply(&mut url);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// `GET` rows matching the query.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
    ) -> Result<Vec<T>, Error> {
        let url = self.table_url(table, query)?;
        debug!("GET {}", url);
        self.send(self.http.get(url)).await
    }

    /// `POST` one row, returning the inserted representation.
    pub async fn insert<T: DeserializeOwned>(
        &self,
        table: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<Vec<T>, Error> {
        let url = self.table_url(table, &Query::new())?;
        debug!("POST {}", url);
        let builder = self
            .http
            .post(url)
            .header("Prefer", "return=representation")
            .json(body);
        self.send(builder).await
    }

    /// `PATCH` rows matching the query, returning the updated rows.
    pub async fn update<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
        body: &(impl Serialize + Sync),
    ) -> Result<Vec<T>, Error> {
        require_filter(table, query)?;
        let url = self.table_url(table, query)?;
        debug!("PATCH {}", url);
        let builder = self
            .http
            .patch(url)
            .header("Prefer", "return=representation")
            .json(body);
        self.send(builder).await
    }

    /// `DELETE` rows matching the query, returning the deleted rows.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
    ) -> Result<Vec<T>, Error> {
        require_filter(table, query)?;
        let url = self.table_url(table, query)?;
        debug!("DELETE {}", url);
        let builder = self
            .http
            .delete(url)
            .header("Prefer", "return=representation");
        self.send(builder).await
    }

    /// Attach credentials, send, and decode the row array.
    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<Vec<T>, Error> {
        let resp = self
            .authorize(builder)
            .send()
            .await
            .map_err(Error::Transport)?;
        parse_rows(resp).await
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.access_token.read().expect("access token lock poisoned");
        let bearer = guard
            .as_ref()
            .map_or_else(|| self.api_key.expose_secret(), |t| t.expose_secret());
        builder
            .header("apikey", self.api_key.expose_secret())
            .header(AUTHORIZATION, format!("Bearer {bearer}"))
    }
}

fn require_filter(table: &str, query: &Query) -> Result<(), Error> {
    if query.has_filters() {
        Ok(())
    } else {
        Err(Error::Rest {
            message: format!("refusing to write to every row of '{table}' without a filter"),
            code: None,
            status: 400,
        })
    }
}

/// Decode a row array, or map the store's error envelope.
async fn parse_rows<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Vec<T>, Error> {
    let status = resp.status();

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<StoreErrorBody>(&body).ok();
        let message = parsed
            .as_ref()
            .and_then(|e| {
                e.message.clone().map(|m| match e.details {
                    Some(ref d) => format!("{m} ({d})"),
                    None => m,
                })
            })
            .unwrap_or_else(|| format!("HTTP {status}: {}", &body[..body.len().min(200)]));

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication { message });
        }

        return Err(Error::Rest {
            message,
            code: parsed.and_then(|e| e.code),
            status: status.as_u16(),
        });
    }

    let body = resp.text().await.map_err(Error::Transport)?;
    if body.trim().is_empty() {
        trace!("empty response body, treating as no rows");
        return Ok(Vec::new());
    }

    serde_json::from_str(&body).map_err(|e| {
        let preview = &body[..body.len().min(200)];
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.clone(),
        }
    })
}
