//! Palette server client.
//!
//! This crate provides a lightweight client for the palette-extraction
//! server. It focuses on:
//!
//! - Resolving and validating the server base URL
//! - Building the multipart upload (`image` plus optional `top_n`)
//! - Decoding the JSON contract into [`UploadReply`]
//! - History listing, deletion and artifact downloads
//!
//! The primary entry point is [`PaletteClient`]. The [`PaletteService`] trait
//! is the seam the TUI depends on so it can run against a fake in tests.
//!
//! # Example
//!
//! ```ignore
//! use swatchbox_api::{ClientConfig, PaletteClient};
//!
//! # async fn demo(file: swatchbox_types::SelectedFile) -> Result<(), swatchbox_api::PaletteApiError> {
//! let client = PaletteClient::new(ClientConfig::resolve(None, None))?;
//! let reply = client.upload(file, Some(5)).await?;
//! println!("{:?}", reply);
//! # Ok(())
//! # }
//! ```

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Url, header};
use swatchbox_types::{HistoryItem, HistoryQuery, SelectedFile, UploadReply};
use swatchbox_util::{download_file_name, filter_history_by_name, normalize_color_filter, truncate_for_summary};
use tracing::debug;

mod error;
mod reply;
#[cfg(test)]
mod test_server;

pub use error::PaletteApiError;
pub use reply::{parse_delete_reply, parse_history_page, parse_upload_reply};

/// Environment variable holding the server base URL.
pub const BASE_URL_ENV: &str = "SWATCHBOX_BASE_URL";
/// Environment variable overriding the upload endpoint path.
pub const UPLOAD_PATH_ENV: &str = "SWATCHBOX_UPLOAD_PATH";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_UPLOAD_PATH: &str = "/upload";
pub const HISTORY_PATH: &str = "/api/palettes";
pub const DELETE_PATH: &str = "/api/delete";

/// Multipart field carrying the image bytes.
pub const IMAGE_FIELD: &str = "image";
/// Multipart field carrying the requested color count as decimal text.
pub const TOP_N_FIELD: &str = "top_n";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Hostnames allowed to use plain HTTP.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1", "[::1]", "::1"];

/// Connection settings for [`PaletteClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub upload_path: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            upload_path: DEFAULT_UPLOAD_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Resolve settings with precedence: explicit value, `SWATCHBOX_BASE_URL`,
    /// saved preference, built-in default. The upload path comes from
    /// `SWATCHBOX_UPLOAD_PATH` or the default.
    pub fn resolve(explicit_base_url: Option<&str>, preferred_base_url: Option<&str>) -> Self {
        let from_env = env::var(BASE_URL_ENV).ok();
        let base_url = [explicit_base_url, from_env.as_deref(), preferred_base_url]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        let upload_path = env::var(UPLOAD_PATH_ENV)
            .ok()
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty())
            .map(|path| if path.starts_with('/') { path } else { format!("/{}", path) })
            .unwrap_or_else(|| DEFAULT_UPLOAD_PATH.to_string());

        Self {
            base_url,
            upload_path,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Operations the interactive client needs from the server.
#[async_trait]
pub trait PaletteService: Send + Sync {
    /// Submit an image and decode the reply.
    async fn upload(&self, file: SelectedFile, top_n: Option<u32>) -> Result<UploadReply, PaletteApiError>;

    /// Fetch a server artifact into `dir`, returning the written path.
    async fn download(&self, url: &str, dir: &Path) -> Result<PathBuf, PaletteApiError>;
}

/// Thin wrapper around a configured `reqwest::Client` for the palette server.
#[derive(Debug, Clone)]
pub struct PaletteClient {
    pub config: ClientConfig,
    pub http: Client,
    pub user_agent: String,
}

impl PaletteClient {
    /// Validate `config` and build the underlying HTTP client.
    pub fn new(config: ClientConfig) -> Result<Self, PaletteApiError> {
        validate_base_url(&config.base_url)?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            config,
            http,
            user_agent: format!("swatchbox/0.1; {}", env::consts::OS),
        })
    }

    /// Build a request for a server-relative path.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(%url, %method, "building request");

        self.http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }

    /// Resolve an absolute or server-relative URL against the base URL.
    pub fn resolve_url(&self, url: &str) -> Result<Url, PaletteApiError> {
        let base = Url::parse(&self.config.base_url)
            .map_err(|error| PaletteApiError::invalid_base_url(&self.config.base_url, error.to_string()))?;
        base.join(url.trim())
            .map_err(|error| PaletteApiError::invalid_base_url(url, error.to_string()))
    }

    /// Upload an image. Consumes the file so its bytes live only as long as the request.
    pub async fn upload(&self, file: SelectedFile, top_n: Option<u32>) -> Result<UploadReply, PaletteApiError> {
        debug!(file = %file.file_name, mime = %file.mime_type, bytes = file.bytes.len(), ?top_n, "uploading image");
        let form = build_upload_form(file, top_n)?;

        let response = self
            .request(Method::POST, &self.config.upload_path)
            .multipart(form)
            .send()
            .await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        debug!(status, bytes = text.len(), "upload response received");

        parse_upload_reply(status, &text)
    }

    /// List stored palettes, newest first as the server returns them.
    ///
    /// The color filter is sent as lowercase `#rrggbb` and dropped when it is
    /// black or unparseable. The filename search is applied again locally so
    /// older servers that ignore the parameter still honor it.
    pub async fn list_palettes(&self, query: &HistoryQuery) -> Result<Vec<HistoryItem>, PaletteApiError> {
        let mut effective = query.clone();
        effective.color = query.color.as_deref().and_then(normalize_color_filter);

        let response = self
            .request(Method::GET, HISTORY_PATH)
            .query(&effective.as_pairs())
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(PaletteApiError::Status {
                status: status.as_u16(),
                body: truncate_for_summary(&text, 200),
            });
        }

        let page = parse_history_page(status.as_u16(), &text)?;
        Ok(filter_history_by_name(page.palettes, effective.search.as_deref()))
    }

    /// Delete a stored palette and its artifacts.
    pub async fn delete_palette(&self, id: i64) -> Result<(), PaletteApiError> {
        let path = format!("{}/{}", DELETE_PATH, id);
        let response = self.request(Method::DELETE, &path).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(PaletteApiError::Status {
                status: status.as_u16(),
                body: truncate_for_summary(&text, 200),
            });
        }
        parse_delete_reply(status.as_u16(), &text)
    }

    /// Download `url` into `dir`, naming the file after the URL's last path segment.
    pub async fn download(&self, url: &str, dir: &Path) -> Result<PathBuf, PaletteApiError> {
        let file_name = download_file_name(url).ok_or_else(|| PaletteApiError::NoFileName(url.to_string()))?;
        let resolved = self.resolve_url(url)?;
        debug!(url = %resolved, "downloading artifact");

        let response = self
            .http
            .get(resolved)
            .header(header::USER_AGENT, &self.user_agent)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaletteApiError::Status {
                status: status.as_u16(),
                body: truncate_for_summary(&body, 200),
            });
        }
        let bytes = response.bytes().await?;

        tokio::fs::create_dir_all(dir).await?;
        let target = dir.join(file_name);
        tokio::fs::write(&target, &bytes).await?;
        Ok(target)
    }
}

#[async_trait]
impl PaletteService for PaletteClient {
    async fn upload(&self, file: SelectedFile, top_n: Option<u32>) -> Result<UploadReply, PaletteApiError> {
        PaletteClient::upload(self, file, top_n).await
    }

    async fn download(&self, url: &str, dir: &Path) -> Result<PathBuf, PaletteApiError> {
        PaletteClient::download(self, url, dir).await
    }
}

/// Build the multipart body: the file under [`IMAGE_FIELD`] and, when set,
/// the color count under [`TOP_N_FIELD`].
pub fn build_upload_form(file: SelectedFile, top_n: Option<u32>) -> Result<Form, PaletteApiError> {
    let part = Part::bytes(file.bytes)
        .file_name(file.file_name)
        .mime_str(&file.mime_type)?;

    let mut form = Form::new().part(IMAGE_FIELD, part);
    if let Some(count) = top_n {
        form = form.text(TOP_N_FIELD, count.to_string());
    }
    Ok(form)
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - scheme must be `http` or `https`
/// - `localhost`, `127.0.0.1` and `::1`: either scheme
/// - any other host: HTTPS only
pub fn validate_base_url(base: &str) -> Result<(), PaletteApiError> {
    let parsed = Url::parse(base).map_err(|error| PaletteApiError::invalid_base_url(base, error.to_string()))?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(PaletteApiError::invalid_base_url(
            base,
            format!("unsupported scheme '{}'", scheme),
        ));
    }

    let host_name = parsed
        .host_str()
        .ok_or_else(|| PaletteApiError::invalid_base_url(base, "missing host"))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    if scheme != "https" {
        return Err(PaletteApiError::invalid_base_url(
            base,
            "non-localhost hosts must use https",
        ));
    }
    Ok(())
}
