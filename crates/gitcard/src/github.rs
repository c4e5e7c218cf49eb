use crate::upstream::Upstream;
use crate::{CardError, Result};
use async_trait::async_trait;
use gitcard_core::{ActivityEvent, LanguageBytes, Profile, Repository};
use gitcard_render::EmbeddedImage;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
const REPOS_PER_PAGE: &str = "100";
const ACCEPT_V3: &str = "application/vnd.github.v3+json";
const CLIENT_USER_AGENT: &str = concat!("gitcard/", env!("CARGO_PKG_VERSION"));

/// [`Upstream`] backed by the GitHub REST API.
///
/// The client holds one connection pool and the credential; both are read-only after
/// construction, so a single instance is shared by all requests.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_base: Url,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(api_base: &str, token: Option<String>) -> Result<Self> {
        let api_base = Url::parse(api_base).map_err(|e| CardError::invalid_url(api_base, e))?;
        if api_base.cannot_be_a_base() {
            return Err(CardError::invalid_url(
                api_base.as_str(),
                "URL cannot be used as a base",
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| CardError::request("client", e))?;

        Ok(Self {
            http,
            api_base,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, resource: &str, url: Url) -> Result<T> {
        let mut request = self.http.get(url).header(ACCEPT, ACCEPT_V3);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("token {token}"));
        }
        let response = request
            .send()
            .await
            .map_err(|e| CardError::request(resource, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(CardError::Status {
                resource: resource.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| CardError::request(resource, e))?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl Upstream for GithubClient {
    async fn profile(&self, login: &str) -> Result<Profile> {
        self.get_json("profile", self.endpoint(&["users", login]))
            .await
    }

    async fn repositories(&self, login: &str) -> Result<Vec<Repository>> {
        let mut url = self.endpoint(&["users", login, "repos"]);
        url.query_pairs_mut().append_pair("per_page", REPOS_PER_PAGE);
        self.get_json("repositories", url).await
    }

    async fn events(&self, login: &str) -> Result<Vec<ActivityEvent>> {
        self.get_json("events", self.endpoint(&["users", login, "events"]))
            .await
    }

    async fn avatar(&self, avatar_url: &str) -> Result<EmbeddedImage> {
        let url = Url::parse(avatar_url).map_err(|e| CardError::invalid_url(avatar_url, e))?;
        // Avatars are served from a CDN and are fetched without the API credential.
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| CardError::request("avatar", e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(CardError::Status {
                resource: "avatar".to_string(),
                status: status.as_u16(),
            });
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CardError::request("avatar", e))?;
        Ok(EmbeddedImage::new(content_type.as_deref(), bytes.to_vec()))
    }

    async fn languages(&self, repository: &Repository) -> Result<LanguageBytes> {
        let url = Url::parse(&repository.languages_url)
            .map_err(|e| CardError::invalid_url(repository.languages_url.as_str(), e))?;
        self.get_json("languages", url).await
    }
}
