pub type Result<T> = std::result::Result<T, CardError>;

#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error("request for {resource} failed: {source}")]
    Request {
        resource: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request for {resource} returned HTTP {status}")]
    Status { resource: String, status: u16 },
    #[error("invalid upstream URL {url:?}: {message}")]
    InvalidUrl { url: String, message: String },
    #[error(transparent)]
    Render(#[from] gitcard_render::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CardError {
    pub(crate) fn request(resource: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Request {
            resource: resource.into(),
            source,
        }
    }

    pub(crate) fn invalid_url(url: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: message.to_string(),
        }
    }
}
