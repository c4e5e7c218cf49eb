//! HTTP boundary: serves the rendered card at `/` and `/api/github-readme`.

use crate::config::ServerConfig;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use gitcard::{CardConfig, EmbeddedImage, GithubClient, Upstream, render_card};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

const SVG_CONTENT_TYPE: &str = "image/svg+xml";
const GENERATION_FAILED: &str = "Error generating SVG";

/// Read-only state shared by every request.
pub struct AppState {
    pub upstream: Arc<dyn Upstream>,
    pub login: String,
    pub card: CardConfig,
    pub mascot: Option<EmbeddedImage>,
    pub cache_control: HeaderValue,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Result<Self, crate::CliError> {
        let client = GithubClient::new(&config.api_base, config.token.clone())?;
        let mascot = config.load_mascot()?;
        if config.card.show_mascot && mascot.is_none() {
            tracing::info!("no MASCOT_PATH configured; cards render without a mascot");
        }
        Ok(Self {
            upstream: Arc::new(client),
            login: config.login.clone(),
            card: config.card.clone(),
            mascot,
            cache_control: config.cache_control.clone(),
        })
    }
}

pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(card))
        .route("/api/github-readme", get(card))
        .route("/health", get(health))
        .fallback(not_found)
        .with_state(state)
}

pub async fn serve(config: ServerConfig) -> Result<(), crate::CliError> {
    let state = Arc::new(AppState::from_config(&config)?);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, login = %config.login, "serving profile card");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutting down");
    }
}

async fn card(State(state): State<SharedState>) -> Response {
    let span = tracing::info_span!("card_request", request_id = %Uuid::new_v4(), login = %state.login);
    async move {
        let started = Instant::now();
        let result = render_card(
            state.upstream.as_ref(),
            &state.login,
            &state.card,
            state.mascot.as_ref(),
        )
        .await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(svg) => tracing::info!(bytes = svg.len(), elapsed_ms, "card rendered"),
            Err(err) => tracing::error!(error = %err, elapsed_ms, "card generation failed"),
        }
        card_response(result, &state.cache_control)
    }
    .instrument(span)
    .await
}

/// Maps the pipeline result onto the wire. Failure details stay in the logs.
pub fn card_response(result: gitcard::Result<String>, cache_control: &HeaderValue) -> Response {
    match result {
        Ok(svg) => (
            [
                (header::CONTENT_TYPE, HeaderValue::from_static(SVG_CONTENT_TYPE)),
                (header::CACHE_CONTROL, cache_control.clone()),
            ],
            svg,
        )
            .into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED).into_response(),
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gitcard::{CardError, Result};
    use gitcard_core::{ActivityEvent, LanguageBytes, Profile, Repository};

    struct StubUpstream {
        fail_profile: bool,
    }

    #[async_trait]
    impl Upstream for StubUpstream {
        async fn profile(&self, login: &str) -> Result<Profile> {
            if self.fail_profile {
                return Err(CardError::Status {
                    resource: "profile".to_string(),
                    status: 502,
                });
            }
            Ok(Profile {
                login: login.to_string(),
                avatar_url: "https://avatars.example.com/u/1".to_string(),
                html_url: format!("https://github.com/{login}"),
                ..Profile::default()
            })
        }

        async fn repositories(&self, _login: &str) -> Result<Vec<Repository>> {
            Ok(vec![Repository {
                name: "hello".to_string(),
                languages_url: "https://api.example.com/repos/mona/hello/languages".to_string(),
                ..Repository::default()
            }])
        }

        async fn events(&self, _login: &str) -> Result<Vec<ActivityEvent>> {
            Ok(Vec::new())
        }

        async fn avatar(&self, _avatar_url: &str) -> Result<EmbeddedImage> {
            Ok(EmbeddedImage::png(b"png".to_vec()))
        }

        async fn languages(&self, _repository: &Repository) -> Result<LanguageBytes> {
            Ok(LanguageBytes::from_iter([("Rust".to_string(), 10)]))
        }
    }

    async fn spawn(fail_profile: bool) -> String {
        let state = Arc::new(AppState {
            upstream: Arc::new(StubUpstream { fail_profile }),
            login: "mona".to_string(),
            card: CardConfig::default(),
            mascot: None,
            cache_control: HeaderValue::from_static("no-cache"),
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, create_router(state)).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn card_routes_serve_svg() {
        let base = spawn(false).await;
        for path in ["/", "/api/github-readme"] {
            let resp = reqwest::get(format!("{base}{path}")).await.unwrap();
            assert_eq!(resp.status(), 200);
            assert_eq!(resp.headers()["content-type"], SVG_CONTENT_TYPE);
            assert_eq!(resp.headers()["cache-control"], "no-cache");
            let body = resp.text().await.unwrap();
            assert!(body.starts_with("<svg"));
            assert!(body.contains("Rust (100.00%)"));
        }
    }

    #[tokio::test]
    async fn upstream_failure_is_a_generic_500() {
        let base = spawn(true).await;
        let resp = reqwest::get(format!("{base}/")).await.unwrap();
        assert_eq!(resp.status(), 500);
        assert_eq!(resp.text().await.unwrap(), GENERATION_FAILED);
    }

    #[tokio::test]
    async fn health_and_unknown_paths() {
        let base = spawn(false).await;
        let resp = reqwest::get(format!("{base}/health")).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.text().await.unwrap(), "OK");

        let resp = reqwest::get(format!("{base}/favicon.ico")).await.unwrap();
        assert_eq!(resp.status(), 404);
        assert_eq!(resp.text().await.unwrap(), "Not Found");
    }

    #[test]
    fn error_response_hides_details() {
        let resp = card_response(
            Err(CardError::Status {
                resource: "events".to_string(),
                status: 403,
            }),
            &HeaderValue::from_static("no-cache"),
        );
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(resp.headers().get(header::CACHE_CONTROL).is_none());
    }
}
