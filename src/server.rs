use crate::args::ResponseFormat;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use github_client::GithubClient;
use lang_radar::api::{ChartRenderer, ChartStyle, Error};
use lang_radar::LanguageRadar;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const CACHE_CONTROL: &str = "s-maxage=3600, stale-while-revalidate";

#[derive(Clone)]
pub struct AppState {
    radar: Arc<LanguageRadar<GithubClient>>,
    renderer: Arc<dyn ChartRenderer>,
    format: ResponseFormat,
    width: u32,
    height: u32,
}

impl AppState {
    pub fn new<RENDERER>(
        radar: LanguageRadar<GithubClient>,
        renderer: RENDERER,
        format: ResponseFormat,
        width: u32,
        height: u32,
    ) -> Self
    where
        RENDERER: 'static + ChartRenderer,
    {
        AppState {
            radar: Arc::new(radar),
            renderer: Arc::new(renderer),
            format,
            width,
            height,
        }
    }
}

/// Query string of `/api/generate-chart`. Colors are forwarded to the renderer untouched.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChartQuery {
    pub username: Option<String>,
    pub format: Option<ResponseFormat>,
    pub line_color: Option<String>,
    pub fill_color: Option<String>,
    pub point_color: Option<String>,
    pub text_color: Option<String>,
    pub grid_color: Option<String>,
    pub background_color: Option<String>,
}

impl ChartQuery {
    fn style(&self, width: u32, height: u32) -> ChartStyle {
        ChartStyle {
            line_color: self.line_color.clone(),
            fill_color: self.fill_color.clone(),
            point_color: self.point_color.clone(),
            text_color: self.text_color.clone(),
            grid_color: self.grid_color.clone(),
            background_color: self.background_color.clone(),
            width,
            height,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartEnvelope {
    pub image_data: String,
    pub other_languages: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

pub fn status_code(err: &Error) -> StatusCode {
    match err {
        Error::MissingUsername | Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        Error::UserNotFound(_) => StatusCode::NOT_FOUND,
        Error::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        Error::Upstream { .. } => StatusCode::BAD_GATEWAY,
        Error::Rendering(_) | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_code(&self.0);
        if status.is_server_error() {
            error!("Chart generation failed: {}", self.0);
        } else {
            warn!("Chart request rejected: {}", self.0);
        }
        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate-chart", get(generate_chart))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

pub async fn generate_chart(
    State(state): State<AppState>,
    query: Result<Query<ChartQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|rejection| Error::InvalidQuery(rejection.body_text()))?;
    let username = query
        .username
        .as_deref()
        .map(str::trim)
        .filter(|username| !username.is_empty())
        .ok_or(Error::MissingUsername)?;
    info!("Generating language chart for {}", username);

    let profile = state.radar.profile(username).await?;
    let chart = profile.chart_request(query.style(state.width, state.height));
    let image = state.renderer.render(&chart).await?;
    info!("Chart for {} rendered ({} bytes)", username, image.len());

    let response = match query.format.unwrap_or(state.format) {
        ResponseFormat::Image => (
            [(header::CONTENT_TYPE, "image/png"), (header::CACHE_CONTROL, CACHE_CONTROL)],
            image,
        )
            .into_response(),
        ResponseFormat::Json => {
            let envelope = ChartEnvelope {
                image_data: format!("data:image/png;base64,{}", STANDARD.encode(&image)),
                other_languages: profile.other_languages().to_vec(),
            };
            ([(header::CACHE_CONTROL, CACHE_CONTROL)], Json(envelope)).into_response()
        }
    };
    Ok(response)
}

#[test]
fn status_code_test() {
    assert_eq!(status_code(&Error::MissingUsername), StatusCode::BAD_REQUEST);
    assert_eq!(
        status_code(&Error::InvalidQuery("unknown variant".to_string())),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(status_code(&Error::UserNotFound("ghost".to_string())), StatusCode::NOT_FOUND);
    assert_eq!(
        status_code(&Error::RateLimited { reset: None }),
        StatusCode::TOO_MANY_REQUESTS
    );
    assert_eq!(status_code(&Error::upstream(Some(500), "boom")), StatusCode::BAD_GATEWAY);
    assert_eq!(
        status_code(&Error::Rendering("boom".to_string())),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}
