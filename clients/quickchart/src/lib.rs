//! [QuickChart](https://quickchart.io) implementation of [`lang_radar::api::ChartRenderer`].
//!
//! The radar chart is described as a Chart.js configuration and rendered remotely into a PNG.

use async_trait::async_trait;
use lang_radar::api::{ChartRenderer, ChartRequest, Error, Result};
use log::{debug, error};
use serde::Serialize;
use serde_json::{json, Value};
use url::Url;

pub const QUICKCHART_URL: &str = "https://quickchart.io";

const PALETTE: [(u8, u8, u8); 5] = [
    (75, 192, 192),
    (255, 159, 64),
    (153, 102, 255),
    (255, 99, 132),
    (54, 162, 235),
];
const CHART_JS_VERSION: &str = "3";
const DEFAULT_TEXT_COLOR: &str = "#333";
const DEFAULT_GRID_COLOR: &str = "rgba(200, 200, 200, 0.5)";
const DEFAULT_BACKGROUND_COLOR: &str = "#FFFFFF";

pub struct QuickChartClient {
    client: reqwest::Client,
    chart_url: Url,
}

impl QuickChartClient {
    pub fn new<STR: AsRef<str>>(base_url: STR) -> Result<Self> {
        let mut chart_url = Url::parse(base_url.as_ref()).map_err(anyhow::Error::from)?;
        chart_url
            .path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Chart URL {} cannot be a base URL", base_url.as_ref()))?
            .pop_if_empty()
            .push("chart");
        let client = reqwest::Client::builder().build().map_err(anyhow::Error::from)?;
        Ok(QuickChartClient { client, chart_url })
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RenderBody {
    /// Chart.js major version the config is written for.
    version: &'static str,
    chart: Value,
    width: u32,
    height: u32,
    format: &'static str,
    background_color: String,
}

#[async_trait]
impl ChartRenderer for QuickChartClient {
    async fn render(&self, chart: &ChartRequest) -> Result<Vec<u8>> {
        let body = RenderBody {
            version: CHART_JS_VERSION,
            chart: radar_config(chart),
            width: chart.style.width,
            height: chart.style.height,
            format: "png",
            background_color: chart
                .style
                .background_color
                .clone()
                .unwrap_or_else(|| DEFAULT_BACKGROUND_COLOR.to_string()),
        };
        debug!("Rendering chart \"{}\" via {}", chart.title, self.chart_url);
        let response = self
            .client
            .post(self.chart_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|err| Error::Rendering(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("QuickChart responded with status {}: {}", status, text);
            return Err(Error::Rendering(format!("status {}: {}", status, text)));
        }
        let image = response.bytes().await.map_err(|err| Error::Rendering(err.to_string()))?;
        Ok(image.to_vec())
    }
}

fn rgba((r, g, b): (u8, u8, u8), alpha: f32) -> String {
    format!("rgba({}, {}, {}, {})", r, g, b, alpha)
}

/// One color per vertex unless the caller fixed a single color.
fn vertex_colors(count: usize, fixed: &Option<String>, alpha: f32) -> Value {
    match fixed {
        Some(color) => json!(color),
        None => json!((0..count).map(|i| rgba(PALETTE[i % PALETTE.len()], alpha)).collect::<Vec<_>>()),
    }
}

/// Chart.js 3 radar configuration.
fn radar_config(chart: &ChartRequest) -> Value {
    let style = &chart.style;
    let count = chart.labels.len();
    let text_color = style.text_color.as_deref().unwrap_or(DEFAULT_TEXT_COLOR);
    let grid_color = style.grid_color.as_deref().unwrap_or(DEFAULT_GRID_COLOR);
    json!({
        "type": "radar",
        "data": {
            "labels": chart.labels,
            "datasets": [{
                "data": chart.values,
                "backgroundColor": vertex_colors(count, &style.fill_color, 0.7),
                "borderColor": vertex_colors(count, &style.line_color, 1.0),
                "borderWidth": 2,
                "pointBackgroundColor": vertex_colors(count, &style.point_color, 1.0),
                "pointBorderColor": "#fff",
            }]
        },
        "options": {
            "layout": { "padding": { "left": 10, "right": 10, "top": 10, "bottom": 10 } },
            "elements": {
                "line": { "borderWidth": 3 },
                "point": { "radius": 5, "hoverRadius": 7 }
            },
            "scales": {
                "r": {
                    "angleLines": { "display": false },
                    "suggestedMin": 0,
                    "suggestedMax": chart.suggested_max,
                    "ticks": { "display": false },
                    "pointLabels": {
                        "display": true,
                        "color": text_color,
                        "font": { "size": 14, "weight": "bold" }
                    },
                    "grid": { "color": grid_color }
                }
            },
            "plugins": {
                "legend": { "display": false },
                "title": {
                    "display": true,
                    "text": chart.title,
                    "color": text_color,
                    "font": { "size": 18 }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lang_radar::api::ChartStyle;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    fn chart(style: ChartStyle) -> ChartRequest {
        ChartRequest {
            title: "Top 5 Linguagens por Bytes de Código de octocat".to_string(),
            labels: vec!["Rust", "Go", "Linguagem 3", "Linguagem 4", "Linguagem 5"]
                .into_iter()
                .map(String::from)
                .collect(),
            values: vec![8.0, 6.0, 0.0, 0.0, 0.0],
            suggested_max: 8.8,
            style,
        }
    }

    #[test]
    fn default_style_config_test() {
        let config = radar_config(&chart(ChartStyle::default()));
        assert_eq!(config["type"], "radar");
        assert_eq!(config["data"]["labels"][0], "Rust");
        assert_eq!(config["data"]["datasets"][0]["data"][1], 6.0);
        assert_eq!(config["data"]["datasets"][0]["backgroundColor"][0], "rgba(75, 192, 192, 0.7)");
        assert_eq!(config["data"]["datasets"][0]["borderColor"][4], "rgba(54, 162, 235, 1)");
        assert!(config["options"].get("scale").is_none());
        assert_eq!(config["options"]["scales"]["r"]["suggestedMin"], 0);
        assert_eq!(config["options"]["scales"]["r"]["suggestedMax"], 8.8);
        assert_eq!(config["options"]["scales"]["r"]["grid"]["color"], DEFAULT_GRID_COLOR);
        assert_eq!(config["options"]["scales"]["r"]["pointLabels"]["color"], DEFAULT_TEXT_COLOR);
        assert_eq!(
            config["options"]["plugins"]["title"]["text"],
            "Top 5 Linguagens por Bytes de Código de octocat"
        );
    }

    #[test]
    fn custom_style_config_test() {
        let style = ChartStyle {
            line_color: Some("#ff0000".to_string()),
            text_color: Some("white".to_string()),
            grid_color: Some("#222".to_string()),
            ..ChartStyle::default()
        };
        let config = radar_config(&chart(style));
        assert_eq!(config["data"]["datasets"][0]["borderColor"], "#ff0000");
        assert!(config["data"]["datasets"][0]["backgroundColor"].is_array());
        assert_eq!(config["options"]["scales"]["r"]["pointLabels"]["color"], "white");
        assert_eq!(config["options"]["scales"]["r"]["grid"]["color"], "#222");
        assert_eq!(config["options"]["plugins"]["title"]["color"], "white");
    }

    #[tokio::test]
    async fn render_test() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chart"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(PNG, "image/png"))
            .expect(1)
            .mount(&server)
            .await;

        let client = QuickChartClient::new(server.uri()).unwrap();
        let image = client.render(&chart(ChartStyle::default())).await.unwrap();
        assert_eq!(image, PNG);

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["version"], "3");
        assert_eq!(body["width"], 500);
        assert_eq!(body["format"], "png");
        assert_eq!(body["backgroundColor"], DEFAULT_BACKGROUND_COLOR);
        assert_eq!(body["chart"]["type"], "radar");
    }

    #[test]
    fn chart_url_test() {
        let client = QuickChartClient::new(QUICKCHART_URL).unwrap();
        assert_eq!(client.chart_url.as_str(), "https://quickchart.io/chart");
        let client = QuickChartClient::new("https://charts.example.com/qc").unwrap();
        assert_eq!(client.chart_url.as_str(), "https://charts.example.com/qc/chart");
        let client = QuickChartClient::new("https://charts.example.com/qc/").unwrap();
        assert_eq!(client.chart_url.as_str(), "https://charts.example.com/qc/chart");
        assert!(QuickChartClient::new("mailto:charts@example.com").is_err());
    }

    #[tokio::test]
    async fn prefixed_chart_url_test() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/qc/chart"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(PNG, "image/png"))
            .expect(1)
            .mount(&server)
            .await;

        let client = QuickChartClient::new(format!("{}/qc", server.uri())).unwrap();
        let image = client.render(&chart(ChartStyle::default())).await.unwrap();
        assert_eq!(image, PNG);
    }

    #[tokio::test]
    async fn render_failure_test() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chart"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Invalid chart"))
            .mount(&server)
            .await;

        let client = QuickChartClient::new(server.uri()).unwrap();
        match client.render(&chart(ChartStyle::default())).await {
            Err(Error::Rendering(message)) => assert!(message.contains("Invalid chart")),
            other => panic!("Expected rendering error, got {:?}", other),
        }
    }
}
