//! Single-page web surface: one country input, one "Generate Report"
//! trigger, and the agent's markdown report rendered below the form.

use crate::{
    config::Config,
    core::agent::Agent,
    report::{build_report_task, finance_toolset},
};
use axum::{
    extract::State,
    response::Html,
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

struct AppState {
    agent: Agent,
}

#[derive(Debug, Deserialize)]
struct ReportRequest {
    country: String,
}

/// Build the application router around a configured agent
pub fn router(agent: Agent) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/report", post(generate))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(AppState { agent }))
}

/// Bind and serve the web form until the process is stopped
pub async fn serve(config: Config) -> std::io::Result<()> {
    let mut agent = Agent::new(config.api_key.clone(), finance_toolset())
        .with_model(config.model.clone())
        .with_max_iterations(config.max_iterations);
    if let Some(base_url) = &config.base_url {
        agent = agent.with_base_url(base_url.clone());
    }

    let addr = format!("{}:{}", config.host, config.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(agent)).await
}

async fn index() -> Html<String> {
    Html(render_page(None, ""))
}

async fn generate(
    State(state): State<Arc<AppState>>,
    Form(request): Form<ReportRequest>,
) -> Html<String> {
    let task = build_report_task(&request.country);
    info!("Generating report for {}", request.country);

    let report = match state.agent.run(&task).await {
        Ok(report) => report,
        Err(err) => {
            error!("Report generation failed: {}", err);
            format!("Report generation failed: {}", err)
        }
    };

    Html(render_page(Some(&report), &request.country))
}

fn render_page(report: Option<&str>, country: &str) -> String {
    let report_block = match report {
        Some(text) => format!(
            "<section class=\"report\"><pre>{}</pre></section>",
            escape_html(text)
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Global Finance Intelligence Agent</title>
<style>
body {{ font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }}
.report pre {{ white-space: pre-wrap; background: #f6f6f6; padding: 1rem; border-radius: 6px; }}
input[type=text] {{ width: 16rem; padding: 0.4rem; }}
button {{ padding: 0.4rem 1rem; }}
</style>
</head>
<body>
<h1>🏦 Global Finance Intelligence Agent</h1>
<form method="post" action="/report">
<label for="country">Which country's markets should I analyze?</label><br>
<input type="text" id="country" name="country" placeholder="Japan" value="{}">
<button type="submit">Generate Report</button>
</form>
{}
</body>
</html>"#,
        escape_html(country),
        report_block
    )
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"R&D\"</b>"),
            "&lt;b&gt;&quot;R&amp;D&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_render_page_without_report() {
        let page = render_page(None, "");
        assert!(page.contains("Generate Report"));
        assert!(!page.contains("class=\"report\""));
    }

    #[test]
    fn test_render_page_with_report() {
        let page = render_page(Some("**Japan** report"), "Japan");
        assert!(page.contains("class=\"report\""));
        assert!(page.contains("**Japan** report"));
        assert!(page.contains("value=\"Japan\""));
    }
}
