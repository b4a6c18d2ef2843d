//! Web form for interactive questions.
//!
//! Serves a single page with one text input and one output area, plus a
//! JSON endpoint for integration with other systems.

use crate::cli::Output;
use crate::config::Settings;
use crate::session::{SessionDriver, SessionOutcome};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
///
/// The driver handles one question start-to-finish at a time; the mutex
/// serializes requests against it. The index inside is immutable after build.
struct AppState {
    driver: tokio::sync::Mutex<SessionDriver>,
}

/// Run the web server. The index is built once here, before any request
/// is accepted.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let spinner = Output::spinner("Indexing transcript...");
    let driver = match SessionDriver::bootstrap(&settings).await {
        Ok(driver) => driver,
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("{}", e));
            return Err(e.into());
        }
    };
    spinner.finish_and_clear();
    Output::success(&format!("Indexed {} chunks", driver.index().len()));

    let state = Arc::new(AppState {
        driver: tokio::sync::Mutex::new(driver),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(index).post(submit))
        .route("/health", get(health))
        .route("/api/ask", post(api_ask))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Svar");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Web form", "GET  /");
    Output::kv("Health", "GET  /health");
    Output::kv("Ask (JSON)", "POST /api/ask");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct QuestionForm {
    #[serde(default)]
    question: String,
}

#[derive(Deserialize)]
struct AskRequest {
    question: String,
}

#[derive(Serialize)]
struct AskResponse {
    answer: String,
    usage: UsageInfo,
    sources: Vec<SourceInfo>,
}

#[derive(Serialize)]
struct UsageInfo {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
    estimated_cost_usd: f64,
}

#[derive(Serialize)]
struct SourceInfo {
    char_range: String,
    score: f32,
    content: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// === Handlers ===

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let driver = state.driver.lock().await;
    let index = driver.index();
    Json(serde_json::json!({
        "status": "ok",
        "chunks": index.len(),
        "index_built_at": index.built_at().to_rfc3339(),
    }))
}

async fn index() -> Html<String> {
    Html(render_page("", None, None))
}

async fn submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<QuestionForm>,
) -> Html<String> {
    let mut driver = state.driver.lock().await;

    match driver.handle(&form.question).await {
        Ok(SessionOutcome::Answered { answer, sources }) => {
            let body = format!(
                "<h2>Answer</h2>\n<p>{}</p>\n<p class=\"meta\">{} prompt + {} completion tokens, est. ${:.6}</p>\n{}",
                escape_html(&answer.text),
                answer.usage.prompt_tokens,
                answer.usage.completion_tokens,
                answer.usage.estimated_cost_usd,
                render_sources(&sources),
            );
            Html(render_page(&form.question, Some(&body), None))
        }
        // Empty question: just show the form again, no error.
        Ok(SessionOutcome::NoQuestion) => Html(render_page("", None, None)),
        Err(e) => Html(render_page(&form.question, None, Some(&e.to_string()))),
    }
}

async fn api_ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> impl IntoResponse {
    let mut driver = state.driver.lock().await;

    match driver.handle(&req.question).await {
        Ok(SessionOutcome::Answered { answer, sources }) => Json(AskResponse {
            answer: answer.text,
            usage: UsageInfo {
                prompt_tokens: answer.usage.prompt_tokens,
                completion_tokens: answer.usage.completion_tokens,
                total_tokens: answer.usage.total_tokens,
                estimated_cost_usd: answer.usage.estimated_cost_usd,
            },
            sources: sources
                .into_iter()
                .map(|s| SourceInfo {
                    char_range: s.chunk.char_range(),
                    score: s.score,
                    content: s.chunk.text,
                })
                .collect(),
        })
        .into_response(),
        Ok(SessionOutcome::NoQuestion) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "question must not be empty".to_string(),
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

// === Rendering ===

fn render_page(question: &str, result: Option<&str>, error: Option<&str>) -> String {
    let result_block = match (result, error) {
        (Some(body), _) => format!("<div class=\"result\">{}</div>", body),
        (None, Some(err)) => format!(
            "<div class=\"result error\">Error: {}</div>",
            escape_html(err)
        ),
        (None, None) => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Ask about the podcast</title>
<style>
body {{ font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }}
input[type=text] {{ width: 100%; padding: 0.5rem; font-size: 1rem; }}
button {{ margin-top: 0.5rem; padding: 0.5rem 1rem; }}
.result {{ margin-top: 1.5rem; padding: 1rem; background: #f4f4f4; border-radius: 4px; }}
.result.error {{ background: #fdd; }}
.meta {{ color: #666; font-size: 0.85rem; }}
.source {{ margin-top: 0.75rem; font-size: 0.9rem; color: #444; }}
</style>
</head>
<body>
<h1>Ask about the podcast</h1>
<p>Welcome! Ask a question about this episode.</p>
<form method="post" action="/">
<input type="text" name="question" value="{}" placeholder="Ask a question about the episode...">
<button type="submit">Ask</button>
</form>
{}
</body>
</html>"#,
        escape_html(question),
        result_block
    )
}

fn render_sources(sources: &[crate::vector_index::ScoredChunk]) -> String {
    if sources.is_empty() {
        return String::new();
    }

    let items: String = sources
        .iter()
        .map(|s| {
            format!(
                "<div class=\"source\"><strong>{}</strong> (score: {:.2})<br>{}</div>",
                escape_html(&s.chunk.char_range()),
                s.score,
                escape_html(&s.chunk.text)
            )
        })
        .collect();

    format!("<h2>Sources</h2>\n{}", items)
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::Chunk;
    use crate::config::{AnswerSettings, Credentials, Prompts};
    use crate::embedding::Embedder;
    use crate::qa::{AnswerEngine, Retriever};
    use crate::vector_index::VectorIndex;
    use async_trait::async_trait;

    struct NoopEmbedder;

    #[async_trait]
    impl Embedder for NoopEmbedder {
        async fn embed(&self, _text: &str) -> crate::Result<Vec<f32>> {
            Ok(vec![0.0, 0.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> crate::Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![0.0, 0.0]).collect())
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    fn test_state() -> Arc<AppState> {
        let index = Arc::new(
            VectorIndex::build(
                vec![
                    Chunk::new(0, "first part".to_string(), 0, 0),
                    Chunk::new(1, "second part".to_string(), 10, 0),
                ],
                vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            )
            .unwrap(),
        );
        let retriever = Retriever::new(index, Arc::new(NoopEmbedder), 4);
        let engine = AnswerEngine::new(
            &Credentials::new("sk-test"),
            &AnswerSettings::default(),
            Prompts::default(),
        )
        .unwrap();

        Arc::new(AppState {
            driver: tokio::sync::Mutex::new(SessionDriver::with_components(retriever, engine)),
        })
    }

    #[tokio::test]
    async fn test_health_reports_index() {
        let Json(body) = health(State(test_state())).await;

        assert_eq!(body["status"], "ok");
        assert_eq!(body["chunks"], 2);
        assert!(body["index_built_at"].is_string());
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_render_page_includes_question_and_error() {
        let page = render_page("who?", None, Some("boom <script>"));
        assert!(page.contains("value=\"who?\""));
        assert!(page.contains("Error: boom &lt;script&gt;"));
        assert!(page.contains("Ask about the podcast"));
    }

    #[test]
    fn test_render_page_empty_state() {
        let page = render_page("", None, None);
        assert!(!page.contains("class=\"result\""));
    }
}
