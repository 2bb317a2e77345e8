//! API reference: the OpenAPI document and the Scalar page rendering it

use super::state::AppState;
use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde_json::{json, Value};

/// Path the OpenAPI document is served from
pub const OPENAPI_PATH: &str = "/openapi.json";

const DESCRIPTION: &str = "API for processing Holly (ElevenLabs) conversation webhooks";
const SCALAR_CDN: &str = "https://cdn.jsdelivr.net/npm/@scalar/api-reference";

/// GET /openapi.json
pub async fn openapi(State(state): State<AppState>) -> Json<Value> {
    Json(openapi_document(&state.application.name, &state.application.version))
}

/// GET /docs
pub async fn scalar(State(state): State<AppState>) -> Html<String> {
    Html(scalar_page(&state.application.name, OPENAPI_PATH))
}

/// OpenAPI 3.1 description of the shell endpoints
///
/// `/docs` itself is not listed.
pub fn openapi_document(title: &str, version: &str) -> Value {
    json!({
        "openapi": "3.1.0",
        "info": {
            "title": title,
            "description": DESCRIPTION,
            "version": version,
        },
        "paths": {
            "/": {
                "get": {
                    "summary": "Root",
                    "operationId": "root",
                    "responses": {
                        "200": {
                            "description": "Entry points of the API",
                            "content": { "application/json": { "schema": { "type": "object" } } }
                        }
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Health Check",
                    "operationId": "health_check",
                    "responses": {
                        "200": {
                            "description": "Service is up",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "status": { "type": "string", "const": "healthy" },
                                            "service": { "type": "string" },
                                            "storage": { "type": "string", "enum": ["ready", "degraded"] }
                                        },
                                        "required": ["status", "service", "storage"]
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    })
}

/// HTML page loading the Scalar API reference for `openapi_url`
pub fn scalar_page(title: &str, openapi_url: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
  <head>
    <title>{title}</title>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
  </head>
  <body>
    <script id="api-reference" data-url="{url}"></script>
    <script src="{cdn}"></script>
  </body>
</html>
"#,
        title = escape_html(title),
        url = escape_html(openapi_url),
        cdn = SCALAR_CDN,
    )
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
