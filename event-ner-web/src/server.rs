//! Servidor Axum: análise síncrona via HTTP e streaming dos passos do pipeline via WebSocket.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use event_ner_core::{EventPipeline, PipelineEvent};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Estado compartilhado da aplicação
pub struct AppState {
    pub pipeline: EventPipeline,
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    description: String,
}

#[derive(Serialize)]
struct CategorySummary {
    category: &'static str,
    phrases: usize,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/categories", get(categories_handler))
        .route("/ws", get(ws_handler))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>, bind: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("servidor iniciado em http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Análise via HTTP POST (sem streaming)
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    if req.description.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "descrição vazia"})),
        )
            .into_response();
    }

    let analysis = state.pipeline.analyze(&req.description);
    Json(analysis).into_response()
}

/// Categorias carregadas e quantas frases cada uma tem
async fn categories_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let gazetteer = &state.pipeline.knowledge().gazetteer;
    let summary: Vec<CategorySummary> = gazetteer
        .categories()
        .into_iter()
        .map(|category| CategorySummary {
            category: category.name(),
            phrases: gazetteer.get(category).map(|idx| idx.len()).unwrap_or(0),
        })
        .collect();
    Json(summary)
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Recebe uma descrição (texto puro ou `{"description": ...}`), executa o pipeline e
/// repassa cada `PipelineEvent` como uma mensagem JSON.
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                let description = serde_json::from_str::<AnalyzeRequest>(&text)
                    .map(|req| req.description)
                    .unwrap_or_else(|_| text.to_string());
                let description = description.trim().to_string();
                if description.is_empty() {
                    continue;
                }

                // O pipeline é síncrono: roda fora do runtime
                let (tx, rx) = std::sync::mpsc::channel::<PipelineEvent>();
                let worker = Arc::clone(&state);
                let handle = tokio::task::spawn_blocking(move || {
                    worker.pipeline.analyze_streaming(&description, tx);
                });
                if let Err(err) = handle.await {
                    tracing::error!(error = %err, "pipeline interrompido");
                    continue;
                }

                let events: Vec<PipelineEvent> = rx.try_iter().collect();
                for event in &events {
                    let Ok(json) = serde_json::to_string(event) else {
                        continue;
                    };
                    if socket.send(Message::Text(json.into())).await.is_err() {
                        return; // cliente desconectou
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use event_ner_core::{Category, GazetteerIndex, Knowledge, ReferenceSets, WordList};
    use tower::ServiceExt;

    fn app() -> Router {
        let gazetteer = GazetteerIndex::new()
            .with_category(Category::Teams, ["Sydney FC", "Brisbane Roar"])
            .with_category(Category::Circuses, ["Circus Oz"]);
        let knowledge = Knowledge::new(gazetteer, ReferenceSets::new(), WordList::default());
        router(Arc::new(AppState {
            pipeline: EventPipeline::new(Arc::new(knowledge)),
        }))
    }

    async fn json_body(resp: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_analyze_endpoint() {
        let resp = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/analyze")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"description": "Sydney FC v Brisbane Roar"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = json_body(resp).await;
        assert_eq!(body["entertainment_type"], "sport");
        assert_eq!(body["labels"]["teams"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_analyze_rejects_empty_description() {
        let resp = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/analyze")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"description": "   "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_categories_endpoint() {
        let resp = app()
            .oneshot(Request::builder().uri("/categories").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = json_body(resp).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["category"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["teams", "circuses"]);
        assert_eq!(body[0]["phrases"], 2);
    }
}
