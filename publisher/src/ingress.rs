//! HTTP ingress for command submission
//!
//! `POST /` takes `{"command": "<identifier>"}` and broadcasts it.
//! The body is parsed by the handler itself so that a body which is not
//! JSON gets the same 400 as one without a command.

use crate::publisher::{PublishError, Publisher};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use orders_shared::ChannelConnection;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, warn};

/// Build the ingress router around a shared publisher
pub fn router<C: ChannelConnection>(publisher: Arc<Publisher<C>>) -> Router {
    Router::new()
        .route("/", post(submit_command::<C>))
        .route("/health", get(health))
        .with_state(publisher)
}

/// Handler for POST / - publish one command
pub async fn submit_command<C: ChannelConnection>(
    State(publisher): State<Arc<Publisher<C>>>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let raw: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    match publisher.submit(&raw).await {
        Ok(ack) => (
            StatusCode::OK,
            Json(json!({ "message": "command published", "command": ack.command })),
        ),
        Err(PublishError::Validation(e)) => {
            warn!("Rejected submission: {}", e);
            (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() })))
        }
        Err(PublishError::Transport(e)) => {
            error!("Publish failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": e.to_string() })),
            )
        }
    }
}

/// Handler for GET /health - liveness probe
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orders_shared::envelope;
    use orders_shared::transport::{MemoryBroker, MemoryConnection};
    use orders_shared::{MessageStream, TransportConnector};

    async fn shared_publisher(broker: &MemoryBroker) -> Arc<Publisher<MemoryConnection>> {
        Arc::new(Publisher::new(broker.connect().await.unwrap(), "orders"))
    }

    #[tokio::test]
    async fn test_accepts_command() {
        let broker = MemoryBroker::new();
        let mut listener = broker.connect().await.unwrap().subscribe("orders").await.unwrap();
        let publisher = shared_publisher(&broker).await;

        let (status, Json(body)) =
            submit_command(State(publisher), Bytes::from_static(br#"{"command":"sayHello"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "command published");
        assert_eq!(body["command"], "sayHello");

        let payload = listener.next_payload().await.expect("no payload");
        assert_eq!(envelope::decode(&payload).unwrap().command, "sayHello");
    }

    #[tokio::test]
    async fn test_rejects_missing_command() {
        let broker = MemoryBroker::new();
        let publisher = shared_publisher(&broker).await;

        let bodies: [&[u8]; 4] = [b"{}", br#"{"command":""}"#, b"not json", b""];
        for body in bodies {
            let (status, Json(response)) =
                submit_command(State(publisher.clone()), Bytes::copy_from_slice(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response["error"], "command not specified");
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_server_error() {
        let broker = MemoryBroker::new();
        let publisher = shared_publisher(&broker).await;
        broker.set_offline(true);

        let (status, Json(response)) =
            submit_command(State(publisher), Bytes::from_static(br#"{"command":"calculate"}"#)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(response["error"].as_str().unwrap().contains("orders"));
    }

    #[tokio::test]
    async fn test_health() {
        let Json(body) = health().await;
        assert_eq!(body["status"], "ok");
    }
}
