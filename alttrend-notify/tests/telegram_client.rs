use alttrend_notify::{
    ChartArtifact, DeliveryError, Notifier,
    telegram::{TelegramConfig, TelegramNotifier},
};
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, Uri, header::CONTENT_TYPE},
    routing::post,
};
use parking_lot::Mutex;
use std::sync::Arc;

const TOKEN: &str = "123456-TESTTOKEN";

#[derive(Debug, Clone)]
struct Received {
    path: String,
    content_type: String,
    body: String,
}

type Inbox = Arc<Mutex<Vec<Received>>>;

async fn record(
    State(inbox): State<Inbox>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    inbox.lock().push(Received {
        path: uri.path().to_string(),
        content_type,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    (
        StatusCode::OK,
        r#"{"ok":true,"result":{"message_id":1,"chat":{"id":-1001,"type":"group"}}}"#,
    )
}

async fn spawn_server() -> (String, Inbox) {
    let inbox = Inbox::default();

    let router = Router::new()
        .route(&format!("/bot{TOKEN}/sendMessage"), post(record))
        .route(&format!("/bot{TOKEN}/sendDocument"), post(record))
        .fallback(|| async {
            (
                StatusCode::UNAUTHORIZED,
                r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#,
            )
        })
        .with_state(Arc::clone(&inbox));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

    (format!("http://{addr}"), inbox)
}

fn config(token: &str) -> TelegramConfig {
    TelegramConfig {
        bot_token: token.to_string(),
        chat_id: "-1001".to_string(),
    }
}

#[tokio::test]
async fn test_send_text() {
    let (base_url, inbox) = spawn_server().await;
    let notifier = TelegramNotifier::with_base_url(&config(TOKEN), base_url);

    notifier
        .send_text("📊 Signal: BTCUSDT (1h)\nEMA Compression Detected")
        .await
        .unwrap();

    let received = inbox.lock().clone();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].path, format!("/bot{TOKEN}/sendMessage"));
    assert!(received[0].content_type.starts_with("application/json"));

    let body = serde_json::from_str::<serde_json::Value>(&received[0].body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "chat_id": "-1001",
            "text": "📊 Signal: BTCUSDT (1h)\nEMA Compression Detected"
        })
    );
}

#[tokio::test]
async fn test_send_image() {
    let (base_url, inbox) = spawn_server().await;
    let notifier = TelegramNotifier::with_base_url(&config(TOKEN), base_url);

    let path = std::env::temp_dir().join(format!("alttrend-notify-{}.svg", std::process::id()));
    tokio::fs::write(&path, "<svg>chart</svg>").await.unwrap();
    let artifact = ChartArtifact::new(path);

    notifier.send_image(&artifact, "BTCUSDT (1h)").await.unwrap();
    artifact.clone().discard().await;
    assert!(!artifact.path.exists());

    let received = inbox.lock().clone();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].path, format!("/bot{TOKEN}/sendDocument"));
    assert!(received[0].content_type.starts_with("multipart/form-data"));
    assert!(received[0].body.contains(r#"name="caption""#));
    assert!(received[0].body.contains("BTCUSDT (1h)"));
    assert!(received[0].body.contains("image/svg+xml"));
    assert!(received[0].body.contains("<svg>chart</svg>"));
}

#[tokio::test]
async fn test_send_image_missing_artifact() {
    let (base_url, inbox) = spawn_server().await;
    let notifier = TelegramNotifier::with_base_url(&config(TOKEN), base_url);

    let artifact = ChartArtifact::new(std::env::temp_dir().join("alttrend-notify-missing.svg"));
    let error = notifier.send_image(&artifact, "caption").await.unwrap_err();

    assert!(matches!(error, DeliveryError::Artifact(_)));
    assert!(inbox.lock().is_empty());
}

#[tokio::test]
async fn test_send_text_rejected_token() {
    let (base_url, _) = spawn_server().await;
    let notifier = TelegramNotifier::with_base_url(&config("654321-REVOKED"), base_url);

    let error = notifier.send_text("hello").await.unwrap_err();

    assert!(matches!(error, DeliveryError::Api { code: 401, .. }));
    assert!(!error.to_string().contains("REVOKED"));
}
