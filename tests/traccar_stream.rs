use fleet_manager::clients::traccar_client::{
    StreamCheckOutcome, TraccarClient, TraccarEvent, TraccarStreamHandlers,
};
use fleet_manager::models::traccar_config::TraccarConfig;
use futures::{SinkExt, StreamExt};
use std::borrow::Cow;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;

const WAIT: Duration = Duration::from_secs(5);

fn client(addr: SocketAddr) -> TraccarClient {
    TraccarClient::new(TraccarConfig {
        base_url: format!("http://{}", addr),
        username: None,
        password: None,
        token: Some("tok".to_string()),
    })
}

/// Servidor WS de un solo cliente que reporta la URI del handshake
async fn spawn_server<F, Fut>(session: F) -> (SocketAddr, oneshot::Receiver<String>, tokio::task::JoinHandle<()>)
where
    F: FnOnce(tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (uri_tx, uri_rx) = oneshot::channel();

    let task = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let callback = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
            let _ = uri_tx.send(req.uri().to_string());
            Ok(resp)
        };
        let ws = accept_hdr_async(tcp, callback).await.unwrap();
        session(ws).await;
    });

    (addr, uri_rx, task)
}

#[tokio::test]
async fn test_stream_delivers_messages_and_closes_on_request() {
    let (addr, uri_rx, server) = spawn_server(|mut ws| async move {
        ws.send(Message::Text(r#"{"type":"positions","positions":[{"deviceId":11}]}"#.to_string()))
            .await
            .unwrap();
        while let Some(Ok(frame)) = ws.next().await {
            if frame.is_close() {
                break;
            }
        }
    })
    .await;

    let opened = Arc::new(AtomicBool::new(false));
    let closed = Arc::new(AtomicBool::new(false));
    let (message_tx, mut message_rx) = mpsc::unbounded_channel();

    let handlers = TraccarStreamHandlers::new()
        .on_open({
            let opened = opened.clone();
            move || opened.store(true, Ordering::SeqCst)
        })
        .on_message(move |text| {
            let _ = message_tx.send(text);
        })
        .on_close({
            let closed = closed.clone();
            move |_| closed.store(true, Ordering::SeqCst)
        })
        .query_param("deviceId", 11);

    let mut stream = client(addr).connect_to_events_stream(Some(handlers)).unwrap();
    assert_eq!(stream.url(), format!("ws://{}/api/socket?token=tok&deviceId=11", addr));

    let uri = tokio::time::timeout(WAIT, uri_rx).await.unwrap().unwrap();
    assert_eq!(uri, "/api/socket?token=tok&deviceId=11");

    let text = tokio::time::timeout(WAIT, message_rx.recv()).await.unwrap().unwrap();
    let event = TraccarEvent::parse(&text).unwrap();
    assert_eq!(event.event_type, "positions");
    assert!(opened.load(Ordering::SeqCst));

    stream.close();
    tokio::time::timeout(WAIT, stream.join()).await.unwrap();
    assert!(closed.load(Ordering::SeqCst));

    tokio::time::timeout(WAIT, server).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_remote_close_reports_reason() {
    let (addr, _uri_rx, server) = spawn_server(|mut ws| async move {
        let _ = ws
            .close(Some(CloseFrame {
                code: CloseCode::Normal,
                reason: Cow::Borrowed("bye"),
            }))
            .await;
        while ws.next().await.is_some() {}
    })
    .await;

    let (reason_tx, mut reason_rx) = mpsc::unbounded_channel();
    let handlers = TraccarStreamHandlers::new().on_close(move |reason| {
        let _ = reason_tx.send(reason);
    });

    let stream = client(addr).connect_to_events_stream(Some(handlers)).unwrap();

    let reason = tokio::time::timeout(WAIT, reason_rx.recv()).await.unwrap().unwrap();
    assert_eq!(reason.as_deref(), Some("bye"));

    tokio::time::timeout(WAIT, stream.join()).await.unwrap();
    tokio::time::timeout(WAIT, server).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_connection_failure_reports_error_then_close() {
    let (error_tx, mut error_rx) = mpsc::unbounded_channel();
    let closed = Arc::new(AtomicBool::new(false));

    let handlers = TraccarStreamHandlers::new()
        .on_error(move |error| {
            let _ = error_tx.send(error);
        })
        .on_close({
            let closed = closed.clone();
            move |_| closed.store(true, Ordering::SeqCst)
        });

    let client = TraccarClient::new(TraccarConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        ..Default::default()
    });
    let stream = client.connect_to_events_stream(Some(handlers)).unwrap();
    assert_eq!(stream.url(), "ws://127.0.0.1:1/api/socket");

    let error = tokio::time::timeout(WAIT, error_rx.recv()).await.unwrap().unwrap();
    assert!(!error.is_empty());

    tokio::time::timeout(WAIT, stream.join()).await.unwrap();
    assert!(closed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_no_stream_without_base_url() {
    let client = TraccarClient::new(TraccarConfig::default());
    assert!(client.connect_to_events_stream(None).is_none());
}

#[tokio::test]
async fn test_connection_check_opens_with_limit_and_closes() {
    let (addr, uri_rx, server) = spawn_server(|mut ws| async move {
        while let Some(Ok(frame)) = ws.next().await {
            if frame.is_close() {
                break;
            }
        }
    })
    .await;

    let (handlers, outcome) = TraccarStreamHandlers::for_connection_check();
    let stream = client(addr).connect_to_events_stream(Some(handlers)).unwrap();
    assert_eq!(stream.url(), format!("ws://{}/api/socket?token=tok&limit=1", addr));

    let result = stream.finish_connection_check(outcome, WAIT).await;
    assert!(result.is_success(), "{}", result.message());
    assert_eq!(result.message(), "Conexión en tiempo real con Traccar establecida con éxito.");

    let uri = tokio::time::timeout(WAIT, uri_rx).await.unwrap().unwrap();
    assert_eq!(uri, "/api/socket?token=tok&limit=1");

    // el servidor termina al recibir el close
    tokio::time::timeout(WAIT, server).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_connection_check_reports_refused_socket() {
    let client = TraccarClient::new(TraccarConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        ..Default::default()
    });
    let (handlers, outcome) = TraccarStreamHandlers::for_connection_check();
    let stream = client.connect_to_events_stream(Some(handlers)).unwrap();

    let result = stream.finish_connection_check(outcome, WAIT).await;
    assert!(!result.is_success());
    assert!(result
        .message()
        .starts_with("No se pudo abrir la conexión en tiempo real con Traccar"));
}

#[tokio::test]
async fn test_connection_check_times_out_on_silent_server() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let (handlers, outcome) = TraccarStreamHandlers::for_connection_check();
    let stream = client(addr).connect_to_events_stream(Some(handlers)).unwrap();

    let result = tokio::time::timeout(
        WAIT,
        stream.finish_connection_check(outcome, Duration::from_millis(300)),
    )
    .await
    .unwrap();
    assert!(!result.is_success());
    assert_eq!(
        result.message(),
        "Tiempo de espera agotado al abrir la conexión en tiempo real con Traccar"
    );
    server.abort();
}

#[tokio::test]
async fn test_connection_check_handlers_report_first_event_only() {
    let (handlers, mut outcome) = TraccarStreamHandlers::for_connection_check();
    let client = TraccarClient::new(TraccarConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        ..Default::default()
    });
    let stream = client.connect_to_events_stream(Some(handlers)).unwrap();
    tokio::time::timeout(WAIT, stream.join()).await.unwrap();

    // error y close llegan, pero sólo el error se reporta
    match outcome.try_recv() {
        Ok(StreamCheckOutcome::Failed(error)) => assert!(!error.is_empty()),
        other => panic!("resultado inesperado: {:?}", other),
    }
}
