//! Cliente HTTP/WebSocket para Traccar
//!
//! Traduce las altas locales de vehículos y dispositivos a llamadas a la API
//! REST de Traccar y abre el stream de eventos en tiempo real. Ningún método
//! público propaga errores: todo fallo se convierte en
//! `TraccarRegistrationResult::Failure`.

use base64::Engine;
use futures::{SinkExt, StreamExt};
use reqwest::{header, Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::models::device::Device;
use crate::models::traccar_config::{TraccarConfig, TraccarCredentials};
use crate::models::vehicle::Vehicle;

/// Tiempo máximo de cada llamada HTTP a Traccar
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// URLs base derivadas de la configuración
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedTraccarUrls {
    pub http_base_url: Option<String>,
    pub ws_base_url: Option<String>,
}

/// Derivar las URLs HTTP y WS a partir de lo que haya escrito el usuario.
///
/// Acepta `ws(s)://`, `http(s)://` o un host sin esquema (`host:puerto`
/// asume `http://`, cualquier otro host asume `https://`).
pub fn normalize_base_urls(raw: &str) -> NormalizedTraccarUrls {
    let without_trailing_slash = raw.trim().trim_end_matches('/');
    if without_trailing_slash.is_empty() {
        return NormalizedTraccarUrls::default();
    }

    let lower = without_trailing_slash.to_ascii_lowercase();
    let rest_after_scheme = |url: &str| -> String {
        url.find("://").map(|idx| url[idx + 3..].to_string()).unwrap_or_default()
    };

    if lower.starts_with("ws://") || lower.starts_with("wss://") {
        let http_scheme = if lower.starts_with("wss://") { "https://" } else { "http://" };
        return NormalizedTraccarUrls {
            http_base_url: Some(format!("{}{}", http_scheme, rest_after_scheme(without_trailing_slash))),
            ws_base_url: Some(without_trailing_slash.to_string()),
        };
    }

    if lower.starts_with("http://") || lower.starts_with("https://") {
        let ws_scheme = if lower.starts_with("https://") { "wss://" } else { "ws://" };
        return NormalizedTraccarUrls {
            http_base_url: Some(without_trailing_slash.to_string()),
            ws_base_url: Some(format!("{}{}", ws_scheme, rest_after_scheme(without_trailing_slash))),
        };
    }

    let assumed_http = if without_trailing_slash.contains(':') {
        format!("http://{}", without_trailing_slash)
    } else {
        format!("https://{}", without_trailing_slash)
    };
    let assumed_ws = format!("ws{}", &assumed_http["http".len()..]);

    NormalizedTraccarUrls {
        http_base_url: Some(assumed_http),
        ws_base_url: Some(assumed_ws),
    }
}

/// Resultado de cualquier operación contra Traccar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TraccarRegistrationResult {
    Success {
        message: String,
        remote_device_id: Option<i64>,
        remote_vehicle_id: Option<i64>,
    },
    Failure {
        message: String,
        remote_device_id: Option<i64>,
        remote_vehicle_id: Option<i64>,
    },
}

impl TraccarRegistrationResult {
    pub fn failure(message: impl Into<String>) -> Self {
        TraccarRegistrationResult::Failure {
            message: message.into(),
            remote_device_id: None,
            remote_vehicle_id: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TraccarRegistrationResult::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            TraccarRegistrationResult::Success { message, .. }
            | TraccarRegistrationResult::Failure { message, .. } => message,
        }
    }

    pub fn remote_device_id(&self) -> Option<i64> {
        match self {
            TraccarRegistrationResult::Success { remote_device_id, .. }
            | TraccarRegistrationResult::Failure { remote_device_id, .. } => *remote_device_id,
        }
    }

    pub fn remote_vehicle_id(&self) -> Option<i64> {
        match self {
            TraccarRegistrationResult::Success { remote_vehicle_id, .. }
            | TraccarRegistrationResult::Failure { remote_vehicle_id, .. } => *remote_vehicle_id,
        }
    }
}

/// Datos para registrar un vehículo (y su dispositivo) en Traccar
#[derive(Debug, Clone)]
pub struct TraccarRegistrationPayload {
    pub vehicle: Vehicle,
    pub device: Option<Device>,
    pub device_alias: Option<String>,
    pub vehicle_alias: Option<String>,
    pub group_id: Option<i64>,
}

/// Evento recibido por el socket de Traccar
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TraccarEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, Value>,
}

impl TraccarEvent {
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

#[derive(Error, Debug)]
enum TraccarError {
    #[error("Configuración de Traccar incompleta. Define la URL base en la configuración.")]
    NotConfigured,

    #[error("{0}")]
    Http(String),

    #[error("Tiempo de espera agotado al comunicarse con Traccar")]
    Timeout,

    #[error("Error de red al comunicarse con Traccar: {0}")]
    Network(reqwest::Error),

    #[error("Respuesta inválida de Traccar: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for TraccarError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TraccarError::Timeout
        } else {
            TraccarError::Network(err)
        }
    }
}

type OpenHandler = Box<dyn Fn() + Send + Sync + 'static>;
type TextHandler = Box<dyn Fn(String) + Send + Sync + 'static>;
type CloseHandler = Box<dyn Fn(Option<String>) + Send + Sync + 'static>;

/// Callbacks opcionales del stream de eventos y parámetros extra de la URL
#[derive(Default)]
pub struct TraccarStreamHandlers {
    on_open: Option<OpenHandler>,
    on_message: Option<TextHandler>,
    on_error: Option<TextHandler>,
    on_close: Option<CloseHandler>,
    query_params: Vec<(String, String)>,
}

impl TraccarStreamHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_open(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_open = Some(Box::new(handler));
        self
    }

    pub fn on_message(mut self, handler: impl Fn(String) + Send + Sync + 'static) -> Self {
        self.on_message = Some(Box::new(handler));
        self
    }

    pub fn on_error(mut self, handler: impl Fn(String) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(handler));
        self
    }

    pub fn on_close(mut self, handler: impl Fn(Option<String>) + Send + Sync + 'static) -> Self {
        self.on_close = Some(Box::new(handler));
        self
    }

    /// Parámetro extra para la URL del socket (por ejemplo `deviceId`)
    pub fn query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query_params.push((key.into(), value.to_string()));
        self
    }

    fn emit_open(&self) {
        if let Some(handler) = &self.on_open {
            handler();
        }
    }

    fn emit_message(&self, text: String) {
        if let Some(handler) = &self.on_message {
            handler(text);
        }
    }

    fn emit_error(&self, error: String) {
        if let Some(handler) = &self.on_error {
            handler(error);
        }
    }

    fn emit_close(&self, reason: Option<String>) {
        if let Some(handler) = &self.on_close {
            handler(reason);
        }
    }
}

/// Conexión viva con el socket de Traccar.
///
/// No hay reconexión automática. Cerrar (o soltar) el handle cierra el socket.
pub struct TraccarStream {
    url: String,
    close_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl TraccarStream {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn close(&mut self) {
        if let Some(tx) = self.close_tx.take() {
            let _ = tx.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Esperar a que el socket termine (por cierre remoto o tras `close`)
    pub async fn join(self) {
        let TraccarStream { close_tx, task, .. } = self;
        let _keep_open = close_tx;
        if let Err(e) = task.await {
            log::warn!("⚠️ La tarea del socket de Traccar terminó con error: {}", e);
        }
    }

    /// Esperar el primer evento de ciclo de vida de una prueba de conexión y cerrar el socket
    pub async fn finish_connection_check(
        mut self,
        outcome: oneshot::Receiver<StreamCheckOutcome>,
        timeout: Duration,
    ) -> TraccarRegistrationResult {
        let result = match tokio::time::timeout(timeout, outcome).await {
            Ok(Ok(StreamCheckOutcome::Opened)) => {
                log::info!("✅ Socket de Traccar abierto en {}", self.url);
                TraccarRegistrationResult::Success {
                    message: "Conexión en tiempo real con Traccar establecida con éxito.".to_string(),
                    remote_device_id: None,
                    remote_vehicle_id: None,
                }
            }
            Ok(Ok(StreamCheckOutcome::Failed(error))) => TraccarRegistrationResult::failure(format!(
                "No se pudo abrir la conexión en tiempo real con Traccar: {}",
                error
            )),
            Ok(Ok(StreamCheckOutcome::Closed(reason))) => TraccarRegistrationResult::failure(match reason {
                Some(reason) if !reason.is_empty() => format!(
                    "Traccar cerró la conexión en tiempo real antes de abrirla: {}",
                    reason
                ),
                _ => "Traccar cerró la conexión en tiempo real antes de abrirla.".to_string(),
            }),
            Ok(Err(_)) => {
                TraccarRegistrationResult::failure("El socket de Traccar terminó sin notificar su estado.")
            }
            Err(_) => TraccarRegistrationResult::failure(
                "Tiempo de espera agotado al abrir la conexión en tiempo real con Traccar",
            ),
        };

        self.close();
        self.join().await;
        result
    }
}

/// Primer evento de ciclo de vida observado al probar el socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamCheckOutcome {
    Opened,
    Failed(String),
    Closed(Option<String>),
}

type OutcomeSlot = Arc<Mutex<Option<oneshot::Sender<StreamCheckOutcome>>>>;

fn notify_outcome(slot: &OutcomeSlot, outcome: StreamCheckOutcome) {
    if let Ok(mut guard) = slot.lock() {
        if let Some(tx) = guard.take() {
            let _ = tx.send(outcome);
        }
    }
}

impl TraccarStreamHandlers {
    /// Handlers para probar el socket: piden un solo evento (`limit=1`) y avisan
    /// del primer open, error o close por el receptor devuelto
    pub fn for_connection_check() -> (Self, oneshot::Receiver<StreamCheckOutcome>) {
        let (tx, rx) = oneshot::channel();
        let slot: OutcomeSlot = Arc::new(Mutex::new(Some(tx)));
        let (on_open, on_error, on_close) = (slot.clone(), slot.clone(), slot);

        let handlers = Self::new()
            .on_open(move || notify_outcome(&on_open, StreamCheckOutcome::Opened))
            .on_error(move |error| notify_outcome(&on_error, StreamCheckOutcome::Failed(error)))
            .on_close(move |reason| notify_outcome(&on_close, StreamCheckOutcome::Closed(reason)))
            .query_param("limit", 1);
        (handlers, rx)
    }
}

/// Cliente de Traccar, sin estado más allá de su configuración
#[derive(Debug, Clone)]
pub struct TraccarClient {
    client: Client,
    config: TraccarConfig,
    urls: NormalizedTraccarUrls,
    timeout: Duration,
}

impl TraccarClient {
    pub fn new(config: TraccarConfig) -> Self {
        let urls = normalize_base_urls(&config.base_url);
        Self {
            client: Client::new(),
            config,
            urls,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn update_config(&mut self, config: TraccarConfig) {
        self.urls = normalize_base_urls(&config.base_url);
        self.config = config;
    }

    pub fn config(&self) -> &TraccarConfig {
        &self.config
    }

    pub fn normalized_urls(&self) -> NormalizedTraccarUrls {
        self.urls.clone()
    }

    /// Valor del header `Authorization`, si hay credenciales
    pub fn authorization_header(&self) -> Option<String> {
        match self.config.credentials() {
            TraccarCredentials::Token(token) => Some(format!("Bearer {}", token)),
            TraccarCredentials::Basic { username, password } => {
                let encoded = base64::engine::general_purpose::STANDARD
                    .encode(format!("{}:{}", username, password));
                Some(format!("Basic {}", encoded))
            }
            TraccarCredentials::None => None,
        }
    }

    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, TraccarError> {
        let base_url = self.urls.http_base_url.as_deref().ok_or(TraccarError::NotConfigured)?;
        let url = format!("{}{}", base_url, path);

        log::debug!("📤 Traccar {} {}", method, url);

        let mut builder = self
            .client
            .request(method, &url)
            .timeout(self.timeout)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(authorization) = self.authorization_header() {
            builder = builder.header(header::AUTHORIZATION, authorization);
        }
        if let Some(body) = body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        log::debug!("📡 Traccar response status: {}", status);

        if !status.is_success() {
            let message = if text.trim().is_empty() {
                format!("Falla en la llamada a Traccar ({})", status)
            } else {
                text
            };
            return Err(TraccarError::Http(message));
        }

        if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| TraccarError::InvalidResponse(e.to_string()))
    }

    /// Probar la conexión con `GET /api/server`
    pub async fn test_connection(&self) -> TraccarRegistrationResult {
        if self.urls.http_base_url.is_none() {
            return TraccarRegistrationResult::failure(
                "Define la URL base de Traccar para probar la conexión.",
            );
        }

        match self.request(Method::GET, "/api/server", None).await {
            Ok(_) => {
                log::info!("✅ Conexión con Traccar establecida");
                TraccarRegistrationResult::Success {
                    message: "Conexión con Traccar establecida con éxito.".to_string(),
                    remote_device_id: None,
                    remote_vehicle_id: None,
                }
            }
            Err(e) => {
                log::warn!("❌ Falló la prueba de conexión con Traccar: {}", e);
                TraccarRegistrationResult::failure(e.to_string())
            }
        }
    }

    /// Registrar vehículo y dispositivo en Traccar y vincularlos.
    ///
    /// Un paso fallido aborta los siguientes, pero los ids remotos ya
    /// obtenidos se devuelven igualmente.
    pub async fn register_vehicle(&self, payload: &TraccarRegistrationPayload) -> TraccarRegistrationResult {
        if self.urls.http_base_url.is_none() {
            return TraccarRegistrationResult::failure(
                "Configuración de Traccar no encontrada. Guarda las credenciales antes de registrar.",
            );
        }

        let mut remote_device_id = None;
        let mut remote_vehicle_id = None;

        match self
            .push_registration(payload, &mut remote_device_id, &mut remote_vehicle_id)
            .await
        {
            Ok(()) => {
                log::info!(
                    "✅ Vehículo {} sincronizado con Traccar (device: {:?}, vehicle: {:?})",
                    payload.vehicle.plate,
                    remote_device_id,
                    remote_vehicle_id
                );
                TraccarRegistrationResult::Success {
                    message: "Vehículo sincronizado con Traccar con éxito.".to_string(),
                    remote_device_id,
                    remote_vehicle_id,
                }
            }
            Err(e) => {
                log::warn!("❌ Falló el registro de {} en Traccar: {}", payload.vehicle.plate, e);
                TraccarRegistrationResult::Failure {
                    message: e.to_string(),
                    remote_device_id,
                    remote_vehicle_id,
                }
            }
        }
    }

    async fn push_registration(
        &self,
        payload: &TraccarRegistrationPayload,
        remote_device_id: &mut Option<i64>,
        remote_vehicle_id: &mut Option<i64>,
    ) -> Result<(), TraccarError> {
        let vehicle = &payload.vehicle;

        if let Some(device) = &payload.device {
            let name = payload
                .device_alias
                .clone()
                .unwrap_or_else(|| format!("{} - {}", vehicle.plate, device.model));
            let body = json!({
                "name": name,
                "uniqueId": device.imei,
                "status": "online",
                "attributes": {
                    "model": device.model,
                    "protocol": device.protocol,
                    "vehiclePlate": vehicle.plate,
                },
            });

            let response = self.request(Method::POST, "/api/devices", Some(body)).await?;
            *remote_device_id = extract_remote_id(&response, "deviceId");
        }

        let name = payload
            .vehicle_alias
            .clone()
            .unwrap_or_else(|| format!("{} - {}", vehicle.plate, vehicle.model));
        let body = json!({
            "name": name,
            "status": vehicle.status.as_str(),
            "contact": "",
            "uniqueId": vehicle.id,
            "attributes": {
                "plate": vehicle.plate,
                "brand": vehicle.brand,
                "model": vehicle.model,
                "color": vehicle.color,
                "vehicleType": vehicle.vehicle_type.map(|t| t.as_str()),
            },
            "groupId": payload.group_id,
        });

        let response = self.request(Method::POST, "/api/vehicles", Some(body)).await?;
        *remote_vehicle_id = extract_remote_id(&response, "vehicleId");

        if let (Some(device_id), Some(vehicle_id)) = (*remote_device_id, *remote_vehicle_id) {
            let body = json!({ "deviceId": device_id, "vehicleId": vehicle_id });
            self.request(Method::POST, "/api/permissions", Some(body)).await?;
        }

        Ok(())
    }

    /// URL completa del socket con los parámetros de autenticación y extras
    pub fn build_socket_url(&self, extra_params: &[(String, String)]) -> Option<String> {
        let ws_base_url = self.urls.ws_base_url.as_deref()?;

        let mut params: Vec<(String, String)> = Vec::new();
        match self.config.credentials() {
            TraccarCredentials::Token(token) => set_param(&mut params, "token", token),
            TraccarCredentials::Basic { username, password } => {
                set_param(&mut params, "user", username);
                set_param(&mut params, "password", password);
            }
            TraccarCredentials::None => {}
        }
        for (key, value) in extra_params {
            set_param(&mut params, key, value);
        }

        let mut url = format!("{}/api/socket", ws_base_url);
        if !params.is_empty() {
            let query: Vec<String> = params
                .iter()
                .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
                .collect();
            url.push('?');
            url.push_str(&query.join("&"));
        }
        Some(url)
    }

    /// Abrir el stream de eventos en tiempo real.
    ///
    /// Devuelve `None` (con un aviso en el log) si no hay runtime de Tokio
    /// disponible o si no hay URL WS configurada.
    pub fn connect_to_events_stream(&self, handlers: Option<TraccarStreamHandlers>) -> Option<TraccarStream> {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                log::warn!("⚠️ No hay runtime asíncrono disponible para abrir el socket de Traccar");
                return None;
            }
        };

        let handlers = handlers.unwrap_or_default();
        let url = match self.build_socket_url(&handlers.query_params) {
            Some(url) => url,
            None => {
                log::warn!("⚠️ URL base de Traccar ausente. Configúrala antes de abrir la conexión WS");
                return None;
            }
        };

        log::info!("🔌 Abriendo socket de eventos de Traccar");

        let (close_tx, close_rx) = oneshot::channel();
        let task = runtime.spawn(run_events_stream(url.clone(), handlers, close_rx));

        Some(TraccarStream {
            url,
            close_tx: Some(close_tx),
            task,
        })
    }
}

fn set_param(params: &mut Vec<(String, String)>, key: &str, value: &str) {
    match params.iter_mut().find(|(existing, _)| existing == key) {
        Some(entry) => entry.1 = value.to_string(),
        None => params.push((key.to_string(), value.to_string())),
    }
}

fn extract_remote_id(response: &Value, alternate_key: &str) -> Option<i64> {
    response
        .get("id")
        .and_then(Value::as_i64)
        .or_else(|| response.get(alternate_key).and_then(Value::as_i64))
}

async fn run_events_stream(url: String, handlers: TraccarStreamHandlers, mut close_rx: oneshot::Receiver<()>) {
    let connected = tokio::select! {
        _ = &mut close_rx => {
            log::info!("🔌 Conexión al socket de Traccar cancelada antes de abrirse");
            handlers.emit_close(None);
            return;
        }
        connected = connect_async(url.as_str()) => connected,
    };

    let socket = match connected {
        Ok((socket, _response)) => socket,
        Err(e) => {
            log::warn!("❌ No se pudo abrir el socket de Traccar: {}", e);
            handlers.emit_error(e.to_string());
            handlers.emit_close(None);
            return;
        }
    };

    handlers.emit_open();
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            _ = &mut close_rx => {
                log::info!("🔌 Cerrando socket de Traccar a pedido del cliente");
                if let Err(e) = sink.send(Message::Close(None)).await {
                    log::debug!("Error enviando close al socket de Traccar: {}", e);
                }
                handlers.emit_close(None);
                break;
            }
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => handlers.emit_message(text),
                Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                    Ok(text) => handlers.emit_message(text),
                    Err(_) => log::debug!("Frame binario no UTF-8 ignorado"),
                },
                Some(Ok(Message::Close(frame))) => {
                    handlers.emit_close(frame.map(|f| f.reason.to_string()));
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    log::warn!("⚠️ Error en el socket de Traccar: {}", e);
                    handlers.emit_error(e.to_string());
                    handlers.emit_close(None);
                    break;
                }
                None => {
                    handlers.emit_close(None);
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str, token: Option<&str>, user: Option<(&str, &str)>) -> TraccarClient {
        TraccarClient::new(TraccarConfig {
            base_url: base_url.to_string(),
            username: user.map(|(u, _)| u.to_string()),
            password: user.map(|(_, p)| p.to_string()),
            token: token.map(str::to_string),
        })
    }

    #[test]
    fn test_host_port_assumes_http() {
        let urls = normalize_base_urls("tracker.example.com:8082");
        assert_eq!(urls.http_base_url.as_deref(), Some("http://tracker.example.com:8082"));
        assert_eq!(urls.ws_base_url.as_deref(), Some("ws://tracker.example.com:8082"));
    }

    #[test]
    fn test_bare_host_assumes_https() {
        let urls = normalize_base_urls("demo.traccar.org");
        assert_eq!(urls.http_base_url.as_deref(), Some("https://demo.traccar.org"));
        assert_eq!(urls.ws_base_url.as_deref(), Some("wss://demo.traccar.org"));
    }

    #[test]
    fn test_explicit_schemes_and_trailing_slashes() {
        let urls = normalize_base_urls("  https://demo.traccar.org/// ");
        assert_eq!(urls.http_base_url.as_deref(), Some("https://demo.traccar.org"));
        assert_eq!(urls.ws_base_url.as_deref(), Some("wss://demo.traccar.org"));

        let urls = normalize_base_urls("wss://demo.traccar.org/");
        assert_eq!(urls.http_base_url.as_deref(), Some("https://demo.traccar.org"));
        assert_eq!(urls.ws_base_url.as_deref(), Some("wss://demo.traccar.org"));

        let urls = normalize_base_urls("WS://10.0.0.5:8082");
        assert_eq!(urls.http_base_url.as_deref(), Some("http://10.0.0.5:8082"));
        assert_eq!(urls.ws_base_url.as_deref(), Some("WS://10.0.0.5:8082"));
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert_eq!(normalize_base_urls(""), NormalizedTraccarUrls::default());
        assert_eq!(normalize_base_urls("   "), NormalizedTraccarUrls::default());
        assert_eq!(normalize_base_urls("/"), NormalizedTraccarUrls::default());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let inputs = [
            "tracker.example.com:8082",
            "demo.traccar.org",
            "http://10.0.0.5:8082/",
            "https://demo.traccar.org",
            "ws://10.0.0.5:8082",
            "wss://demo.traccar.org/",
        ];
        for input in inputs {
            let first = normalize_base_urls(input);
            let from_http = normalize_base_urls(first.http_base_url.as_deref().unwrap());
            let from_ws = normalize_base_urls(first.ws_base_url.as_deref().unwrap());
            assert_eq!(from_http, first, "{}", input);
            assert_eq!(from_ws.ws_base_url, first.ws_base_url, "{}", input);
        }
    }

    #[test]
    fn test_authorization_header_selection() {
        let both = client("http://t:8082", Some("tok"), Some(("admin", "secret")));
        assert_eq!(both.authorization_header().as_deref(), Some("Bearer tok"));

        let basic = client("http://t:8082", None, Some(("admin", "secret")));
        assert_eq!(basic.authorization_header().as_deref(), Some("Basic YWRtaW46c2VjcmV0"));

        let anonymous = client("http://t:8082", None, None);
        assert_eq!(anonymous.authorization_header(), None);
    }

    #[test]
    fn test_socket_url_with_token_and_extra_params() {
        let traccar = client("https://demo.traccar.org", Some("a b"), None);
        let url = traccar
            .build_socket_url(&[("deviceId".to_string(), "123".to_string())])
            .unwrap();
        assert_eq!(url, "wss://demo.traccar.org/api/socket?token=a%20b&deviceId=123");
    }

    #[test]
    fn test_socket_url_with_basic_credentials() {
        let traccar = client("tracker.example.com:8082", None, Some(("admin", "s&cret")));
        let url = traccar.build_socket_url(&[]).unwrap();
        assert_eq!(url, "ws://tracker.example.com:8082/api/socket?user=admin&password=s%26cret");
    }

    #[test]
    fn test_socket_url_without_credentials_has_no_query() {
        let traccar = client("http://t:8082", None, None);
        assert_eq!(traccar.build_socket_url(&[]).as_deref(), Some("ws://t:8082/api/socket"));
        assert_eq!(client("", None, None).build_socket_url(&[]), None);
    }

    #[test]
    fn test_stream_without_runtime_returns_none() {
        let traccar = client("http://t:8082", None, None);
        assert!(traccar.connect_to_events_stream(None).is_none());
    }

    #[tokio::test]
    async fn test_stream_without_ws_url_returns_none() {
        let traccar = client("", None, None);
        assert!(traccar.connect_to_events_stream(None).is_none());
    }

    #[tokio::test]
    async fn test_connection_without_base_url_skips_network() {
        let result = client("", None, None).test_connection().await;
        assert!(!result.is_success());
        assert!(result.message().contains("URL base"));
    }

    #[test]
    fn test_remote_id_extraction() {
        assert_eq!(extract_remote_id(&json!({"id": 5}), "deviceId"), Some(5));
        assert_eq!(extract_remote_id(&json!({"deviceId": 9}), "deviceId"), Some(9));
        assert_eq!(extract_remote_id(&Value::Null, "deviceId"), None);
    }

    #[test]
    fn test_event_parse() {
        let event = TraccarEvent::parse(r#"{"type":"positions","deviceId":7}"#).unwrap();
        assert_eq!(event.event_type, "positions");
        assert_eq!(event.payload["deviceId"], 7);
        assert!(TraccarEvent::parse(r#"{"devices":[]}"#).is_none());
    }
}
