//! Clients - clientes de APIs externas
//!
//! Por ahora sólo Traccar (HTTP + WebSocket).

pub mod traccar_client;

pub use traccar_client::{
    normalize_base_urls,
    NormalizedTraccarUrls,
    StreamCheckOutcome,
    TraccarClient,
    TraccarEvent,
    TraccarRegistrationPayload,
    TraccarRegistrationResult,
    TraccarStream,
    TraccarStreamHandlers,
    DEFAULT_TIMEOUT,
};
