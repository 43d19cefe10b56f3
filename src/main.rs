use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use fleet_manager::config::environment::EnvironmentConfig;
use fleet_manager::storage::FileKeyValueStore;
use fleet_manager::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    let level = if config.is_production() {
        tracing::Level::INFO
    } else {
        tracing::Level::DEBUG
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚚 Fleet Manager - API de gestión de flotas");
    info!("================================================");

    let storage = match FileKeyValueStore::new(&config.storage_dir) {
        Ok(storage) => storage,
        Err(e) => {
            error!("❌ No se pudo abrir el almacenamiento en {:?}: {}", config.storage_dir, e);
            return Err(anyhow::anyhow!("Error de almacenamiento: {}", e));
        }
    };
    info!("💾 Configuración persistida en {:?}", config.storage_dir);

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_app(AppState::new(config, Arc::new(storage)));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health");
    info!("🔐 Auth:");
    info!("   POST /api/auth/login - Login");
    info!("   GET  /api/auth/me - Sesión actual");
    info!("   GET  /api/auth/views - Vistas permitidas");
    info!("👥 Usuarios:");
    info!("   GET/POST /api/users");
    info!("🚗 Flota:");
    info!("   GET/POST /api/vehicles, PATCH/DELETE /api/vehicles/:id");
    info!("   GET/POST /api/devices, POST /api/devices/:id/link");
    info!("   GET /api/drivers, /api/trips, /api/geofences, /api/alerts");
    info!("   POST /api/alerts/:id/ack, GET /api/imei/validate");
    info!("⚙️ Configuración:");
    info!("   GET/PUT /api/settings/map, PUT /api/settings/map/provider");
    info!("   PUT/DELETE /api/settings/map/api-key");
    info!("   GET/PUT /api/settings/traccar, GET /api/settings/traccar/urls");
    info!("   POST /api/settings/traccar/test, POST /api/settings/traccar/stream-test");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
