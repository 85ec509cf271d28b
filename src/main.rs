use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};

use parking_allocation::config::{DatabaseConfig, EnvironmentConfig, StorageBackend};
use parking_allocation::database::DatabaseConnection;
use parking_allocation::repositories::InMemoryRepository;
use parking_allocation::routes::create_app;
use parking_allocation::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();
    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🅿️ Parking Allocation Engine");
    info!("============================");

    let app_state = match config.storage_backend {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let db_connection = match DatabaseConnection::new(&db_config).await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };
            db_connection.run_migrations().await?;
            AppState::postgres(config.clone(), db_connection.pool().clone())
        }
        StorageBackend::Memory => {
            warn!("⚠️ Almacenamiento en memoria: los datos se pierden al reiniciar");
            AppState::in_memory(config.clone(), InMemoryRepository::new())
        }
    };

    // Reparar la disponibilidad por si un proceso anterior cayó a mitad de una proyección
    if config.reconcile_on_startup {
        if let Err(e) = app_state.engine.projector().reconcile_all().await {
            error!("❌ Reconciliación inicial fallida: {}", e);
        }
    }

    let app = create_app(app_state);
    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Estado del servicio");
    info!("📋 Asignaciones:");
    info!("   GET  /api/parking-assignments - Buscar asignaciones");
    info!("   POST /api/parking-assignments - Crear asignación");
    info!("   GET  /api/parking-assignments/active - Asignaciones activas");
    info!("   GET  /api/parking-assignments/by-client/:client_id - Asignaciones de un cliente");
    info!("   GET  /api/parking-assignments/:id - Obtener asignación");
    info!("   PUT  /api/parking-assignments/:id - Actualizar asignación");
    info!("   DELETE /api/parking-assignments/:id - Cancelar asignación");
    info!("   POST /api/parking-assignments/:id/revoke - Revocar asignación");
    info!("🅿️ Espacios:");
    info!("   GET|POST /api/parking-spaces, GET /api/parking-spaces/available");
    info!("   GET  /api/parking-spaces/zones, GET /api/parking-spaces/types");
    info!("   GET|PUT|DELETE /api/parking-spaces/:id");
    info!("   POST /api/parking-spaces/:id/recompute, POST /api/parking-spaces/reconcile");
    info!("👤 Clientes: GET|POST /api/clients, GET|PUT|DELETE /api/clients/:id");
    info!("🚗 Coches: GET|POST /api/cars, GET|PUT|DELETE /api/cars/:id");

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
            error!("❌ No se pudo instalar el manejador de Ctrl+C: {}", e);
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
                error!("❌ No se pudo instalar el manejador de SIGTERM: {}", e);
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
