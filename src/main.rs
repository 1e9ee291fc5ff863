use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use bus_booking::config::environment::EnvironmentConfig;
use bus_booking::create_app;
use bus_booking::database::DatabaseConnection;
use bus_booking::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("🚌 Bus Booking - Plataforma de reservas");
    info!("=======================================");

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();

    let config = EnvironmentConfig::default();
    let addr: SocketAddr = config.server_addr().parse()?;
    let app = create_app(AppState::new(pool, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🎫 Endpoints - Booking:");
    info!("   POST /api/booking - Crear reserva (admisión atómica)");
    info!("   GET  /api/booking - Listar reservas (admin)");
    info!("   GET  /api/booking/user/:user_id - Reservas de un usuario");
    info!("   GET  /api/booking/schedule/:id/taken-seats - Asientos ocupados");
    info!("   POST /api/booking/:id/cancel - Cancelar (self-service)");
    info!("   POST /api/booking/:id/cancel/admin - Cancelar (admin)");
    info!("   DELETE /api/booking/:id - Purgar reserva cancelada");
    info!("🚌 Endpoints - Bus:");
    info!("   POST /api/bus - Registrar bus");
    info!("   GET  /api/bus - Listar buses");
    info!("   DELETE /api/bus/:id - Borrado en cascada");
    info!("🗺️  Endpoints - Route:");
    info!("   POST /api/route - Crear ruta (guard de duplicados)");
    info!("   GET  /api/route/exists - Check de duplicados");
    info!("   GET  /api/route/:id/cascade-preview - Conteos previos al borrado");
    info!("   DELETE /api/route/:id - Borrado en cascada");
    info!("🕐 Endpoints - Schedule:");
    info!("   POST /api/schedule - Crear schedule");
    info!("   GET  /api/schedule/search?from=&to= - Buscar viajes");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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
