use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "journey_log={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let config = engine_config(&settings.engine)?;
    tracing::info!(
        timezone = %config.timezone,
        default_tank_volume = config.default_tank_volume,
        "engine settings loaded"
    );

    let db = parse_database(&settings.server.database).await?;
    let engine = engine::Engine::builder()
        .database(db)
        .config(config)
        .build()
        .await?;

    let server_config = server::ServerConfig {
        captcha: settings.captcha,
    };
    if server_config.captcha.is_none() {
        tracing::info!("captcha disabled");
    }

    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    server::run_with_listener(engine, server_config, listener).await?;
    Ok(())
}

fn engine_config(
    settings: &settings::Engine,
) -> Result<engine::EngineConfig, Box<dyn std::error::Error + Send + Sync>> {
    let mut config = engine::EngineConfig::default();
    if let Some(volume) = settings.default_tank_volume {
        config.default_tank_volume = volume;
    }
    if let Some(zone) = &settings.timezone {
        config.timezone = zone
            .parse::<chrono_tz::Tz>()
            .map_err(|err| format!("invalid timezone {zone:?}: {err}"))?;
    }
    if let Some(size) = settings.import_batch_size {
        config.import_batch_size = size;
    }
    Ok(config)
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
