use std::path::Path;
use std::sync::Arc;

use keepgoing::character::{CharacterGenerator, CharacterState, character_routes};
use keepgoing::config::Config;
use keepgoing::routines::{RoutineState, routine_routes};
use keepgoing::store::{LibSqlBackend, Store};
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::from_env();

    eprintln!("🔥 KeepGoing v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://0.0.0.0:{}/routines", config.port);
    eprintln!("   Database: {}", config.db_path);
    if config.openai.api_key.is_none() {
        // Not a crash: /api/character/generate answers 500 until a key is set.
        eprintln!("   OpenAI: no API key — character generation disabled");
    } else {
        eprintln!(
            "   OpenAI: {} / {}",
            config.openai.text_model, config.openai.image_model
        );
    }

    let store: Arc<dyn Store> = Arc::new(
        LibSqlBackend::new_local(Path::new(&config.db_path))
            .await
            .unwrap_or_else(|e| {
                eprintln!("Error: Failed to open database at {}: {}", config.db_path, e);
                std::process::exit(1);
            }),
    );

    let generator = Arc::new(CharacterGenerator::new(config.openai.clone()));

    let app = routine_routes(RoutineState { store })
        .merge(character_routes(CharacterState { generator }))
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "HTTP server started");
    axum::serve(listener, app).await?;

    Ok(())
}
