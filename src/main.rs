use immich_photos::app::{create_app, AppState};
use immich_photos::camera::{spawn_refresh_loop, ImmichPhotosCamera};
use immich_photos::config::{load_config, save_default_config, Config};
use immich_photos::constants::CONFIG_PATH;
use immich_photos::immich::{ImmichClient, PhotoLibrary};
use immich_photos::logging::{init_logging, install_panic_hook};
use immich_photos::photos::{ImmichPhotos, PhotosSettings};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};

fn load_or_exit() -> Config {
    let config = match load_config(&CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration from {:?}: {}", *CONFIG_PATH, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    config
}

async fn check_server(library: &dyn PhotoLibrary) {
    if !library.ping().await {
        warn!("Immich server is not reachable yet, will keep trying on refresh");
        return;
    }

    match library.current_user().await {
        Some(user) => info!("Connected to Immich as {}", user.email),
        None => warn!("Immich server reachable but the API key was not accepted"),
    }
}

#[tokio::main]
async fn main() {
    if std::env::args().any(|arg| arg == "--init-config") {
        match save_default_config(&CONFIG_PATH) {
            Ok(_) => {
                println!("Default configuration saved to {:?}", *CONFIG_PATH);
                std::process::exit(0);
            }
            Err(e) => {
                eprintln!("Failed to save default configuration: {}", e);
                std::process::exit(1);
            }
        }
    }

    // Initialize logging
    init_logging();
    install_panic_hook();

    let config = load_or_exit();

    let client = match ImmichClient::from_config(&config.immich) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build Immich client: {}", e);
            std::process::exit(1);
        }
    };
    let library: Arc<dyn PhotoLibrary> = Arc::new(client);
    check_server(library.as_ref()).await;

    let photos = Arc::new(ImmichPhotos::new(
        Arc::clone(&library),
        PhotosSettings::from(&config),
    ));
    let camera = Arc::new(ImmichPhotosCamera::new(photos, &config.camera));

    // Start background refresh
    spawn_refresh_loop(Arc::clone(&camera));

    let app = create_app(AppState { camera, library });

    let addr: SocketAddr = match format!("{}:{}", config.server.host, config.server.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Invalid server address: {}", e);
            std::process::exit(1);
        }
    };
    info!("Starting Immich Photos camera on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server failed: {}", e);
    }
}
