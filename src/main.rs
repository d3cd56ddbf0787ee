use clap::Parser;
use log::{error, info};
use ringbuf_dbus::config::{get_config_path, load_config};
use ringbuf_dbus::registry::Registry;
use ringbuf_dbus::service::{RingBufferService, BUS_NAME, OBJECT_PATH};
use std::sync::Arc;
use std::{error::Error, future::pending};
use zbus::connection;

#[derive(Parser, Debug)]
#[command(about = "Hosts fixed-capacity ring buffers on D-Bus")]
struct Args {
    /// Path to the TOML config (defaults to ~/.config/ringbuf-dbus/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Register on the system bus instead of the session bus
    #[arg(long)]
    system: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(get_config_path);
    let cfg = load_config(&config_path)?;
    let (registry, feeders) = Registry::from_config(cfg).await?;

    for feeder in feeders {
        let id = feeder.id().to_string();
        tokio::spawn(async move {
            if let Err(e) = feeder.run().await {
                error!("Feed for buffer '{}' stopped: {}", id, e);
            }
        });
    }

    let service = RingBufferService::new(Arc::new(registry));
    let builder = if args.system {
        connection::Builder::system()?
    } else {
        connection::Builder::session()?
    };
    let _connection = builder
        .name(BUS_NAME)?
        .serve_at(OBJECT_PATH, service)?
        .build()
        .await?;

    info!("D-Bus service '{}' is running.", BUS_NAME);

    // Keep the application running indefinitely
    pending::<()>().await;

    Ok(())
}
