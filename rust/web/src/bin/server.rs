//! Standalone web server binary
//!
//! Usage: cargo run -p noughts_web --bin noughts-web-server -- [--host HOST] [--port PORT]

use noughts_web::{ServerConfig, ServerSettings, WebServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut resolved = ServerSettings::load()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--host" | "-h" => {
                let host = args.get(i + 1).ok_or("--host requires a value")?;
                resolved.override_host(host.clone());
                i += 2;
            }
            "--port" | "-p" => {
                let port = args.get(i + 1).ok_or("--port requires a value")?;
                let port = port
                    .parse()
                    .map_err(|_| format!("invalid port number `{port}`"))?;
                resolved.override_port(port);
                i += 2;
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            other => {
                print_help();
                return Err(format!("unknown argument: {other}").into());
            }
        }
    }

    noughts_web::init_logging(resolved.settings.log_format).map_err(|err| err.to_string())?;

    let settings = &resolved.settings;
    tracing::info!(
        host = %settings.host,
        port = settings.port,
        advisor = %settings.advisor,
        lobby_limit = settings.lobby_limit,
        seeded = settings.seed.is_some(),
        sources = ?resolved.sources,
        "starting noughts web server"
    );

    let server = WebServer::new(ServerConfig::from_settings(settings))?;
    let handle = server.start().await?;
    println!("Server running at http://{}", handle.address());
    println!("Press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down server");
    handle.shutdown().await?;
    tracing::info!("server stopped cleanly");

    Ok(())
}

fn print_help() {
    println!("Noughts Web Server");
    println!();
    println!("Usage: noughts-web-server [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --host, -h <HOST>   Host to bind to (default: 127.0.0.1)");
    println!("  --port, -p <PORT>   Port to bind to (default: 8080)");
    println!("  --help              Show this help message");
    println!();
    println!("Environment:");
    println!("  NOUGHTS_WEB_CONFIG       TOML settings file");
    println!("  NOUGHTS_WEB_HOST, NOUGHTS_WEB_PORT, NOUGHTS_WEB_LOBBY_LIMIT,");
    println!("  NOUGHTS_WEB_SEED, NOUGHTS_WEB_ADVISOR, NOUGHTS_WEB_LOG_FORMAT");
    println!("  RUST_LOG                 Log filter (default: info,noughts_web=debug)");
}
