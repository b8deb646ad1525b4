mod browser;
mod dispatch;
mod logging;
mod protocol;

use std::any::Any;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::task::JoinError;
use tracing::{error, info};

use shelfcover_core::config::IconsConfig;
use shelfcover_core::{load_config_or_default, Config, Engine};

use browser::{PageOpener, SystemOpener};
use protocol::{Request, Response, DEFAULT_REQUEST};

/// Config file looked up next to the binary.
const CONFIG_FILE: &str = "shelfcover.toml";

#[tokio::main]
async fn main() {
    let plugin_dir = plugin_dir();
    // Logging may not be up yet; the launcher still gets an item
    let fallback_icon = plugin_dir.join(IconsConfig::default().app_icon);

    // A panic inside the task surfaces as a JoinError instead of killing the process
    let outcome = tokio::spawn(run(plugin_dir)).await;
    if let Some(response) = finish(outcome, &fallback_icon) {
        emit(&response);
    }
}

async fn run(plugin_dir: PathBuf) -> Result<Option<Response>> {
    let config_path = std::env::var("SHELFCOVER_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| plugin_dir.join(CONFIG_FILE));

    let config = load_plugin_config(&config_path, &plugin_dir)?;

    let _log_guard = logging::init(&config.logging);
    info!("Loaded configuration from {:?}", config_path);

    let app_icon = config.icons.app_icon.clone();
    let result = match read_input().context("Failed to read request") {
        Ok(input) => serve(config, &input, &SystemOpener).await,
        Err(e) => Err(e),
    };

    Ok(render(result, &app_icon))
}

fn load_plugin_config(config_path: &Path, plugin_dir: &Path) -> Result<Config> {
    let config = load_config_or_default(config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    Ok(config.resolve_paths(plugin_dir))
}

async fn serve(config: Config, input: &str, opener: &dyn PageOpener) -> Result<Option<Response>> {
    let engine = Engine::new(config)
        .await
        .context("Failed to start engine")?;
    engine.start_eviction().await;

    let result = match Request::parse(input).context("Invalid request") {
        Ok(request) => {
            info!("Handling {:?}", request.method);
            Ok(dispatch::handle_request(&engine, opener, &request).await)
        }
        Err(e) => Err(e),
    };

    engine.shutdown().await;
    result
}

/// Turn a request outcome into at most one output line.
fn render(result: Result<Option<Response>>, icon: &Path) -> Option<Response> {
    match result {
        Ok(response) => response,
        Err(e) => {
            error!("Request failed: {:#}", e);
            Some(Response::error(&format!("{:#}", e), icon))
        }
    }
}

/// Like [`render`], additionally covering a panicked or cancelled task.
fn finish(
    outcome: std::result::Result<Result<Option<Response>>, JoinError>,
    icon: &Path,
) -> Option<Response> {
    match outcome {
        Ok(result) => render(result, icon),
        Err(e) if e.is_panic() => {
            let message = panic_message(e.into_panic());
            Some(Response::error(&message, icon))
        }
        Err(e) => Some(Response::error(&e.to_string(), icon)),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "plugin panicked".to_string()
    }
}

fn read_input() -> io::Result<String> {
    let stdin = io::stdin();
    let piped = if stdin.is_terminal() {
        None
    } else {
        let mut input = String::new();
        stdin.lock().read_to_string(&mut input)?;
        Some(input)
    };

    Ok(select_input(piped, std::env::args().nth(1)))
}

/// Non-blank piped stdin first, then the first argument, then an empty query.
fn select_input(stdin: Option<String>, arg: Option<String>) -> String {
    stdin
        .filter(|input| !input.trim().is_empty())
        .or(arg)
        .unwrap_or_else(|| DEFAULT_REQUEST.to_string())
}

/// Directory holding the binary, its icons and its cache.
fn plugin_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn emit(response: &Response) {
    println!("{}", protocol::encode_line(response));
}
