use fashion_recognition::config::LoggingSettings;
use fashion_recognition::{AppError, Server, Settings};
use tracing::Level;

fn init_logging(logging: &LoggingSettings) {
    let parsed = logging.level.parse::<Level>();
    tracing_subscriber::fmt()
        .with_max_level(*parsed.as_ref().unwrap_or(&Level::INFO))
        .init();
    if parsed.is_err() {
        tracing::warn!("Unknown log level {:?}, using info", logging.level);
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let settings = Settings::load()?;
    init_logging(&settings.logging);
    Server::new(settings).start().await
}
