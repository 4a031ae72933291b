use crate::{
    config::Settings, error::AppError, network::routes::router, pipeline::FeaturePipeline,
};
use tokio::net::TcpListener;

use tracing::{error, info};

pub struct Server {
    settings: Settings,
    pipeline: FeaturePipeline,
}

impl Server {
    pub fn new(settings: Settings) -> Self {
        let pipeline = FeaturePipeline::builder()
            .limits(&settings.limits)
            .build();
        Self::with_pipeline(settings, pipeline)
    }

    pub fn with_pipeline(settings: Settings, pipeline: FeaturePipeline) -> Self {
        Self { settings, pipeline }
    }

    pub async fn start(&self) -> Result<(), AppError> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    pub async fn bind(&self) -> Result<TcpListener, AppError> {
        let address = self.settings.bind_address();
        info!("Starting feature extraction server on {}", address);
        TcpListener::bind(&address)
            .await
            .map_err(|e| AppError::Bind(e, address))
    }

    pub async fn serve(&self, listener: TcpListener) -> Result<(), AppError> {
        if let Ok(address) = listener.local_addr() {
            info!("Listening on {}", address);
        }
        let app = router(&self.settings, self.pipeline.clone());
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(AppError::Serve)?;
        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
