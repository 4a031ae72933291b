use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Duration,
};

use tokio::sync::Semaphore;
use tower::Service;
use tracing::{debug, instrument, warn};

use crate::config::LimitSettings;
use crate::error::AppError;
use crate::pipeline::observer::{PipelineObserver, TracingObserver};
use crate::pipeline::services::{ColorAnalysisService, FeatureAssembler, ImageDecoder};
use crate::pipeline::types::{FeatureResponse, ImageUpload};

/// Decode, analyze and assemble a single upload. Holds no per-request state, so clones
/// can serve any number of requests in parallel.
#[derive(Clone)]
pub struct FeaturePipeline {
    decoder: ImageDecoder,
    analyzer: ColorAnalysisService,
    assembler: FeatureAssembler,
    observer: Arc<dyn PipelineObserver>,
    decode_timeout: Option<Duration>,
    extraction_slots: Option<Arc<Semaphore>>,
}

impl Default for FeaturePipeline {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl FeaturePipeline {
    pub fn builder() -> FeaturePipelineBuilder {
        FeaturePipelineBuilder::new()
    }

    /// Runs the whole pipeline on the calling thread.
    #[instrument(skip_all, fields(upload = %upload.id))]
    pub fn extract(&self, upload: &ImageUpload) -> Result<FeatureResponse, AppError> {
        let image = self.decoder.decode(upload)?;
        self.observer.decode_complete(&image);

        let color = self.analyzer.analyze(&image);
        Ok(self.assembler.assemble(color))
    }

    /// Validates on the caller, then moves decoding and aggregation onto the blocking pool.
    pub async fn process(&self, upload: ImageUpload) -> Result<FeatureResponse, AppError> {
        self.observer.request_received(&upload);
        self.decoder.validate(&upload)?;

        // The permit moves into the blocking task: a timed-out extraction keeps its slot
        // until the work really stops.
        let permit = match &self.extraction_slots {
            Some(slots) => Some(
                slots
                    .clone()
                    .acquire_owned()
                    .await
                    .map_err(|_| AppError::LimiterClosed)?,
            ),
            None => None,
        };

        let pipeline = self.clone();
        let work = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            pipeline.extract(&upload)
        });
        let joined = match self.decode_timeout {
            Some(limit) => tokio::time::timeout(limit, work).await.map_err(|_| {
                warn!("Extraction exceeded {:?}, detaching blocking task", limit);
                AppError::DecodeTimeout(limit)
            })?,
            None => work.await,
        };
        let response = joined??;
        debug!("Feature extraction completed");
        Ok(response)
    }
}

impl Service<ImageUpload> for FeaturePipeline {
    type Response = FeatureResponse;
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, upload: ImageUpload) -> Self::Future {
        let pipeline = self.clone();
        Box::pin(async move { pipeline.process(upload).await })
    }
}

pub struct FeaturePipelineBuilder {
    observer: Arc<dyn PipelineObserver>,
    decode_timeout: Option<Duration>,
    max_decode_alloc_bytes: Option<u64>,
    max_concurrent_extractions: Option<usize>,
}

impl Default for FeaturePipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FeaturePipelineBuilder {
    pub fn new() -> Self {
        Self {
            observer: Arc::new(TracingObserver),
            decode_timeout: None,
            max_decode_alloc_bytes: None,
            max_concurrent_extractions: None,
        }
    }

    pub fn observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn decode_timeout(mut self, decode_timeout: Option<Duration>) -> Self {
        self.decode_timeout = decode_timeout;
        self
    }

    pub fn max_decode_alloc_bytes(mut self, max_decode_alloc_bytes: Option<u64>) -> Self {
        self.max_decode_alloc_bytes = max_decode_alloc_bytes;
        self
    }

    /// Caps how many extractions may occupy the blocking pool at once.
    pub fn max_concurrent_extractions(mut self, max_concurrent_extractions: Option<usize>) -> Self {
        self.max_concurrent_extractions = max_concurrent_extractions;
        self
    }

    // Applies every extraction limit, this will override earlier builder calls.
    pub fn limits(self, limits: &LimitSettings) -> Self {
        self.decode_timeout(limits.decode_timeout())
            .max_decode_alloc_bytes(limits.max_decode_alloc_bytes)
            .max_concurrent_extractions(limits.max_concurrent_extractions)
    }

    pub fn build(self) -> FeaturePipeline {
        FeaturePipeline {
            decoder: ImageDecoder::new().with_max_alloc_bytes(self.max_decode_alloc_bytes),
            analyzer: ColorAnalysisService::new(self.observer.clone()),
            assembler: FeatureAssembler::new(),
            observer: self.observer,
            decode_timeout: self.decode_timeout,
            extraction_slots: self
                .max_concurrent_extractions
                .map(|max| Arc::new(Semaphore::new(max.max(1)))),
        }
    }
}
