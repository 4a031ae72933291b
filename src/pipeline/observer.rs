use crate::error::AnalysisFault;
use crate::pipeline::types::{ColorFeatures, ColorSignal, DecodedImage, ImageUpload};
use tracing::{debug, info, warn};

/// Checkpoints the feature pipeline reports to. All hooks default to no-ops.
pub trait PipelineObserver: Send + Sync {
    fn request_received(&self, _upload: &ImageUpload) {}
    fn decode_complete(&self, _image: &DecodedImage) {}
    fn classification_complete(&self, _signal: &ColorSignal, _color: &ColorFeatures) {}
    fn fallback_triggered(&self, _fault: &AnalysisFault) {}
}

/// Emits each checkpoint as a structured tracing event.
#[derive(Debug, Clone, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn request_received(&self, upload: &ImageUpload) {
        info!(
            upload = %upload.id,
            content_type = upload.content_type.as_deref().unwrap_or("<none>"),
            file_name = upload.file_name.as_deref().unwrap_or("<none>"),
            bytes = upload.len(),
            "Received image upload"
        );
    }

    fn decode_complete(&self, image: &DecodedImage) {
        debug!(
            width = image.width(),
            height = image.height(),
            color_mode = ?image.color_mode(),
            "Decoded image"
        );
    }

    fn classification_complete(&self, signal: &ColorSignal, color: &ColorFeatures) {
        info!(
            r = signal.r,
            g = signal.g,
            b = signal.b,
            primary = %color.primary,
            secondary = %color.secondary,
            "Classified dominant color"
        );
    }

    fn fallback_triggered(&self, fault: &AnalysisFault) {
        warn!("Color analysis failed, using fallback color: {}", fault);
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Checkpoint {
        Received,
        Decoded,
        Classified(ColorFeatures),
        Fallback(AnalysisFault),
    }

    /// Observer that records every checkpoint, for assertions in tests.
    #[derive(Default)]
    pub struct RecordingObserver {
        checkpoints: Mutex<Vec<Checkpoint>>,
    }

    impl RecordingObserver {
        pub fn checkpoints(&self) -> Vec<Checkpoint> {
            self.checkpoints.lock().unwrap().clone()
        }

        fn record(&self, checkpoint: Checkpoint) {
            self.checkpoints.lock().unwrap().push(checkpoint);
        }
    }

    impl PipelineObserver for RecordingObserver {
        fn request_received(&self, _upload: &ImageUpload) {
            self.record(Checkpoint::Received);
        }

        fn decode_complete(&self, _image: &DecodedImage) {
            self.record(Checkpoint::Decoded);
        }

        fn classification_complete(&self, _signal: &ColorSignal, color: &ColorFeatures) {
            self.record(Checkpoint::Classified(*color));
        }

        fn fallback_triggered(&self, fault: &AnalysisFault) {
            self.record(Checkpoint::Fallback(fault.clone()));
        }
    }

    /// Observer that stalls inside `decode_complete`, tracking how many extractions
    /// are inside that window at the same time.
    pub struct SlowDecodeObserver {
        stall: std::time::Duration,
        current: AtomicUsize,
        peak: AtomicUsize,
        finished: AtomicUsize,
    }

    impl SlowDecodeObserver {
        pub fn new(stall: std::time::Duration) -> Self {
            Self {
                stall,
                current: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                finished: AtomicUsize::new(0),
            }
        }

        pub fn peak(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }

        pub fn finished(&self) -> usize {
            self.finished.load(Ordering::SeqCst)
        }
    }

    impl PipelineObserver for SlowDecodeObserver {
        fn decode_complete(&self, _image: &DecodedImage) {
            let running = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(running, Ordering::SeqCst);
            std::thread::sleep(self.stall);
            self.current.fetch_sub(1, Ordering::SeqCst);
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }
}
