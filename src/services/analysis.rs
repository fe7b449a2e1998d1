// src/services/analysis.rs
use crate::errors::VectorQuoteError;
use crate::models::{FileInfo, UploadedImage};
use crate::services::delay::Delay;
use crate::services::estimator::{RandomSource, estimate};
use crate::services::image_processor::ImageProcessor;
use crate::services::session_store::SessionStore;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Runs the simulated analysis in the background. The upload request returns
/// as soon as the attempt is registered; the preview and the result land in
/// the session store later, unless a newer upload got there first.
pub struct AnalysisService {
    store: Arc<SessionStore>,
    processor: Arc<ImageProcessor>,
    delay: Arc<dyn Delay>,
    delay_duration: Duration,
    rng: Arc<Mutex<Box<dyn RandomSource>>>,
}

impl AnalysisService {
    pub fn new(
        store: Arc<SessionStore>,
        processor: Arc<ImageProcessor>,
        delay: Arc<dyn Delay>,
        delay_duration: Duration,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            store,
            processor,
            delay,
            delay_duration,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Starts a new attempt for `session_id` and returns its id. With
    /// `require_existing` a session that is gone is reported, not recreated.
    pub fn start(
        &self,
        session_id: Uuid,
        require_existing: bool,
        image: UploadedImage,
    ) -> Result<Uuid, VectorQuoteError> {
        let attempt_id = Uuid::new_v4();

        if let Some(previous) = self.store.begin_attempt(
            session_id,
            attempt_id,
            FileInfo::from(&image),
            require_existing,
        )? {
            log::debug!("Session {} superseded an in-flight analysis", session_id);
            previous.abort();
        }

        let delay = Arc::clone(&self.delay);
        let rng = Arc::clone(&self.rng);
        let processor = Arc::clone(&self.processor);
        let preview_store = Arc::clone(&self.store);
        let duration = self.delay_duration;
        let UploadedImage {
            filename,
            content_type,
            size,
            data,
            ..
        } = image;

        let worker = tokio::spawn(async move {
            // Decoding is CPU-bound; keep it off the async workers.
            let preview = async move {
                match tokio::task::spawn_blocking(move || {
                    processor.preview_data_url(&data, &content_type)
                })
                .await
                {
                    Ok(url) => {
                        preview_store.set_preview(&session_id, &attempt_id, url);
                    }
                    Err(e) => log::warn!("Preview for attempt {} failed: {}", attempt_id, e),
                }
            };
            let analysis = async move {
                delay.wait(duration).await;
                let mut rng = rng.lock();
                estimate(size, &filename, &mut **rng)
            };

            let ((), result) = tokio::join!(preview, analysis);
            result
        });

        if !self
            .store
            .attach_task(&session_id, &attempt_id, worker.abort_handle())
        {
            worker.abort();
        }

        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            match worker.await {
                Ok(result) => {
                    let complexity = result.complexity;
                    if store.complete(&session_id, &attempt_id, result) {
                        log::info!(
                            "Analysis {} for session {} complete: {}",
                            attempt_id,
                            session_id,
                            complexity.as_str()
                        );
                    } else {
                        log::debug!("Dropped stale analysis {}", attempt_id);
                    }
                }
                Err(e) if e.is_cancelled() => {
                    log::debug!("Analysis {} cancelled", attempt_id);
                }
                Err(e) => {
                    log::error!("Analysis {} failed: {}", attempt_id, e);
                    store.fail(
                        &session_id,
                        &attempt_id,
                        VectorQuoteError::AnalysisFailed.to_string(),
                    );
                }
            }
        });

        Ok(attempt_id)
    }
}
