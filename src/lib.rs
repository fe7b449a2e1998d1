// src/lib.rs
//! Instant quotes for vector tracing.
//!
//! A customer uploads one raster image, a simulated analysis classifies it
//! into a complexity tier from its size and file name, and the quote
//! calculator prices the job from the tier, the number of images and any
//! add-ons. Orders then move through details, payment and confirmation.
//! All state is in-memory and per session.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;

use crate::config::AppConfig;
use crate::handlers::{
    clear_session, close_order, confirm_order, create_order, get_order, get_session,
    list_add_ons, list_pricing, quote_session, submit_order_details, upload_image,
};
use crate::services::{
    AnalysisService, Delay, ImageProcessor, RandomSource, SeededRandom, SessionStore, TokioDelay,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<SessionStore>,
    pub analysis: Arc<AnalysisService>,
    pub image_processor: Arc<ImageProcessor>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let rng: Box<dyn RandomSource> = match config.rng_seed {
            Some(seed) => Box::new(SeededRandom::from_seed(seed)),
            None => Box::new(SeededRandom::from_os()),
        };
        Self::with_sources(config, Arc::new(TokioDelay), rng)
    }

    /// Builds the state around an explicit delay and random source.
    pub fn with_sources(
        config: AppConfig,
        delay: Arc<dyn Delay>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let store = Arc::new(SessionStore::new());
        let image_processor = Arc::new(ImageProcessor::new());
        let analysis = Arc::new(AnalysisService::new(
            Arc::clone(&store),
            Arc::clone(&image_processor),
            delay,
            config.analysis_delay,
            rng,
        ));

        Self {
            config: Arc::new(config),
            store,
            analysis,
            image_processor,
        }
    }
}

/// Registers every route. Shared by the binary and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/upload", web::post().to(upload_image))
            .route("/addons", web::get().to(list_add_ons))
            .route("/pricing", web::get().to(list_pricing))
            .service(
                web::scope("/sessions/{session_id}")
                    .service(
                        web::resource("")
                            .route(web::get().to(get_session))
                            .route(web::delete().to(clear_session)),
                    )
                    .route("/quote", web::post().to(quote_session))
                    .service(
                        web::resource("/order")
                            .route(web::post().to(create_order))
                            .route(web::get().to(get_order))
                            .route(web::delete().to(close_order)),
                    )
                    .route("/order/details", web::put().to(submit_order_details))
                    .route("/order/confirm", web::post().to(confirm_order)),
            ),
    )
    .route("/health", web::get().to(health_check));
}

async fn health_check(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "vectorquote",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": data.store.len()
    }))
}
