// src/services/mod.rs
pub mod analysis;
pub mod delay;
pub mod estimator;
pub mod image_processor;
pub mod orders;
pub mod quote;
pub mod session_store;

pub use analysis::AnalysisService;
pub use delay::{Delay, NoDelay, TokioDelay};
pub use estimator::{RandomSource, SeededRandom};
pub use image_processor::ImageProcessor;
pub use session_store::SessionStore;
