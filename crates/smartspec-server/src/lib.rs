//! smartspec-server - HTTP analysis endpoint for CAD uploads.
//!
//! `POST /analyze-cad` with `{ "cad_upload_id": "..." }` fetches the upload,
//! runs the geometry extractor over it, records the estimate and returns
//! `{ "success": true, "analysis": { volume, surface_area, bounding_box } }`.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use smartspec_geometry::Extractor;
//! use smartspec_server::{create_server, AnalysisService, AppState, DirectorySource, MemoryStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let source = DirectorySource::new("./uploads", 50 * 1024 * 1024);
//!     let service = AnalysisService::new(Arc::new(source), Arc::new(MemoryStore::new()), Extractor::new());
//!     let app = create_server(AppState::new(service));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod service;
pub mod source;
pub mod state;
pub mod store;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use service::{AnalysisError, AnalysisService};
pub use source::{DirectorySource, SourceError, Upload, UploadSource};
pub use state::AppState;
pub use store::{EstimateStore, MemoryStore, StoreError, StoredEstimate};

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the server with all routes and middleware.
pub fn create_server(state: AppState) -> Router {
    routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
