//! # Axum Helpers
//!
//! Shared HTTP plumbing for the task service.
//!
//! - **[`auth`]**: HS256 bearer tokens, the auth middleware and the [`AuthUser`] extractor
//! - **[`errors`]**: [`AppError`] and the `{code, error, message}` response body
//! - **[`extractors`]**: validating JSON and query extractors
//! - **[`http`]**: CORS and security headers
//! - **[`server`]**: router assembly, health checks, graceful shutdown
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::app_info;
//!
//! let app = create_router::<ApiDoc>(api_routes)?.merge(health_router(app_info!()));
//! create_production_app(app, &server_config, async {}).await?;
//! ```

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{AuthUser, IssuedToken, JwtAuth, JwtClaims, JwtConfig, jwt_auth_middleware};
pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::{ValidatedJson, ValidatedQuery};
pub use http::{create_cors_layer, security_headers};
pub use server::{
    HealthCheckFuture, HealthResponse, create_production_app, create_router, health_router,
    run_health_checks, shutdown_signal,
};
