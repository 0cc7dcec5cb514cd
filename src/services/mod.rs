/// OpenAPI documentation generation.
pub mod documentation;
/// Store operations exposed over HTTP.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Best-effort session log.
pub mod recorder;
/// Screen-level composite actions and views.
pub mod screen_service;
/// Session history lookups.
pub mod session_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
