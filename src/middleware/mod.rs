// ABOUTME: HTTP middleware for request tracing, authentication and CORS
// ABOUTME: Provides the access control gate, request id generation and span creation

pub mod auth;
pub mod cors;
pub mod tracing;

// Authentication gate
pub use auth::AccessGate;

// CORS configuration
pub use cors::setup_cors;

// Request tracing
pub use tracing::{
    create_request_span, propagate_request_id_layer, set_request_id_layer, trace_layer,
    RequestSpan, REQUEST_ID_HEADER,
};
