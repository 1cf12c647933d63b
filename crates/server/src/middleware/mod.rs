//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, bind hub per request)
//! 2. `TraceLayer` (request tracing)
//! 3. Body size limit
//! 4. Session layer (tower-sessions, in-memory store)
//! 5. Auth extractor on every data route ([`auth::RequireAuth`])

pub mod auth;
pub mod session;

pub use auth::{AuthRejection, RequireAuth, clear_session, set_current_user};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
