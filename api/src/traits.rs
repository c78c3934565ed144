//! State types for API routes.
//!
//! The unified backend trait lives in `fundus-values`; this module pins the
//! concrete state type the router is built around.

use std::sync::Arc;

pub use fundus_values::AppStateProvider;

/// Concrete state type used by the Axum router.
///
/// Routes only ever see the backend through the trait object, which keeps
/// them testable against mock states.
pub type SharedState = Arc<dyn AppStateProvider>;
