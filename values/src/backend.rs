//! Backend trait shared by the state implementation and the API layer.

use async_trait::async_trait;
use std::sync::Arc;

use crate::request::RequestValue;
use crate::response::ResponseValue;

/// The contract between transports and the backend.
///
/// The API layer only ever talks to the backend through this trait, which
/// keeps routes testable against a mock state and keeps the backend free of
/// HTTP concerns. Errors should be [`crate::AnalysisError`] values wrapped in
/// `anyhow`, so the transport can downcast and map them to its own error
/// surface.
#[async_trait]
pub trait AppStateProvider: Send + Sync {
    /// Handle one request value and produce a response value.
    async fn handle_request(&self, request: RequestValue) -> anyhow::Result<ResponseValue>;
}

#[async_trait]
impl<T: AppStateProvider + ?Sized> AppStateProvider for Arc<T> {
    async fn handle_request(&self, request: RequestValue) -> anyhow::Result<ResponseValue> {
        (**self).handle_request(request).await
    }
}
