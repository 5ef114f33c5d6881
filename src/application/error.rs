use thiserror::Error;

use crate::application::service::ServiceError;
use crate::application::store::StoreError;
use crate::config::LoadError;
use crate::infra::error::InfraError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to render output: {0}")]
    Render(String),
}

impl AppError {
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }
}
