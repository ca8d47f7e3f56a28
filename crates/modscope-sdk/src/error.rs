use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("registry error: {0}")]
    Registry(#[from] modscope_registry::RegistryError),

    #[error("binding error: {0}")]
    Binding(#[from] modscope_binding::BindingError),

    #[error("store error: {0}")]
    Store(#[from] modscope_store::StoreError),

    #[error("failed to read config {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;
