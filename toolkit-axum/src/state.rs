use std::sync::Arc;

use axum::extract::FromRef;
use toolkit_core::ToolsConfig;

/// Router state carrying the shared [`ToolsConfig`].
///
/// Extractors such as [`crate::StrictJson`] pull the config out through
/// `FromRef`, so applications with their own state only need a
/// `FromRef<AppState> for ToolsConfig` impl instead of this type.
#[derive(Debug, Clone, Default)]
pub struct ToolkitState {
    pub config: Arc<ToolsConfig>,
}

impl ToolkitState {
    pub fn new(config: ToolsConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl FromRef<ToolkitState> for ToolsConfig {
    fn from_ref(state: &ToolkitState) -> Self {
        ToolsConfig::clone(&state.config)
    }
}
