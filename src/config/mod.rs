mod loader;
mod types;

pub use loader::{ConfigError, BINARY_ENV, CONFIG_ENV};
pub use types::{
    AgentConfig, AnimationConfig, AssetPaths, BrandingConfig, ReadinessConfig, WrapperConfig,
};
