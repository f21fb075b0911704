//! Press-release content generation: outlet styles, template rendering,
//! delegation to a chat-completion provider, and the per-outlet orchestrator.

pub mod config;
pub mod delegated;
pub mod generator;
pub mod orchestrator;
pub mod outlets;
pub mod reply;
pub mod template;

pub use config::{ContentConfig, ProviderConfig, Strategy};
pub use generator::{ContentGenerator, FallbackReason, Generation};
pub use orchestrator::Orchestrator;
pub use outlets::{OutletRegistry, OutletStyle};
