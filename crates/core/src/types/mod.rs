pub mod input;
pub mod stack;
pub mod update;

// Re-export commonly used types
pub use input::{ActionInput, ConfigEntry, ConfigMap, ConfigSet};
pub use stack::{StackHandle, StackIdentifier, StackLocation};
pub use update::{ActionOutputs, UpResult, UpdateSummary};
