//! Adventurer/role model.
//!
//! Roles are plain tags; their rule exceptions are data in the capability
//! table (`capability`). `Adventurer` is the per-player value record.

pub mod adventurer;
pub mod capability;

pub use adventurer::Adventurer;
pub use capability::{ExchangeReach, MovementMode, Role, RoleCapabilities};
