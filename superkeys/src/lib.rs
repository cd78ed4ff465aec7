//! # Super keys
//!
//! A super key emits a different action depending on how many times it's tapped
//! in a row and whether the last tap is held: tap once, twice, three times, hold,
//! tap then hold and so on. Each combination binds an ordinary key, a layer
//! shift, a layer move or a macro.
//!
//! The bindings live in a flat map persisted in the settings storage and can be
//! changed at runtime from the configuration channel.
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![no_std]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod clock;
pub mod config;
pub mod error;
pub mod host;
pub mod index;
mod resolver;
pub mod runtime;
pub mod state;
pub mod storage;
pub mod superkey;

pub use clock::{Clock, EmbassyClock};
pub use config::{SuperKeysConfig, TimingConfig};
pub use error::Error;
pub use host::{CommandOutcome, HostCommand};
pub use runtime::Runtime;
pub use storage::{SettingsArena, SettingsStorage, StorageRegion, SuperKeyStore};
pub use superkey::{EventResult, SuperKeys};
pub use superkeys_types as types;
