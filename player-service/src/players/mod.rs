//! Player domain: model, level curve, validation, filters and service

mod error;
pub mod filter;
mod level;
mod model;
mod service;
pub mod validation;

pub use error::{PlayerError, PlayerResult};
pub use filter::{PageRequest, PlayerFilter, PlayerListQuery};
pub use level::{level_for, until_next_level, Progression};
pub use model::{Player, PlayerField, PlayerOrder, PlayerPatch, Profession, Race, UnknownVariant};
pub use service::PlayerService;
