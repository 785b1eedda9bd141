//! Input validation for player payloads and identifiers

use chrono::Datelike;

use super::error::{PlayerError, PlayerResult};
use super::model::PlayerPatch;
use crate::ids::PlayerId;

/// Longest accepted name, in characters
pub const NAME_MAX_CHARS: usize = 12;
/// Longest accepted title, in characters
pub const TITLE_MAX_CHARS: usize = 30;
/// Highest accepted experience
pub const EXPERIENCE_MAX: i64 = 10_000_000;
/// Birthday years must lie strictly between these two
pub const BIRTH_YEAR_BOUNDS: (i32, i32) = (2000, 3000);

/// Fail unless every attribute a new player needs is present
pub fn require_complete(patch: &PlayerPatch) -> PlayerResult<()> {
    let missing = patch.missing_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PlayerError::invalid(format!(
            "missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Check every present attribute against its allowed range
///
/// Checks run in the order name, title, experience, birthday; the first
/// violation is reported.
pub fn check_ranges(patch: &PlayerPatch) -> PlayerResult<()> {
    if let Some(name) = &patch.name {
        let len = name.chars().count();
        if len == 0 || len > NAME_MAX_CHARS {
            return Err(PlayerError::invalid(format!(
                "name must be 1 to {} characters, got {}",
                NAME_MAX_CHARS, len
            )));
        }
    }

    if let Some(title) = &patch.title {
        let len = title.chars().count();
        if len == 0 || len > TITLE_MAX_CHARS {
            return Err(PlayerError::invalid(format!(
                "title must be 1 to {} characters, got {}",
                TITLE_MAX_CHARS, len
            )));
        }
    }

    if let Some(experience) = patch.experience {
        if !(0..=EXPERIENCE_MAX).contains(&experience) {
            return Err(PlayerError::invalid(format!(
                "experience must be between 0 and {}, got {}",
                EXPERIENCE_MAX, experience
            )));
        }
    }

    if let Some(birthday) = patch.birthday {
        let (after, before) = BIRTH_YEAR_BOUNDS;
        let year = birthday.year();
        if year <= after || year >= before {
            return Err(PlayerError::invalid(format!(
                "birthday year must be after {} and before {}, got {}",
                after, before, year
            )));
        }
    }

    Ok(())
}

/// Validate a raw path identifier
///
/// Absent, empty, zero, negative and non-numeric values are rejected.
pub fn parse_player_id(raw: Option<&str>) -> PlayerResult<PlayerId> {
    let raw = raw.ok_or_else(|| PlayerError::invalid("player id is required"))?;
    Ok(raw.parse::<PlayerId>()?)
}
