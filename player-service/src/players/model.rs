//! Player domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ids::PlayerId;
use crate::repository::FilterValue;

/// A stored player record
///
/// `level` and `until_next_level` are derived from `experience` and are
/// recomputed on every create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Storage-assigned key; `None` until the record is first saved
    pub id: Option<PlayerId>,
    pub name: String,
    pub title: String,
    pub race: Race,
    pub profession: Profession,
    pub experience: i64,
    pub level: i32,
    pub until_next_level: i64,
    /// Epoch milliseconds on the wire
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub birthday: DateTime<Utc>,
    pub banned: bool,
}

impl Player {
    /// Merge a partial update into this record
    ///
    /// Present fields overwrite. `banned` is always overwritten and falls back
    /// to `false` when the patch omits it.
    pub fn apply_patch(&mut self, patch: PlayerPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(race) = patch.race {
            self.race = race;
        }
        if let Some(profession) = patch.profession {
            self.profession = profession;
        }
        if let Some(experience) = patch.experience {
            self.experience = experience;
        }
        if let Some(birthday) = patch.birthday {
            self.birthday = birthday;
        }
        self.banned = patch.banned.unwrap_or(false);
    }
}

/// Request payload for create and update; every attribute optional
///
/// Unknown fields such as `id`, `level` or `untilNextLevel` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub race: Option<Race>,
    #[serde(default)]
    pub profession: Option<Profession>,
    #[serde(default)]
    pub experience: Option<i64>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub birthday: Option<DateTime<Utc>>,
    #[serde(default)]
    pub banned: Option<bool>,
}

impl PlayerPatch {
    /// Names of the attributes a new player must carry but this patch lacks
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push("name");
        }
        if self.title.is_none() {
            missing.push("title");
        }
        if self.race.is_none() {
            missing.push("race");
        }
        if self.profession.is_none() {
            missing.push("profession");
        }
        if self.experience.is_none() {
            missing.push("experience");
        }
        if self.birthday.is_none() {
            missing.push("birthday");
        }
        missing
    }

    /// Build an unsaved player, or `None` when a required attribute is absent
    ///
    /// Progression fields start at zero and must be recalculated by the caller.
    pub fn into_player(self) -> Option<Player> {
        Some(Player {
            id: None,
            name: self.name?,
            title: self.title?,
            race: self.race?,
            profession: self.profession?,
            experience: self.experience?,
            level: 0,
            until_next_level: 0,
            birthday: self.birthday?,
            banned: self.banned.unwrap_or(false),
        })
    }
}

/// Error returned when an enum tag is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

macro_rules! tagged_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal { $($variant:ident => $tag:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $tag)]
                $variant,
            )+
        }

        impl $name {
            /// Every member in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Upper-case tag used on the wire and in storage
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $tag,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($tag => Ok($name::$variant),)+
                    _ => Err(UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

tagged_enum! {
    /// Player race
    Race, "race" {
        Human => "HUMAN",
        Dwarf => "DWARF",
        Elf => "ELF",
        Giant => "GIANT",
        Orc => "ORC",
        Troll => "TROLL",
        Hobbit => "HOBBIT",
    }
}

tagged_enum! {
    /// Player profession
    Profession, "profession" {
        Warrior => "WARRIOR",
        Rogue => "ROGUE",
        Sorcerer => "SORCERER",
        Cleric => "CLERIC",
        Paladin => "PALADIN",
        Nazgul => "NAZGUL",
        Warlock => "WARLOCK",
        Druid => "DRUID",
    }
}

/// Player attributes addressable by filters and sort keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerField {
    Id,
    Name,
    Title,
    Race,
    Profession,
    Experience,
    Level,
    Birthday,
    Banned,
}

impl PlayerField {
    /// Column name in the `player` table
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Title => "title",
            Self::Race => "race",
            Self::Profession => "profession",
            Self::Experience => "experience",
            Self::Level => "level",
            Self::Birthday => "birthday",
            Self::Banned => "banned",
        }
    }

    /// Read this attribute from a player as a comparable value
    pub fn value_of(&self, player: &Player) -> FilterValue {
        match self {
            Self::Id => FilterValue::Integer(player.id.map_or(0, PlayerId::get)),
            Self::Name => FilterValue::String(player.name.clone()),
            Self::Title => FilterValue::String(player.title.clone()),
            Self::Race => FilterValue::String(player.race.as_str().to_string()),
            Self::Profession => FilterValue::String(player.profession.as_str().to_string()),
            Self::Experience => FilterValue::Integer(player.experience),
            Self::Level => FilterValue::Integer(i64::from(player.level)),
            Self::Birthday => FilterValue::Timestamp(player.birthday),
            Self::Banned => FilterValue::Boolean(player.banned),
        }
    }
}

impl fmt::Display for PlayerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Sort key for player listings
///
/// Accepts the upper-case tag or its lower-case spelling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerOrder {
    #[default]
    #[serde(rename = "ID", alias = "id")]
    Id,
    #[serde(rename = "NAME", alias = "name")]
    Name,
    #[serde(rename = "EXPERIENCE", alias = "experience")]
    Experience,
    #[serde(rename = "BIRTHDAY", alias = "birthday")]
    Birthday,
    #[serde(rename = "LEVEL", alias = "level")]
    Level,
}

impl PlayerOrder {
    /// Attribute the listing is sorted by
    pub const fn field(&self) -> PlayerField {
        match self {
            Self::Id => PlayerField::Id,
            Self::Name => PlayerField::Name,
            Self::Experience => PlayerField::Experience,
            Self::Birthday => PlayerField::Birthday,
            Self::Level => PlayerField::Level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Player {
        Player {
            id: Some(PlayerId::new(3).unwrap()),
            name: "Ardan".to_string(),
            title: "Keeper of the Gate".to_string(),
            race: Race::Human,
            profession: Profession::Paladin,
            experience: 1500,
            level: 3,
            until_next_level: 500,
            birthday: Utc.with_ymd_and_hms(2005, 6, 1, 0, 0, 0).unwrap(),
            banned: true,
        }
    }

    #[test]
    fn test_player_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["race"], "HUMAN");
        assert_eq!(json["profession"], "PALADIN");
        assert_eq!(json["untilNextLevel"], 500);
        assert_eq!(json["birthday"], 1_117_584_000_000_i64);
    }

    #[test]
    fn test_patch_ignores_derived_fields() {
        let patch: PlayerPatch = serde_json::from_str(
            r#"{"id": 99, "level": 40, "untilNextLevel": 1, "name": "Bo", "birthday": 1117584000000}"#,
        )
        .unwrap();
        assert_eq!(patch.name.as_deref(), Some("Bo"));
        assert_eq!(
            patch.birthday,
            Some(Utc.with_ymd_and_hms(2005, 6, 1, 0, 0, 0).unwrap())
        );
        assert!(patch.experience.is_none());
    }

    #[test]
    fn test_apply_patch_resets_banned_when_absent() {
        let mut player = sample();
        player.apply_patch(PlayerPatch {
            title: Some("Warden".to_string()),
            ..Default::default()
        });
        assert_eq!(player.title, "Warden");
        assert_eq!(player.name, "Ardan");
        assert!(!player.banned);
    }

    #[test]
    fn test_into_player_requires_all_fields() {
        let patch = PlayerPatch {
            name: Some("Bo".to_string()),
            ..Default::default()
        };
        assert_eq!(
            patch.missing_fields(),
            vec!["title", "race", "profession", "experience", "birthday"]
        );
        assert!(patch.into_player().is_none());
    }

    #[test]
    fn test_enum_tags_round_trip_through_from_str() {
        for race in Race::ALL {
            assert_eq!(race.as_str().parse::<Race>().unwrap(), *race);
        }
        assert!("human".parse::<Race>().is_err());
        assert_eq!("NAZGUL".parse::<Profession>().unwrap(), Profession::Nazgul);
    }

    #[test]
    fn test_order_accepts_both_spellings() {
        let upper: PlayerOrder = serde_json::from_str("\"LEVEL\"").unwrap();
        let lower: PlayerOrder = serde_json::from_str("\"level\"").unwrap();
        assert_eq!(upper, PlayerOrder::Level);
        assert_eq!(lower, PlayerOrder::Level);
        assert_eq!(PlayerOrder::default().field(), PlayerField::Id);
    }
}
