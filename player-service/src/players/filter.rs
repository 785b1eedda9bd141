//! Filter builders and listing query parameters
//!
//! Each builder maps one optional request parameter (or a pair of bounds)
//! to a [`Predicate`]. An absent parameter yields
//! [`Predicate::Unconstrained`], so the conjunction of all eight builders
//! matches every player when no parameter is given.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::error::{PlayerError, PlayerResult};
use super::model::{PlayerField, PlayerOrder, Profession, Race};
use crate::repository::{FilterCondition, FilterValue, Pagination, Predicate, Specification};

/// Substring match on the name
pub fn by_name(name: Option<&str>) -> Predicate {
    name.map_or(Predicate::Unconstrained, |n| {
        FilterCondition::contains(PlayerField::Name, n).into()
    })
}

/// Substring match on the title
pub fn by_title(title: Option<&str>) -> Predicate {
    title.map_or(Predicate::Unconstrained, |t| {
        FilterCondition::contains(PlayerField::Title, t).into()
    })
}

/// Exact race
pub fn by_race(race: Option<Race>) -> Predicate {
    race.map_or(Predicate::Unconstrained, |r| {
        FilterCondition::eq(PlayerField::Race, r.as_str()).into()
    })
}

/// Exact profession
pub fn by_profession(profession: Option<Profession>) -> Predicate {
    profession.map_or(Predicate::Unconstrained, |p| {
        FilterCondition::eq(PlayerField::Profession, p.as_str()).into()
    })
}

/// Birthday within epoch-millisecond bounds, both inclusive
pub fn by_birthday_range(after: Option<i64>, before: Option<i64>) -> Predicate {
    range(
        PlayerField::Birthday,
        after.map(millis_to_utc),
        before.map(millis_to_utc),
    )
}

/// Exact banned flag
pub fn by_banned(banned: Option<bool>) -> Predicate {
    banned.map_or(Predicate::Unconstrained, |b| {
        FilterCondition::eq(PlayerField::Banned, b).into()
    })
}

/// Experience within bounds, both inclusive
pub fn by_experience_range(min: Option<i64>, max: Option<i64>) -> Predicate {
    range(PlayerField::Experience, min, max)
}

/// Level within bounds, both inclusive
pub fn by_level_range(min: Option<i32>, max: Option<i32>) -> Predicate {
    range(PlayerField::Level, min, max)
}

fn range<T: Into<FilterValue>>(field: PlayerField, low: Option<T>, high: Option<T>) -> Predicate {
    match (low, high) {
        (None, None) => Predicate::Unconstrained,
        (Some(low), None) => FilterCondition::gte(field, low).into(),
        (None, Some(high)) => FilterCondition::lte(field, high).into(),
        (Some(low), Some(high)) => FilterCondition::between(field, low, high).into(),
    }
}

/// Out-of-range instants clamp to the representable extremes
fn millis_to_utc(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or(if millis < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

/// The eleven optional filter parameters shared by list and count
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerFilter {
    pub name: Option<String>,
    pub title: Option<String>,
    pub race: Option<Race>,
    pub profession: Option<Profession>,
    /// Earliest birthday, epoch milliseconds
    pub after: Option<i64>,
    /// Latest birthday, epoch milliseconds
    pub before: Option<i64>,
    pub banned: Option<bool>,
    pub min_experience: Option<i64>,
    pub max_experience: Option<i64>,
    pub min_level: Option<i32>,
    pub max_level: Option<i32>,
}

impl PlayerFilter {
    /// Conjunction of all eight predicates
    pub fn specification(&self) -> Specification {
        Specification::where_(by_name(self.name.as_deref()))
            .and(by_title(self.title.as_deref()))
            .and(by_race(self.race))
            .and(by_profession(self.profession))
            .and(by_birthday_range(self.after, self.before))
            .and(by_banned(self.banned))
            .and(by_experience_range(self.min_experience, self.max_experience))
            .and(by_level_range(self.min_level, self.max_level))
    }
}

/// Zero-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: i64,
    pub page_size: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: 0,
            page_size: Pagination::DEFAULT_PAGE_SIZE as i64,
        }
    }
}

impl PageRequest {
    /// Convert to an offset/limit window
    ///
    /// Negative page numbers and page sizes below one are rejected.
    pub fn to_pagination(self) -> PlayerResult<Pagination> {
        if self.page_number < 0 {
            return Err(PlayerError::invalid(format!(
                "pageNumber must not be negative, got {}",
                self.page_number
            )));
        }
        if self.page_size < 1 {
            return Err(PlayerError::invalid(format!(
                "pageSize must be at least 1, got {}",
                self.page_size
            )));
        }
        Ok(Pagination::from_page_index(
            self.page_number.unsigned_abs(),
            self.page_size.unsigned_abs(),
        ))
    }
}

/// Query string of the list endpoint
///
/// Repeats the [`PlayerFilter`] fields rather than flattening them;
/// flattened structs lose numeric parsing in `serde_urlencoded`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerListQuery {
    pub name: Option<String>,
    pub title: Option<String>,
    pub race: Option<Race>,
    pub profession: Option<Profession>,
    pub after: Option<i64>,
    pub before: Option<i64>,
    pub banned: Option<bool>,
    pub min_experience: Option<i64>,
    pub max_experience: Option<i64>,
    pub min_level: Option<i32>,
    pub max_level: Option<i32>,
    pub order: Option<PlayerOrder>,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

impl PlayerListQuery {
    /// Split into filter, sort key and page request, applying defaults
    pub fn into_parts(self) -> (PlayerFilter, PlayerOrder, PageRequest) {
        let defaults = PageRequest::default();
        let page = PageRequest {
            page_number: self.page_number.unwrap_or(defaults.page_number),
            page_size: self.page_size.unwrap_or(defaults.page_size),
        };
        let filter = PlayerFilter {
            name: self.name,
            title: self.title,
            race: self.race,
            profession: self.profession,
            after: self.after,
            before: self.before,
            banned: self.banned,
            min_experience: self.min_experience,
            max_experience: self.max_experience,
            min_level: self.min_level,
            max_level: self.max_level,
        };
        (filter, self.order.unwrap_or_default(), page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::PlayerId;
    use crate::players::Player;
    use chrono::TimeZone;

    fn player(experience: i64, level: i32) -> Player {
        Player {
            id: Some(PlayerId::new(1).unwrap()),
            name: "Borin".to_string(),
            title: "Stonebreaker".to_string(),
            race: Race::Dwarf,
            profession: Profession::Warrior,
            experience,
            level,
            until_next_level: 0,
            birthday: Utc.with_ymd_and_hms(2010, 5, 5, 0, 0, 0).unwrap(),
            banned: false,
        }
    }

    #[test]
    fn test_absent_parameters_are_unconstrained() {
        assert_eq!(by_name(None), Predicate::Unconstrained);
        assert_eq!(by_title(None), Predicate::Unconstrained);
        assert_eq!(by_race(None), Predicate::Unconstrained);
        assert_eq!(by_profession(None), Predicate::Unconstrained);
        assert_eq!(by_birthday_range(None, None), Predicate::Unconstrained);
        assert_eq!(by_banned(None), Predicate::Unconstrained);
        assert_eq!(by_experience_range(None, None), Predicate::Unconstrained);
        assert_eq!(by_level_range(None, None), Predicate::Unconstrained);
        assert!(PlayerFilter::default().specification().matches(&player(0, 0)));
    }

    #[test]
    fn test_experience_range_shapes() {
        let lower = by_experience_range(Some(5), None);
        assert!(!lower.matches(&player(4, 0)));
        assert!(lower.matches(&player(5, 0)));

        let upper = by_experience_range(None, Some(5));
        assert!(upper.matches(&player(5, 0)));
        assert!(!upper.matches(&player(6, 0)));

        assert_eq!(
            by_experience_range(Some(1), Some(2)),
            Predicate::Where(FilterCondition::between(PlayerField::Experience, 1_i64, 2_i64))
        );
    }

    #[test]
    fn test_level_range_uses_stored_level() {
        let predicate = by_level_range(Some(2), Some(3));
        assert!(predicate.matches(&player(0, 2)));
        assert!(!predicate.matches(&player(0, 4)));
    }

    #[test]
    fn test_birthday_range_in_millis() {
        let born = Utc.with_ymd_and_hms(2010, 5, 5, 0, 0, 0).unwrap().timestamp_millis();
        assert!(by_birthday_range(Some(born), Some(born)).matches(&player(0, 0)));
        assert!(!by_birthday_range(Some(born + 1), None).matches(&player(0, 0)));
        assert!(by_birthday_range(None, Some(i64::MAX)).matches(&player(0, 0)));
    }

    #[test]
    fn test_name_and_race_filters() {
        assert!(by_name(Some("ori")).matches(&player(0, 0)));
        assert!(!by_name(Some("ORI")).matches(&player(0, 0)));
        assert!(by_race(Some(Race::Dwarf)).matches(&player(0, 0)));
        assert!(!by_race(Some(Race::Elf)).matches(&player(0, 0)));
        assert!(!by_banned(Some(true)).matches(&player(0, 0)));
    }

    #[test]
    fn test_title_and_profession_filters() {
        assert!(by_title(Some("Stone")).matches(&player(0, 0)));
        assert!(by_title(Some("breaker")).matches(&player(0, 0)));
        assert!(!by_title(Some("Ironhand")).matches(&player(0, 0)));

        assert!(by_profession(Some(Profession::Warrior)).matches(&player(0, 0)));
        assert!(!by_profession(Some(Profession::Druid)).matches(&player(0, 0)));
    }

    #[test]
    fn test_banned_filter_both_ways() {
        let active = player(0, 0);
        let mut banned = player(0, 0);
        banned.banned = true;

        assert!(by_banned(Some(false)).matches(&active));
        assert!(!by_banned(Some(false)).matches(&banned));
        assert!(by_banned(Some(true)).matches(&banned));
        assert!(!by_banned(Some(true)).matches(&active));
    }

    #[test]
    fn test_list_query_wires_every_field() {
        let query = PlayerListQuery {
            name: Some("n".to_string()),
            title: Some("t".to_string()),
            race: Some(Race::Orc),
            profession: Some(Profession::Sorcerer),
            after: Some(1),
            before: Some(2),
            banned: Some(true),
            min_experience: Some(3),
            max_experience: Some(4),
            min_level: Some(5),
            max_level: Some(6),
            order: Some(PlayerOrder::Birthday),
            page_number: Some(7),
            page_size: Some(8),
        };

        let (filter, order, page) = query.into_parts();
        assert_eq!(
            filter,
            PlayerFilter {
                name: Some("n".to_string()),
                title: Some("t".to_string()),
                race: Some(Race::Orc),
                profession: Some(Profession::Sorcerer),
                after: Some(1),
                before: Some(2),
                banned: Some(true),
                min_experience: Some(3),
                max_experience: Some(4),
                min_level: Some(5),
                max_level: Some(6),
            }
        );
        assert_eq!(order, PlayerOrder::Birthday);
        assert_eq!(page, PageRequest { page_number: 7, page_size: 8 });
    }

    #[test]
    fn test_page_request_validation() {
        assert_eq!(PageRequest::default().to_pagination().unwrap(), Pagination::new(0, 3));
        assert_eq!(
            PageRequest { page_number: 2, page_size: 5 }.to_pagination().unwrap(),
            Pagination::new(10, 5)
        );
        assert!(PageRequest { page_number: 0, page_size: 0 }.to_pagination().is_err());
        assert!(PageRequest { page_number: -1, page_size: 3 }.to_pagination().is_err());
    }

    #[test]
    fn test_list_query_defaults() {
        let (filter, order, page) = PlayerListQuery::default().into_parts();
        assert_eq!(filter, PlayerFilter::default());
        assert_eq!(order, PlayerOrder::Id);
        assert_eq!(page, PageRequest::default());
    }
}
