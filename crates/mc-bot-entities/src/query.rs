//! Lookups over the entity registry.

use std::fmt;

use mc_bot_proto::types::Vec3;
use regex::Regex;

use crate::entity::Entity;
use crate::registry::EntityRegistry;

/// Which player entities [`EntityRegistry::find_players`] selects.
pub enum PlayerFilter {
    /// Case-insensitive username match.
    ByName(String),
    ByPattern(Regex),
    ByPredicate(Box<dyn Fn(&Entity) -> bool + Send>),
    All,
}

impl PlayerFilter {
    pub fn by_predicate(f: impl Fn(&Entity) -> bool + Send + 'static) -> Self {
        Self::ByPredicate(Box::new(f))
    }

    fn matches(&self, entity: &Entity) -> bool {
        let username = entity.username.as_deref().unwrap_or_default();
        match self {
            Self::ByName(name) => username.to_lowercase() == name.to_lowercase(),
            Self::ByPattern(re) => re.is_match(username),
            Self::ByPredicate(f) => f(entity),
            Self::All => true,
        }
    }
}

impl fmt::Debug for PlayerFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByName(name) => f.debug_tuple("ByName").field(name).finish(),
            Self::ByPattern(re) => f.debug_tuple("ByPattern").field(&re.as_str()).finish(),
            Self::ByPredicate(_) => f.write_str("ByPredicate(..)"),
            Self::All => f.write_str("All"),
        }
    }
}

/// Result of a player lookup. Name lookups collapse to `None` or `Single`; every other
/// filter yields a `List`, possibly empty.
#[derive(Debug, PartialEq)]
pub enum PlayerMatches<'a> {
    None,
    Single(&'a Entity),
    List(Vec<&'a Entity>),
}

impl<'a> PlayerMatches<'a> {
    pub fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Single(_) => 1,
            Self::List(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<&'a Entity> {
        match self {
            Self::None => Vec::new(),
            Self::Single(e) => vec![e],
            Self::List(list) => list,
        }
    }
}

impl EntityRegistry {
    /// All live entities matching `predicate`, ordered by id.
    pub fn find(&self, predicate: impl Fn(&Entity) -> bool) -> Vec<&Entity> {
        let mut found: Vec<&Entity> = self.iter().filter(|e| predicate(*e)).collect();
        found.sort_by_key(|e| e.id);
        found
    }

    /// Player-kind entities selected by `filter`, ordered by id.
    pub fn find_players(&self, filter: &PlayerFilter) -> PlayerMatches<'_> {
        let mut found = self.find(|e| e.is_player() && filter.matches(e));
        match filter {
            PlayerFilter::ByName(_) => match found.len() {
                0 => PlayerMatches::None,
                1 => PlayerMatches::Single(found.remove(0)),
                _ => PlayerMatches::List(found),
            },
            _ => PlayerMatches::List(found),
        }
    }

    /// Closest live entity to `from` satisfying `predicate`. Ties go to the lower id.
    pub fn nearest_entity(
        &self,
        from: Vec3,
        predicate: impl Fn(&Entity) -> bool,
    ) -> Option<&Entity> {
        self.find(predicate).into_iter().min_by(|a, b| {
            a.position
                .distance_squared(&from)
                .total_cmp(&b.position.distance_squared(&from))
        })
    }

    /// Live entities no farther than `radius` from `center`, nearest first.
    pub fn entities_within(&self, center: Vec3, radius: f64) -> Vec<&Entity> {
        let r2 = radius * radius;
        let mut found = self.find(|e| e.position.distance_squared(&center) <= r2);
        found.sort_by(|a, b| {
            a.position
                .distance_squared(&center)
                .total_cmp(&b.position.distance_squared(&center))
        });
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_bot_proto::packets::EntityKind;

    fn registry() -> EntityRegistry {
        let mut reg = EntityRegistry::new();
        for (id, name, x) in [(1, "Bot", 0.0), (5, "Alice", 3.0), (7, "alice", -4.0), (9, "Bob", 10.0)] {
            let e = reg.get_or_create(id);
            e.kind = EntityKind::Player;
            e.username = Some(name.into());
            e.position = Vec3::new(x, 64.0, 0.0);
        }
        let cow = reg.get_or_create(20);
        cow.kind = EntityKind::Mob;
        cow.name = Some("cow".into());
        cow.position = Vec3::new(1.0, 64.0, 0.0);
        reg
    }

    fn ids(entities: Vec<&Entity>) -> Vec<i32> {
        entities.into_iter().map(|e| e.id).collect()
    }

    #[test]
    fn by_name_collapses() {
        let reg = registry();
        match reg.find_players(&PlayerFilter::ByName("BOB".into())) {
            PlayerMatches::Single(e) => assert_eq!(e.id, 9),
            other => panic!("expected single match, got {other:?}"),
        }
        assert_eq!(
            reg.find_players(&PlayerFilter::ByName("nobody".into())),
            PlayerMatches::None
        );
        let both = reg.find_players(&PlayerFilter::ByName("alice".into()));
        assert!(matches!(both, PlayerMatches::List(_)));
        assert_eq!(ids(both.into_vec()), vec![5, 7]);
    }

    #[test]
    fn by_name_folds_non_ascii_case() {
        let mut reg = registry();
        let e = reg.get_or_create(11);
        e.kind = EntityKind::Player;
        e.username = Some("Ödön".into());
        match reg.find_players(&PlayerFilter::ByName("ÖDÖN".into())) {
            PlayerMatches::Single(e) => assert_eq!(e.id, 11),
            other => panic!("expected single match, got {other:?}"),
        }
    }

    #[test]
    fn other_filters_always_list() {
        let reg = registry();
        let pattern = PlayerFilter::ByPattern(Regex::new("^B").unwrap());
        assert_eq!(ids(reg.find_players(&pattern).into_vec()), vec![1, 9]);

        let none = reg.find_players(&PlayerFilter::ByPattern(Regex::new("^Z").unwrap()));
        assert_eq!(none, PlayerMatches::List(Vec::new()));
        assert!(none.is_empty());

        let far = PlayerFilter::by_predicate(|e| e.position.x.abs() > 3.5);
        assert_eq!(ids(reg.find_players(&far).into_vec()), vec![7, 9]);

        // mobs are never players
        assert_eq!(reg.find_players(&PlayerFilter::All).len(), 4);
    }

    #[test]
    fn nearest_respects_predicate() {
        let reg = registry();
        let origin = Vec3::new(0.0, 64.0, 0.0);
        assert_eq!(reg.nearest_entity(origin, |_| true).map(|e| e.id), Some(1));
        assert_eq!(
            reg.nearest_entity(origin, |e| e.id != 1).map(|e| e.id),
            Some(20)
        );
        assert_eq!(
            reg.nearest_entity(origin, |e| e.is_player() && e.id != 1)
                .map(|e| e.id),
            Some(5)
        );
        assert!(reg.nearest_entity(origin, |_| false).is_none());
    }

    #[test]
    fn within_radius_sorted_by_distance() {
        let reg = registry();
        let found = reg.entities_within(Vec3::new(0.0, 64.0, 0.0), 4.0);
        assert_eq!(ids(found), vec![1, 20, 5, 7]);
    }
}
