use std::{fmt, str::FromStr, sync::LazyLock};

use itertools::Itertools;
use log::warn;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::GameError;

static RULE_TEXT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-8],)*[0-8]$").expect("rule pattern is valid"));

/// A set of neighbor counts, bit `n` is set when count `n` is a member.
///
/// Only counts up to 8 can ever match a cell, the remaining bits are kept so that
/// whatever the caller put in renders back out unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NeighborCounts(u16);

impl NeighborCounts {
    pub const MAX_NEIGHBORS: u8 = 8;
    const CAPACITY: u8 = u16::BITS as u8;

    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn contains(self, count: usize) -> bool {
        count < Self::CAPACITY as usize && self.0 & (1 << count) != 0
    }

    pub fn insert(&mut self, count: u8) {
        if count >= Self::CAPACITY {
            warn!("Dropping neighbor count {count}, it can't be stored in a rule");
            return;
        }

        self.0 |= 1 << count;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..Self::CAPACITY).filter(move |count| self.contains(*count as usize))
    }

    pub fn to_vec(self) -> Vec<u8> {
        self.iter().collect()
    }
}

impl FromIterator<u8> for NeighborCounts {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        let mut counts = Self::empty();
        for count in iter {
            counts.insert(count);
        }
        counts
    }
}

impl<const N: usize> From<[u8; N]> for NeighborCounts {
    fn from(counts: [u8; N]) -> Self {
        counts.into_iter().collect()
    }
}

impl From<&[u8]> for NeighborCounts {
    fn from(counts: &[u8]) -> Self {
        counts.iter().copied().collect()
    }
}

/// Canonical text form: ascending, comma separated, no whitespace.
impl fmt::Display for NeighborCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iter().join(","))
    }
}

impl FromStr for NeighborCounts {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !RULE_TEXT_PATTERN.is_match(s) {
            return Err(GameError::InvalidRuleText(s.to_owned()));
        }

        s.split(',')
            .map(|count| {
                count
                    .parse::<u8>()
                    .map_err(|_| GameError::InvalidRuleText(s.to_owned()))
            })
            .collect()
    }
}

impl Serialize for NeighborCounts {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_vec().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NeighborCounts {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let counts = Vec::<u8>::deserialize(deserializer)?;

        if let Some(count) = counts.iter().find(|count| **count > Self::MAX_NEIGHBORS) {
            return Err(serde::de::Error::custom(format!(
                "neighbor count {count} is out of range (0 to {})",
                Self::MAX_NEIGHBORS
            )));
        }

        Ok(counts.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Neighbor counts that bring a dead cell to life.
    pub reanimate: NeighborCounts,

    /// Neighbor counts that keep a living cell alive.
    pub keep_alive: NeighborCounts,
}

impl Rule {
    pub fn new<B, S>(reanimate: B, keep_alive: S) -> Self
    where
        B: Into<NeighborCounts>,
        S: Into<NeighborCounts>,
    {
        Self {
            reanimate: reanimate.into(),
            keep_alive: keep_alive.into(),
        }
    }

    pub fn set_reanimate_rule<C>(&mut self, counts: C)
    where
        C: Into<NeighborCounts>,
    {
        self.reanimate = counts.into();
    }

    pub fn set_keep_alive_rule<C>(&mut self, counts: C)
    where
        C: Into<NeighborCounts>,
    {
        self.keep_alive = counts.into();
    }

    pub fn reanimate_contains(&self, neighbor_count: usize) -> bool {
        self.reanimate.contains(neighbor_count)
    }

    pub fn keep_alive_contains(&self, neighbor_count: usize) -> bool {
        self.keep_alive.contains(neighbor_count)
    }

    /// Reanimation is checked first, a cell is only kept alive if it already lives.
    pub fn next_alive(&self, alive: bool, neighbor_count: usize) -> bool {
        if !alive && self.reanimate_contains(neighbor_count) {
            true
        } else {
            alive && self.keep_alive_contains(neighbor_count)
        }
    }
}

impl Default for Rule {
    fn default() -> Self {
        Self::new([3], [2, 3])
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reanimate {} / keep alive {}", self.reanimate, self.keep_alive)
    }
}
