//! Entities, entity sets and worlds.
//!
//! A world is a tuple of per-player shot counts. `(0, 1, 2)` means the first
//! player made no shots, the second made some but not all, and the third made
//! all of them (with two shots in the domain).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LexiconError;

/// Largest domain an [`EntitySet`] can hold.
pub const MAX_ENTITIES: usize = 64;

/// Most players, and most shots, a [`Domain`] may have.
///
/// Determiner phrases and proper names denote sets of scopes, so building
/// the base lexicon walks every subset of the players and of the shots.
pub const MAX_NOUN_ENTITIES: usize = 16;

/// Letters used to name shot-count levels: none, some, all.
const LEVEL_LETTERS: [char; 3] = ['N', 'S', 'A'];

/// A set of entities, stored as a bitmask over entity indices.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EntitySet(u64);

impl EntitySet {
    /// The empty set.
    pub fn empty() -> Self {
        Self(0)
    }

    /// Build a set from entity indices.
    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        let mut set = Self::empty();
        for i in indices {
            set.insert(i);
        }
        set
    }

    /// Add entity `i`.
    pub fn insert(&mut self, i: usize) {
        debug_assert!(i < MAX_ENTITIES);
        self.0 |= 1 << i;
    }

    /// Membership test.
    pub fn contains(&self, i: usize) -> bool {
        i < MAX_ENTITIES && self.0 & (1 << i) != 0
    }

    /// Set intersection.
    pub fn intersection(&self, other: &EntitySet) -> EntitySet {
        EntitySet(self.0 & other.0)
    }

    /// `self ⊆ other`.
    pub fn is_subset(&self, other: &EntitySet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set has no members.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Member indices in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..MAX_ENTITIES).filter(move |&i| self.contains(i))
    }
}

/// The entities of the basketball fragment: players first, then shots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    players: Vec<String>,
    shots: Vec<String>,
}

impl Domain {
    /// Create a domain from player and shot names.
    ///
    /// # Errors
    ///
    /// Returns an error if names repeat, or if there are more than
    /// [`MAX_NOUN_ENTITIES`] players or shots.
    pub fn new(players: Vec<String>, shots: Vec<String>) -> Result<Self, LexiconError> {
        for (noun, len) in [("player", players.len()), ("shot", shots.len())] {
            if len > MAX_NOUN_ENTITIES {
                return Err(LexiconError::TooManyEntities {
                    noun,
                    got: len,
                    max: MAX_NOUN_ENTITIES,
                });
            }
        }

        let mut seen = std::collections::BTreeSet::new();
        for name in players.iter().chain(shots.iter()) {
            if !seen.insert(name.as_str()) {
                return Err(LexiconError::DuplicateEntity { name: name.clone() });
            }
        }

        Ok(Self { players, shots })
    }

    /// Player names in index order.
    pub fn players(&self) -> &[String] {
        &self.players
    }

    /// Shot names in index order.
    pub fn shots(&self) -> &[String] {
        &self.shots
    }

    /// Total number of entities.
    pub fn n_entities(&self) -> usize {
        self.players.len() + self.shots.len()
    }

    /// Entity index of the i-th player.
    pub fn player(&self, i: usize) -> usize {
        i
    }

    /// Entity index of the j-th shot.
    pub fn shot(&self, j: usize) -> usize {
        self.players.len() + j
    }

    /// The set of all players.
    pub fn player_set(&self) -> EntitySet {
        EntitySet::from_indices(0..self.players.len())
    }

    /// The set of all shots.
    pub fn shot_set(&self) -> EntitySet {
        EntitySet::from_indices(self.players.len()..self.n_entities())
    }

    /// Name of entity `i`.
    pub fn entity_name(&self, i: usize) -> Option<&str> {
        self.players
            .iter()
            .chain(self.shots.iter())
            .nth(i)
            .map(String::as_str)
    }
}

/// A world: how many shots each player made.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct World(pub Vec<u8>);

impl World {
    /// Shot count of player `i`.
    pub fn count(&self, i: usize) -> usize {
        self.0.get(i).copied().unwrap_or(0) as usize
    }

    /// Number of players this world describes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this world describes no players.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether shot counts never decrease from one player to the next.
    pub fn is_non_decreasing(&self) -> bool {
        self.0.windows(2).all(|w| w[0] <= w[1])
    }

    /// Display name: one letter per player (`N`one, `S`ome, `A`ll).
    pub fn name(&self) -> String {
        self.0
            .iter()
            .map(|&level| {
                LEVEL_LETTERS
                    .get(level as usize)
                    .copied()
                    .unwrap_or_else(|| char::from_digit(level as u32 % 10, 10).unwrap_or('?'))
            })
            .collect()
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Enumerate worlds as the Cartesian product of `levels` across `length` players.
///
/// The last player varies fastest. With `increasing`, only worlds whose counts
/// never decrease are kept, which removes permutations of exchangeable players.
///
/// # Example
///
/// ```rust
/// use pragmatics_lexicon::{enumerate_worlds, World};
///
/// let worlds = enumerate_worlds(&[0, 1, 2], 2, true);
/// let names: Vec<String> = worlds.iter().map(World::name).collect();
/// assert_eq!(names, vec!["NN", "NS", "NA", "SS", "SA", "AA"]);
/// ```
pub fn enumerate_worlds(levels: &[u8], length: usize, increasing: bool) -> Vec<World> {
    if levels.is_empty() {
        return Vec::new();
    }

    let mut worlds = Vec::new();
    let mut digits = vec![0usize; length];
    loop {
        let world = World(digits.iter().map(|&d| levels[d]).collect());
        if !increasing || world.is_non_decreasing() {
            worlds.push(world);
        }

        // Odometer step, last position fastest.
        let mut pos = length;
        loop {
            if pos == 0 {
                return worlds;
            }
            pos -= 1;
            digits[pos] += 1;
            if digits[pos] < levels.len() {
                break;
            }
            digits[pos] = 0;
        }
    }
}
