//! The lexicon space: every way of refining the refinable words, rendered as
//! message × state truth matrices.
//!
//! Assignments are produced lazily by an odometer over per-word candidate
//! lists (words in sorted order, last word varying fastest), so the space is
//! never materialized. Matrices with a row that is false everywhere are
//! infeasible and skipped.

use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use pragmatics_prob::Matrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::LexiconError;
use crate::message::Messages;
use crate::refine::{enumerate_denotations, Refinement};
use crate::semantics::{Denotation, Environment, Lexicon};

/// How to walk a lexicon space.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Enumeration {
    /// Every assignment, in canonical order.
    #[default]
    Full,
    /// Up to `count` distinct assignments drawn uniformly at random.
    ///
    /// This is an approximation of the full marginalization, for spaces too
    /// large to enumerate.
    Sample { count: usize, seed: u64 },
}

/// Evaluate every message in every world under `env`.
///
/// Rows follow `messages` with the all-true `NULL` row last; entries are
/// 1.0 or 0.0.
pub fn render_matrix<E: Environment + ?Sized>(
    env: &E,
    messages: &Messages,
    n_worlds: usize,
) -> Result<Matrix, LexiconError> {
    if n_worlds == 0 {
        return Err(LexiconError::NoWorlds);
    }
    let mut rows = Vec::with_capacity(messages.len());
    for message in messages.iter() {
        let mut row = Vec::with_capacity(n_worlds);
        for world in 0..n_worlds {
            row.push(if message.formula.holds(env, world)? { 1.0 } else { 0.0 });
        }
        rows.push(row);
    }
    rows.push(vec![1.0; n_worlds]);
    Ok(Matrix::new(rows)?)
}

/// A matrix is feasible iff every row has a positive sum.
pub fn filter_feasible(matrix: &Matrix) -> bool {
    matrix.row_sums().iter().all(|&sum| sum > 0.0)
}

/// The candidate denotations of every word, with the messages to render.
#[derive(Debug, Clone)]
pub struct LexiconSpace {
    base: Lexicon,
    words: Vec<String>,
    candidates: Vec<Vec<Denotation>>,
    messages: Messages,
    n_worlds: usize,
}

impl LexiconSpace {
    /// Build the space.
    ///
    /// Words of `base` not named in `refinements` keep their base meaning.
    ///
    /// # Errors
    ///
    /// Fails if a refinement names an unknown word or cannot be enumerated,
    /// or if some message does not evaluate under the base lexicon.
    pub fn new(
        base: Lexicon,
        refinements: &BTreeMap<String, Refinement>,
        messages: Messages,
        n_worlds: usize,
    ) -> Result<Self, LexiconError> {
        for word in refinements.keys() {
            base.lookup(word)?;
        }

        let mut words = Vec::with_capacity(base.len());
        let mut candidates = Vec::with_capacity(base.len());
        for word in base.words() {
            candidates.push(enumerate_denotations(&base, word, refinements.get(word))?);
            words.push(word.to_string());
        }

        for word in unread_words(&messages, refinements) {
            warn!(word, "refinable word is read by no message");
        }

        let space = Self {
            base,
            words,
            candidates,
            messages,
            n_worlds,
        };
        space.base_matrix()?;

        debug!(
            words = space.words.len(),
            refinable = refinements.len(),
            messages = space.messages.len(),
            worlds = n_worlds,
            size = space.size(),
            "built lexicon space"
        );
        Ok(space)
    }

    /// Number of assignments (saturating), before the feasibility filter.
    pub fn size(&self) -> usize {
        self.candidates
            .iter()
            .fold(1usize, |acc, c| acc.saturating_mul(c.len()))
    }

    /// Number of candidate meanings of `word`.
    pub fn candidate_count(&self, word: &str) -> Option<usize> {
        self.index_of(word).map(|i| self.candidates[i].len())
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn n_worlds(&self) -> usize {
        self.n_worlds
    }

    pub fn base(&self) -> &Lexicon {
        &self.base
    }

    /// The matrix of the unrefined lexicon.
    pub fn base_matrix(&self) -> Result<Matrix, LexiconError> {
        self.render(&self.base)
    }

    /// Render the messages under any environment over this space's worlds.
    pub fn render<E: Environment + ?Sized>(&self, env: &E) -> Result<Matrix, LexiconError> {
        render_matrix(env, &self.messages, self.n_worlds)
    }

    /// All assignments in canonical order.
    pub fn assignments(&self) -> Assignments<'_> {
        Assignments {
            space: self,
            odometer: Odometer::new(self.radices()),
        }
    }

    /// Feasible matrices of every assignment, borrowing the space.
    pub fn matrices(&self) -> Matrices<&Self> {
        Matrices::new(self, Source::Full(Odometer::new(self.radices())))
    }

    /// Feasible matrices of every assignment, owning the space.
    pub fn into_matrices(self) -> Matrices<Self> {
        let source = Source::Full(Odometer::new(self.radices()));
        Matrices::new(self, source)
    }

    /// Feasible matrices of up to `count` distinct random assignments.
    pub fn sample(&self, count: usize, seed: u64) -> Matrices<&Self> {
        let source = Source::Sample(Sampler::new(self.radices(), count, seed));
        Matrices::new(self, source)
    }

    /// Walk the space as `enumeration` says.
    pub fn stream(&self, enumeration: &Enumeration) -> Matrices<&Self> {
        match *enumeration {
            Enumeration::Full => self.matrices(),
            Enumeration::Sample { count, seed } => self.sample(count, seed),
        }
    }

    /// Owning version of [`LexiconSpace::stream`].
    pub fn into_stream(self, enumeration: &Enumeration) -> Matrices<Self> {
        let source = match *enumeration {
            Enumeration::Full => Source::Full(Odometer::new(self.radices())),
            Enumeration::Sample { count, seed } => {
                Source::Sample(Sampler::new(self.radices(), count, seed))
            }
        };
        Matrices::new(self, source)
    }

    fn radices(&self) -> Vec<usize> {
        self.candidates.iter().map(Vec::len).collect()
    }

    fn index_of(&self, word: &str) -> Option<usize> {
        self.words.binary_search_by(|w| w.as_str().cmp(word)).ok()
    }
}

/// Refinable words that no message reads; refining them only repeats matrices.
fn unread_words<'a>(
    messages: &Messages,
    refinements: &'a BTreeMap<String, Refinement>,
) -> Vec<&'a str> {
    let read: BTreeSet<&str> = messages.iter().flat_map(|m| m.formula.words()).collect();
    refinements
        .keys()
        .map(String::as_str)
        .filter(|word| !read.contains(word))
        .collect()
}

/// Build a lexicon space and stream its feasible matrices.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeMap;
/// use pragmatics_lexicon::{
///     build_lexicon_space, enumerate_worlds, Domain, Enumeration, Fragment, Messages, Refinement,
/// };
///
/// let domain = Domain::new(vec!["a".into()], vec!["s1".into(), "s2".into()]).unwrap();
/// let fragment = Fragment::new(domain, enumerate_worlds(&[0, 1, 2], 1, false)).unwrap();
/// let messages = Messages::new(
///     fragment.subject_predicate_messages(&["PlayerA"], &["scored", "aced"]),
/// );
/// let refinements = BTreeMap::from([("scored".to_string(), Refinement::Unconstrained)]);
///
/// let lexica = build_lexicon_space(
///     fragment.base_lexicon(),
///     &refinements,
///     messages,
///     fragment.worlds().len(),
///     &Enumeration::Full,
/// )
/// .unwrap();
/// assert_eq!(lexica.count(), 3);
/// ```
pub fn build_lexicon_space(
    base: Lexicon,
    refinements: &BTreeMap<String, Refinement>,
    messages: Messages,
    n_worlds: usize,
    enumeration: &Enumeration,
) -> Result<Matrices<LexiconSpace>, LexiconError> {
    Ok(LexiconSpace::new(base, refinements, messages, n_worlds)?.into_stream(enumeration))
}

/// One full assignment of denotations to words.
#[derive(Debug, Clone)]
pub struct Assignment<'a> {
    space: &'a LexiconSpace,
    choice: Vec<usize>,
}

impl Assignment<'_> {
    /// Index of the chosen candidate for each word, in word order.
    pub fn indices(&self) -> &[usize] {
        &self.choice
    }
}

impl Environment for Assignment<'_> {
    fn denotation(&self, word: &str) -> Option<&Denotation> {
        let i = self.space.index_of(word)?;
        self.space.candidates[i].get(self.choice[i])
    }

    fn n_entities(&self) -> usize {
        self.space.base.n_entities()
    }
}

/// Iterator over every assignment of a space.
pub struct Assignments<'a> {
    space: &'a LexiconSpace,
    odometer: Odometer,
}

impl<'a> Iterator for Assignments<'a> {
    type Item = Assignment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let choice = self.odometer.next()?;
        Some(Assignment {
            space: self.space,
            choice,
        })
    }
}

/// Mixed-radix counter; the last position turns fastest.
#[derive(Debug, Clone)]
struct Odometer {
    radices: Vec<usize>,
    current: Option<Vec<usize>>,
}

impl Odometer {
    fn new(radices: Vec<usize>) -> Self {
        let current = if radices.contains(&0) {
            None
        } else {
            Some(vec![0; radices.len()])
        };
        Self { radices, current }
    }
}

impl Iterator for Odometer {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.current.take()?;

        let mut succ = current.clone();
        let mut pos = succ.len();
        while pos > 0 {
            pos -= 1;
            succ[pos] += 1;
            if succ[pos] < self.radices[pos] {
                self.current = Some(succ);
                break;
            }
            succ[pos] = 0;
        }
        Some(current)
    }
}

/// Distinct index vectors drawn uniformly, one per call, capped at the number
/// that exist.
#[derive(Debug)]
struct Sampler {
    radices: Vec<usize>,
    rng: StdRng,
    seen: HashSet<Vec<usize>>,
    remaining: usize,
}

impl Sampler {
    fn new(radices: Vec<usize>, count: usize, seed: u64) -> Self {
        let total = radices
            .iter()
            .fold(1usize, |acc, &r| acc.saturating_mul(r));
        Self {
            radices,
            rng: StdRng::seed_from_u64(seed),
            seen: HashSet::new(),
            remaining: count.min(total),
        }
    }
}

impl Iterator for Sampler {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.remaining == 0 {
            return None;
        }
        loop {
            let choice: Vec<usize> = self
                .radices
                .iter()
                .map(|&r| self.rng.gen_range(0..r))
                .collect();
            if self.seen.insert(choice.clone()) {
                self.remaining -= 1;
                return Some(choice);
            }
        }
    }
}

enum Source {
    Full(Odometer),
    Sample(Sampler),
}

impl Iterator for Source {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        match self {
            Source::Full(odometer) => odometer.next(),
            Source::Sample(sampler) => sampler.next(),
        }
    }
}

/// Lazy stream of feasible lexicon matrices.
///
/// Generic over how the space is held so it can borrow
/// ([`LexiconSpace::matrices`]) or own it ([`LexiconSpace::into_matrices`]).
pub struct Matrices<S: Borrow<LexiconSpace>> {
    space: S,
    source: Source,
    yielded: usize,
    rejected: usize,
    done: bool,
}

impl<S: Borrow<LexiconSpace>> Matrices<S> {
    fn new(space: S, source: Source) -> Self {
        Self {
            space,
            source,
            yielded: 0,
            rejected: 0,
            done: false,
        }
    }

    /// Feasible matrices produced so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    /// Infeasible matrices skipped so far.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn space(&self) -> &LexiconSpace {
        self.space.borrow()
    }
}

impl<S: Borrow<LexiconSpace>> Iterator for Matrices<S> {
    type Item = Result<Matrix, LexiconError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let space = self.space.borrow();
        loop {
            let Some(choice) = self.source.next() else {
                self.done = true;
                debug!(
                    feasible = self.yielded,
                    rejected = self.rejected,
                    "lexicon space exhausted"
                );
                return None;
            };

            let assignment = Assignment { space, choice };
            let matrix = match space.render(&assignment) {
                Ok(matrix) => matrix,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };

            if filter_feasible(&matrix) {
                self.yielded += 1;
                return Some(Ok(matrix));
            }
            self.rejected += 1;
            trace!(assignment = ?assignment.indices(), "rejected infeasible lexicon");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{enumerate_worlds, Domain, EntitySet};
    use crate::fragment::Fragment;
    use crate::semantics::{Determiner, Quantifier};

    // Players a, b; one shot; worlds NN, NS, SS.
    fn two_players() -> Fragment {
        let domain = Domain::new(vec!["a".into(), "b".into()], vec!["s1".into()]).unwrap();
        Fragment::new(domain, enumerate_worlds(&[0, 1], 2, true)).unwrap()
    }

    fn name_space() -> LexiconSpace {
        let fragment = two_players();
        let messages = Messages::new(
            fragment.subject_predicate_messages(&["PlayerA", "PlayerB"], &["scored"]),
        );
        let refinements = BTreeMap::from([("PlayerA".to_string(), Refinement::Unconstrained)]);
        LexiconSpace::new(fragment.base_lexicon(), &refinements, messages, 3).unwrap()
    }

    #[test]
    fn test_odometer_order() {
        let all: Vec<Vec<usize>> = Odometer::new(vec![2, 3]).collect();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0], vec![0, 0]);
        assert_eq!(all[1], vec![0, 1]);
        assert_eq!(all[3], vec![1, 0]);
        assert_eq!(all[5], vec![1, 2]);
    }

    #[test]
    fn test_odometer_no_positions() {
        let all: Vec<Vec<usize>> = Odometer::new(Vec::new()).collect();
        assert_eq!(all, vec![Vec::<usize>::new()]);
        assert_eq!(Odometer::new(vec![2, 0]).count(), 0);
    }

    #[test]
    fn test_size_and_candidates() {
        let space = name_space();
        // PlayerA over {a, b}: scope sets {a}, {a,b}, so three refinements
        assert_eq!(space.candidate_count("PlayerA"), Some(3));
        assert_eq!(space.candidate_count("PlayerB"), Some(1));
        assert_eq!(space.size(), 3);
        assert_eq!(space.assignments().count(), 3);
    }

    #[test]
    fn test_feasibility_filter() {
        let space = name_space();
        let players = EntitySet::from_indices([0, 1]);
        let only_a = Denotation::Quantifier(Quantifier {
            domain: players,
            sets: [EntitySet::from_indices([0])].into_iter().collect(),
        });

        // Only the refinement PlayerA = {{a}} is dropped: player a never
        // scores alone in a non-decreasing world.
        let rejected: Vec<Assignment> = space
            .assignments()
            .filter(|a| !filter_feasible(&space.render(a).unwrap()))
            .collect();
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].denotation("PlayerA"), Some(&only_a));

        let quantifier = |sets: &[EntitySet]| {
            Denotation::Quantifier(Quantifier {
                domain: players,
                sets: sets.iter().copied().collect(),
            })
        };
        let kept: Vec<Denotation> = space
            .assignments()
            .filter(|a| filter_feasible(&space.render(a).unwrap()))
            .map(|a| a.denotation("PlayerA").cloned().unwrap())
            .collect();
        assert_eq!(
            kept,
            vec![
                quantifier(&[players]),
                quantifier(&[EntitySet::from_indices([0]), players]),
            ]
        );
        assert!(!kept.contains(&only_a));

        let mut matrices = space.matrices();
        let feasible: Vec<Matrix> = matrices.by_ref().map(Result::unwrap).collect();
        assert_eq!(matrices.rejected(), 1);
        // {{a, b}} and {{a}, {a, b}} both make PlayerA(scored) true in SS only
        let expected = Matrix::new(vec![
            vec![0.0, 0.0, 1.0],
            vec![0.0, 1.0, 1.0],
            vec![1.0, 1.0, 1.0],
        ])
        .unwrap();
        assert_eq!(feasible, vec![expected.clone(), expected]);
    }

    #[test]
    fn test_null_row_is_last_and_true() {
        let space = name_space();
        let base = space.base_matrix().unwrap();
        assert_eq!(base.shape(), (3, 3));
        assert_eq!(base.m[2], vec![1.0, 1.0, 1.0]);
        // PlayerA(scored) holds in SS only, PlayerB(scored) in NS and SS
        assert_eq!(base.m[0], vec![0.0, 0.0, 1.0]);
        assert_eq!(base.m[1], vec![0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_enumeration_is_deterministic() {
        let space = name_space();
        let first: Vec<Matrix> = space.matrices().map(Result::unwrap).collect();
        let second: Vec<Matrix> = space.matrices().map(Result::unwrap).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sampling_is_seeded_and_capped() {
        let space = name_space();
        let a: Vec<Matrix> = space.sample(10, 7).map(Result::unwrap).collect();
        let b: Vec<Matrix> = space.sample(10, 7).map(Result::unwrap).collect();
        assert_eq!(a, b);
        // Capped at the three assignments, one of which is infeasible
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_sampler_draws_distinct() {
        let drawn: Vec<Vec<usize>> = Sampler::new(vec![4, 4, 4], 20, 1).collect();
        assert_eq!(drawn.len(), 20);
        let unique: HashSet<_> = drawn.iter().collect();
        assert_eq!(unique.len(), 20);
    }

    #[test]
    fn test_sampler_covers_small_space() {
        let mut drawn: Vec<Vec<usize>> = Sampler::new(vec![2, 3], 100, 5).collect();
        drawn.sort();
        let all: Vec<Vec<usize>> = Odometer::new(vec![2, 3]).collect();
        assert_eq!(drawn, all);
    }

    #[test]
    fn test_sampler_is_lazy_for_huge_counts() {
        // 2^80 assignments; nothing may be sized from the count
        let mut sampler = Sampler::new(vec![1 << 20; 4], 1 << 42, 1);
        assert_eq!(sampler.remaining, 1 << 42);
        let first: Vec<Vec<usize>> = sampler.by_ref().take(5).collect();
        assert_eq!(first.len(), 5);
        assert_eq!(sampler.seen.len(), 5);
        assert_eq!(sampler.remaining, (1 << 42) - 5);
    }

    #[test]
    fn test_sample_with_huge_count_streams() {
        let space = name_space();
        let mut stream = space.sample(1 << 42, 1);
        assert!(stream.next().is_some());
        assert_eq!(stream.by_ref().count(), 1);
        assert_eq!(stream.rejected(), 1);
    }

    #[test]
    fn test_unknown_refinable_word() {
        let fragment = two_players();
        let refinements = BTreeMap::from([("PlayerZ".to_string(), Refinement::Unconstrained)]);
        let result = LexiconSpace::new(fragment.base_lexicon(), &refinements, Messages::new(vec![]), 3);
        assert!(matches!(result, Err(LexiconError::UnknownWord { .. })));
    }

    #[test]
    fn test_message_with_unknown_word() {
        let fragment = two_players();
        let messages = Messages::new(fragment.subject_predicate_messages(&["PlayerA"], &["dunked"]));
        let result = LexiconSpace::new(fragment.base_lexicon(), &BTreeMap::new(), messages, 3);
        assert!(matches!(result, Err(LexiconError::UnknownWord { word }) if word == "dunked"));
    }

    #[test]
    fn test_unread_refinable_words() {
        let fragment = two_players();
        let messages = Messages::new(
            fragment.double_quantifier_messages(&[Determiner::Every], &[Determiner::Some]),
        );
        let refinements = BTreeMap::from([
            ("some(shot)".to_string(), Refinement::Unconstrained),
            ("scored".to_string(), Refinement::Unconstrained),
            ("PlayerA".to_string(), Refinement::Unconstrained),
        ]);
        assert_eq!(unread_words(&messages, &refinements), vec!["PlayerA", "scored"]);
    }

    #[test]
    fn test_alternatives_space() {
        let fragment = two_players();
        let messages = Messages::new(
            fragment.double_quantifier_messages(&[Determiner::Some], &[Determiner::Some]),
        );
        let refinements = BTreeMap::from([(
            "some(player)".to_string(),
            Refinement::Alternatives(vec!["exactly_one(player)".into()]),
        )]);
        let space = LexiconSpace::new(fragment.base_lexicon(), &refinements, messages, 3).unwrap();
        let matrices: Vec<Matrix> = space.matrices().map(Result::unwrap).collect();
        assert_eq!(matrices.len(), 2);
        // some: NS, SS; exactly_one: NS only
        assert_eq!(matrices[0].m[0], vec![0.0, 1.0, 1.0]);
        assert_eq!(matrices[1].m[0], vec![0.0, 1.0, 0.0]);
    }
}
