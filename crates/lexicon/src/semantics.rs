//! Typed model-theoretic semantics for the quantifier fragment.
//!
//! Every word denotes one of a closed set of extensional values:
//!
//! ```text
//! Noun        set of entities                     player, shot
//! Quantifier  set of scope sets over a domain     every(player), PlayerA
//! Predicate   set of (world, entity) pairs        scored, aced
//! Relation    set of (world, subject, object)     made
//! ```
//!
//! Each value is its own characteristic set, so "every strengthening of a
//! meaning" is simply "every non-empty subset of its atoms". Messages are
//! small formula trees evaluated against an explicit [`Environment`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::EntitySet;
use crate::error::LexiconError;

/// Quantificational determiners, as relations between a restrictor and a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Determiner {
    Every,
    Some,
    ExactlyOne,
    No,
}

impl Determiner {
    /// All determiners in a fixed order.
    pub const ALL: [Determiner; 4] = [
        Determiner::Every,
        Determiner::Some,
        Determiner::ExactlyOne,
        Determiner::No,
    ];

    /// Surface name used in message identifiers.
    pub fn name(&self) -> &'static str {
        match self {
            Determiner::Every => "every",
            Determiner::Some => "some",
            Determiner::ExactlyOne => "exactly_one",
            Determiner::No => "no",
        }
    }

    /// Truth of `det(restrictor)(scope)`.
    pub fn holds(&self, restrictor: &EntitySet, scope: &EntitySet) -> bool {
        let overlap = restrictor.intersection(scope).len();
        match self {
            Determiner::Every => restrictor.is_subset(scope),
            Determiner::Some => overlap > 0,
            Determiner::ExactlyOne => overlap == 1,
            Determiner::No => overlap == 0,
        }
    }
}

impl fmt::Display for Determiner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A generalized quantifier given by its characteristic set.
///
/// `Q(scope)` is true iff `scope ∩ domain` is one of `sets`. Every quantifier
/// of the fragment is conservative, so only the part of the scope inside the
/// domain matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quantifier {
    pub domain: EntitySet,
    pub sets: BTreeSet<EntitySet>,
}

impl Quantifier {
    /// Truth of the quantifier applied to a scope.
    pub fn holds(&self, scope: &EntitySet) -> bool {
        self.sets.contains(&scope.intersection(&self.domain))
    }
}

/// The denotation of a word.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Denotation {
    Noun(EntitySet),
    Quantifier(Quantifier),
    Predicate(BTreeSet<(usize, usize)>),
    Relation(BTreeSet<(usize, usize, usize)>),
}

impl Denotation {
    /// Name of the denotation kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Denotation::Noun(_) => "noun",
            Denotation::Quantifier(_) => "quantifier",
            Denotation::Predicate(_) => "predicate",
            Denotation::Relation(_) => "relation",
        }
    }

    /// Size of the characteristic set.
    pub fn atom_count(&self) -> usize {
        match self {
            Denotation::Noun(set) => set.len(),
            Denotation::Quantifier(q) => q.sets.len(),
            Denotation::Predicate(pairs) => pairs.len(),
            Denotation::Relation(triples) => triples.len(),
        }
    }
}

/// Anything that maps words to their current denotations.
///
/// Formulas never read global state: each evaluation is handed the
/// environment it should use, whether that is the base lexicon or one
/// refined assignment drawn from a lexicon space.
pub trait Environment {
    /// The denotation currently assigned to `word`.
    fn denotation(&self, word: &str) -> Option<&Denotation>;

    /// Number of entities in the domain (subjects range over all of them).
    fn n_entities(&self) -> usize;

    /// Look up a word, failing if it is missing.
    fn lookup(&self, word: &str) -> Result<&Denotation, LexiconError> {
        self.denotation(word)
            .ok_or_else(|| LexiconError::UnknownWord {
                word: word.to_string(),
            })
    }
}

/// A lexicon: words and their denotations, ordered by word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    n_entities: usize,
    entries: BTreeMap<String, Denotation>,
}

impl Lexicon {
    /// An empty lexicon over a domain of `n_entities` entities.
    pub fn new(n_entities: usize) -> Self {
        Self {
            n_entities,
            entries: BTreeMap::new(),
        }
    }

    /// Add or replace a word.
    pub fn insert(&mut self, word: impl Into<String>, denotation: Denotation) {
        self.entries.insert(word.into(), denotation);
    }

    /// Words in sorted order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in word order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Denotation)> {
        self.entries.iter().map(|(w, d)| (w.as_str(), d))
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the lexicon has no words.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Environment for Lexicon {
    fn denotation(&self, word: &str) -> Option<&Denotation> {
        self.entries.get(word)
    }

    fn n_entities(&self) -> usize {
        self.n_entities
    }
}

/// A quantified subject or object noun phrase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    /// A word denoting a quantifier: `PlayerA`, `some(player)`.
    Lexical(String),
    /// A fixed determiner applied to the current denotation of a noun.
    Det(Determiner, String),
}

impl Subject {
    /// A lexical quantifier phrase.
    pub fn word(word: impl Into<String>) -> Self {
        Subject::Lexical(word.into())
    }

    /// Truth of this noun phrase applied to a scope.
    pub fn holds<E: Environment + ?Sized>(
        &self,
        env: &E,
        scope: &EntitySet,
    ) -> Result<bool, LexiconError> {
        match self {
            Subject::Lexical(word) => match env.lookup(word)? {
                Denotation::Quantifier(q) => Ok(q.holds(scope)),
                other => Err(wrong_kind(word, "quantifier", other)),
            },
            Subject::Det(det, noun) => match env.lookup(noun)? {
                Denotation::Noun(restrictor) => Ok(det.holds(restrictor, scope)),
                other => Err(wrong_kind(noun, "noun", other)),
            },
        }
    }

    fn words(&self) -> Vec<&str> {
        match self {
            Subject::Lexical(word) => vec![word.as_str()],
            Subject::Det(_, noun) => vec![noun.as_str()],
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Lexical(word) => f.write_str(word),
            Subject::Det(det, noun) => write!(f, "{}({})", det, noun),
        }
    }
}

/// A verb phrase: an intransitive predicate or a verb with a quantified object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerbPhrase {
    Intransitive(String),
    Transitive { verb: String, object: Subject },
}

impl VerbPhrase {
    /// The set of entities satisfying this verb phrase in `world`.
    pub fn extension<E: Environment + ?Sized>(
        &self,
        env: &E,
        world: usize,
    ) -> Result<EntitySet, LexiconError> {
        match self {
            VerbPhrase::Intransitive(word) => match env.lookup(word)? {
                Denotation::Predicate(pairs) => Ok(EntitySet::from_indices(
                    pairs
                        .range((world, 0)..(world + 1, 0))
                        .map(|&(_, entity)| entity),
                )),
                other => Err(wrong_kind(word, "predicate", other)),
            },
            VerbPhrase::Transitive { verb, object } => {
                let triples = match env.lookup(verb)? {
                    Denotation::Relation(triples) => triples,
                    other => return Err(wrong_kind(verb, "relation", other)),
                };
                let mut scope = EntitySet::empty();
                for subject in 0..env.n_entities() {
                    let objects = EntitySet::from_indices(
                        triples
                            .range((world, subject, 0)..(world, subject + 1, 0))
                            .map(|&(_, _, object)| object),
                    );
                    if object.holds(env, &objects)? {
                        scope.insert(subject);
                    }
                }
                Ok(scope)
            }
        }
    }

    fn words(&self) -> Vec<&str> {
        match self {
            VerbPhrase::Intransitive(word) => vec![word.as_str()],
            VerbPhrase::Transitive { verb, object } => {
                let mut words = vec![verb.as_str()];
                words.extend(object.words());
                words
            }
        }
    }
}

impl fmt::Display for VerbPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerbPhrase::Intransitive(word) => f.write_str(word),
            VerbPhrase::Transitive { verb, object } => write!(f, "{}({})", verb, object),
        }
    }
}

/// The truth-conditional content of a message: `subject(predicate)`.
///
/// # Example
///
/// ```rust
/// use pragmatics_lexicon::{Determiner, Formula, Subject, VerbPhrase};
///
/// let f = Formula::new(
///     Subject::Det(Determiner::Every, "player".into()),
///     VerbPhrase::Transitive {
///         verb: "made".into(),
///         object: Subject::word("some(shot)"),
///     },
/// );
/// assert_eq!(f.to_string(), "every(player)(made(some(shot)))");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Formula {
    pub subject: Subject,
    pub predicate: VerbPhrase,
}

impl Formula {
    /// Create a formula.
    pub fn new(subject: Subject, predicate: VerbPhrase) -> Self {
        Self { subject, predicate }
    }

    /// Truth value in world `world` under `env`.
    pub fn holds<E: Environment + ?Sized>(
        &self,
        env: &E,
        world: usize,
    ) -> Result<bool, LexiconError> {
        let scope = self.predicate.extension(env, world)?;
        self.subject.holds(env, &scope)
    }

    /// Words this formula reads from the environment.
    pub fn words(&self) -> Vec<&str> {
        let mut words = self.subject.words();
        words.extend(self.predicate.words());
        words
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.subject, self.predicate)
    }
}

fn wrong_kind(word: &str, expected: &'static str, got: &Denotation) -> LexiconError {
    LexiconError::WrongKind {
        word: word.to_string(),
        expected,
        got: got.kind(),
    }
}
