//! The basketball fragment: players, shots, and who made what.
//!
//! Only `made` varies from world to world; `scored`, `aced` and `missed` are
//! derived from it. Nouns, determiner phrases and proper names have the same
//! denotation everywhere.

use std::collections::BTreeSet;

use crate::domain::{Domain, EntitySet, World};
use crate::error::LexiconError;
use crate::message::Message;
use crate::semantics::{Denotation, Determiner, Formula, Lexicon, Quantifier, Subject, VerbPhrase};

/// Noun for the players.
pub const PLAYER: &str = "player";
/// Noun for the shots.
pub const SHOT: &str = "shot";

/// Word naming a determiner phrase, e.g. `some(player)`.
pub fn quantifier_word(det: Determiner, noun: &str) -> String {
    format!("{}({})", det, noun)
}

/// Word naming the proper name of a player, e.g. `PlayerA` for player `a`.
pub fn proper_name(player: &str) -> String {
    format!("Player{}", player.to_uppercase())
}

/// A domain together with the ordered worlds messages are evaluated in.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    domain: Domain,
    worlds: Vec<World>,
}

impl Fragment {
    /// Create a fragment.
    ///
    /// # Errors
    ///
    /// Every world must give one count per player, none above the number of
    /// shots, and there must be at least one world.
    pub fn new(domain: Domain, worlds: Vec<World>) -> Result<Self, LexiconError> {
        if worlds.is_empty() {
            return Err(LexiconError::NoWorlds);
        }
        let n_players = domain.players().len();
        let n_shots = domain.shots().len();
        for world in &worlds {
            if world.len() != n_players {
                return Err(LexiconError::InvalidWorld {
                    world: world.name(),
                    reason: format!("expected {} shot counts, got {}", n_players, world.len()),
                });
            }
            if let Some(&count) = world.0.iter().find(|&&c| c as usize > n_shots) {
                return Err(LexiconError::InvalidWorld {
                    world: world.name(),
                    reason: format!("count {} exceeds {} shots", count, n_shots),
                });
            }
        }
        Ok(Self { domain, worlds })
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn worlds(&self) -> &[World] {
        &self.worlds
    }

    /// Column names, one per world.
    pub fn state_names(&self) -> Vec<String> {
        self.worlds.iter().map(World::name).collect()
    }

    /// The unrefined lexicon of the fragment.
    pub fn base_lexicon(&self) -> Lexicon {
        let domain = &self.domain;
        let players = domain.player_set();
        let shots = domain.shot_set();
        let n_shots = domain.shots().len();

        let mut lex = Lexicon::new(domain.n_entities());
        lex.insert(PLAYER, Denotation::Noun(players));
        lex.insert(SHOT, Denotation::Noun(shots));

        for (noun, restrictor) in [(PLAYER, players), (SHOT, shots)] {
            for det in Determiner::ALL {
                let q = characteristic_quantifier(restrictor, |scope| det.holds(&restrictor, scope));
                lex.insert(quantifier_word(det, noun), Denotation::Quantifier(q));
            }
        }

        for (i, name) in domain.players().iter().enumerate() {
            let entity = domain.player(i);
            let q = characteristic_quantifier(players, |scope| scope.contains(entity));
            lex.insert(proper_name(name), Denotation::Quantifier(q));
        }

        let mut scored = BTreeSet::new();
        let mut aced = BTreeSet::new();
        let mut missed = BTreeSet::new();
        let mut made = BTreeSet::new();
        for (w, world) in self.worlds.iter().enumerate() {
            for i in 0..domain.players().len() {
                let player = domain.player(i);
                let count = world.count(i);
                if count >= 1 {
                    scored.insert((w, player));
                }
                if count == n_shots {
                    aced.insert((w, player));
                } else {
                    missed.insert((w, player));
                }
                for j in 0..count {
                    made.insert((w, player, domain.shot(j)));
                }
            }
        }
        lex.insert("scored", Denotation::Predicate(scored));
        lex.insert("aced", Denotation::Predicate(aced));
        lex.insert("missed", Denotation::Predicate(missed));
        lex.insert("made", Denotation::Relation(made));

        lex
    }

    /// `subj(player)(made(obj(shot)))` for every pair of determiners.
    pub fn double_quantifier_messages(
        &self,
        subject_dets: &[Determiner],
        object_dets: &[Determiner],
    ) -> Vec<Message> {
        let mut messages = Vec::with_capacity(subject_dets.len() * object_dets.len());
        for &subj in subject_dets {
            for &obj in object_dets {
                messages.push(Message::new(Formula::new(
                    Subject::word(quantifier_word(subj, PLAYER)),
                    VerbPhrase::Transitive {
                        verb: "made".into(),
                        object: Subject::word(quantifier_word(obj, SHOT)),
                    },
                )));
            }
        }
        messages
    }

    /// `subject(predicate)` for every pair, e.g. `PlayerA(scored)`.
    pub fn subject_predicate_messages(&self, subjects: &[&str], predicates: &[&str]) -> Vec<Message> {
        subjects
            .iter()
            .flat_map(|&subject| {
                predicates.iter().map(move |&predicate| {
                    Message::new(Formula::new(
                        Subject::word(subject),
                        VerbPhrase::Intransitive(predicate.into()),
                    ))
                })
            })
            .collect()
    }
}

/// The quantifier over `domain` true of exactly the scopes satisfying `test`.
///
/// Walks all `2^|domain|` scopes; [`Domain::new`] bounds `|domain|`.
fn characteristic_quantifier<F>(domain: EntitySet, test: F) -> Quantifier
where
    F: Fn(&EntitySet) -> bool,
{
    let members: Vec<usize> = domain.iter().collect();
    let sets = (0..1u64 << members.len())
        .map(|mask| {
            EntitySet::from_indices(
                members
                    .iter()
                    .enumerate()
                    .filter(|&(bit, _)| (mask >> bit) & 1 == 1)
                    .map(|(_, &entity)| entity),
            )
        })
        .filter(|scope| test(scope))
        .collect();
    Quantifier { domain, sets }
}
