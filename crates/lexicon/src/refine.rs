//! Refinement: the candidate meanings a word may take under lexical uncertainty.

use serde::{Deserialize, Serialize};

use crate::domain::EntitySet;
use crate::error::LexiconError;
use crate::semantics::{Denotation, Environment, Quantifier};

/// Largest characteristic set whose powerset will be enumerated (2^16 - 1 refinements).
pub const MAX_REFINEMENT_ATOMS: usize = 16;

/// How a refinable word may be strengthened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Refinement {
    /// Every non-empty subset of the word's characteristic set.
    Unconstrained,
    /// The word's own meaning, or the meaning of one of the listed words
    /// (e.g. `some(player)` may mean `exactly_one(player)`).
    Alternatives(Vec<String>),
}

/// All subsets of `items` with at least `min_size` members.
///
/// Ordered by increasing size, then lexicographically by position within
/// each size, so the enumeration is canonical for a given item order.
///
/// # Example
///
/// ```rust
/// use pragmatics_lexicon::powerset;
///
/// let subsets = powerset(&['a', 'b', 'c'], 1);
/// assert_eq!(subsets.len(), 7);
/// assert_eq!(subsets[0], vec!['a']);
/// assert_eq!(subsets[3], vec!['a', 'b']);
/// assert_eq!(subsets[6], vec!['a', 'b', 'c']);
/// ```
pub fn powerset<T: Clone>(items: &[T], min_size: usize) -> Vec<Vec<T>> {
    let mut result = Vec::new();
    for size in min_size..=items.len() {
        combinations(items.len(), size, |indices| {
            result.push(indices.iter().map(|&i| items[i].clone()).collect());
        });
    }
    result
}

/// Call `visit` with every `size`-combination of `0..n` in lexicographic order.
fn combinations<F>(n: usize, size: usize, mut visit: F)
where
    F: FnMut(&[usize]),
{
    if size > n {
        return;
    }
    let mut indices: Vec<usize> = (0..size).collect();
    loop {
        visit(&indices);

        // Rightmost position that can still move right.
        let Some(pos) = (0..size).rev().find(|&i| indices[i] != i + n - size) else {
            return;
        };
        indices[pos] += 1;
        for i in pos + 1..size {
            indices[i] = indices[i - 1] + 1;
        }
    }
}

/// The candidate denotations of one word.
///
/// A word with no refinement keeps its single base denotation. An
/// unconstrained refinable word yields one candidate per non-empty subset of
/// its characteristic set, in [`powerset`] order. Alternatives yield the base
/// meaning followed by each alternative's base meaning, without duplicates.
///
/// # Errors
///
/// Fails if the word (or an alternative) is unknown, an alternative has a
/// different kind of denotation, or the characteristic set is empty or larger
/// than [`MAX_REFINEMENT_ATOMS`].
pub fn enumerate_denotations<E: Environment + ?Sized>(
    base: &E,
    word: &str,
    refinement: Option<&Refinement>,
) -> Result<Vec<Denotation>, LexiconError> {
    let denotation = base.lookup(word)?;

    match refinement {
        None => Ok(vec![denotation.clone()]),
        Some(Refinement::Unconstrained) => refine(word, denotation),
        Some(Refinement::Alternatives(alternatives)) => {
            let mut candidates = vec![denotation.clone()];
            for alternative in alternatives {
                let alt = base.lookup(alternative)?;
                if alt.kind() != denotation.kind() {
                    return Err(LexiconError::WrongKind {
                        word: alternative.clone(),
                        expected: denotation.kind(),
                        got: alt.kind(),
                    });
                }
                if !candidates.contains(alt) {
                    candidates.push(alt.clone());
                }
            }
            Ok(candidates)
        }
    }
}

fn refine(word: &str, denotation: &Denotation) -> Result<Vec<Denotation>, LexiconError> {
    let atoms = denotation.atom_count();
    if atoms == 0 {
        return Err(LexiconError::EmptyRefinement {
            word: word.to_string(),
        });
    }
    if atoms > MAX_REFINEMENT_ATOMS {
        return Err(LexiconError::RefinementTooLarge {
            word: word.to_string(),
            atoms,
            max: MAX_REFINEMENT_ATOMS,
        });
    }

    let refined = match denotation {
        Denotation::Noun(set) => {
            let members: Vec<usize> = set.iter().collect();
            powerset(&members, 1)
                .into_iter()
                .map(|subset| Denotation::Noun(EntitySet::from_indices(subset)))
                .collect()
        }
        Denotation::Quantifier(q) => {
            let sets: Vec<EntitySet> = q.sets.iter().copied().collect();
            powerset(&sets, 1)
                .into_iter()
                .map(|subset| {
                    Denotation::Quantifier(Quantifier {
                        domain: q.domain,
                        sets: subset.into_iter().collect(),
                    })
                })
                .collect()
        }
        Denotation::Predicate(pairs) => {
            let pairs: Vec<(usize, usize)> = pairs.iter().copied().collect();
            powerset(&pairs, 1)
                .into_iter()
                .map(|subset| Denotation::Predicate(subset.into_iter().collect()))
                .collect()
        }
        Denotation::Relation(triples) => {
            let triples: Vec<(usize, usize, usize)> = triples.iter().copied().collect();
            powerset(&triples, 1)
                .into_iter()
                .map(|subset| Denotation::Relation(subset.into_iter().collect()))
                .collect()
        }
    };
    Ok(refined)
}
