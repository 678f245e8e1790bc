//! Lexicon Spaces
//!
//! Run with: cargo run -p pragmatics-lexicon --example lexicon_space
//!
//! This example demonstrates:
//! - Worlds as tuples of shot counts
//! - The base lexicon of the basketball fragment
//! - Unconstrained vs neo-Gricean refinement of "some(player)"
//! - Streaming feasible matrices

use std::collections::BTreeMap;

use pragmatics_lexicon::{
    enumerate_worlds, Determiner, Domain, Environment, Fragment, LexiconSpace, Messages,
    Refinement,
};

fn main() {
    println!("=== Lexicon Spaces ===\n");

    let domain = Domain::new(
        vec!["a".into(), "b".into()],
        vec!["s1".into(), "s2".into()],
    )
    .unwrap();
    let fragment = Fragment::new(domain, enumerate_worlds(&[0, 1, 2], 2, true)).unwrap();
    println!("Worlds: {}", fragment.state_names().join(" "));

    let base = fragment.base_lexicon();
    println!("Base lexicon ({} words):", base.len());
    for (word, denotation) in base.iter() {
        println!("  {:<20} {:<10} {} atoms", word, denotation.kind(), denotation.atom_count());
    }
    println!();

    let messages = Messages::new(fragment.double_quantifier_messages(
        &[Determiner::Every, Determiner::Some, Determiner::ExactlyOne],
        &[Determiner::Some],
    ));

    let policies = [
        ("unconstrained", Refinement::Unconstrained),
        (
            "neo-Gricean",
            Refinement::Alternatives(vec!["exactly_one(player)".into()]),
        ),
    ];
    for (label, refinement) in policies {
        let refinements = BTreeMap::from([("some(player)".to_string(), refinement)]);
        let space = LexiconSpace::new(
            base.clone(),
            &refinements,
            messages.clone(),
            fragment.worlds().len(),
        )
        .unwrap();

        let mut stream = space.matrices();
        let feasible: Vec<_> = stream.by_ref().map(Result::unwrap).collect();
        println!(
            "{}: {} assignments, {} feasible, {} rejected",
            label,
            space.size(),
            feasible.len(),
            stream.rejected()
        );
        for (name, row) in messages.names().iter().zip(&feasible[feasible.len() - 1].m) {
            println!("  {:<40} {:?}", name, row);
        }
        println!();
    }

    let lookup = base.lookup("every(shot)").map(|d| d.atom_count());
    println!("every(shot) has {:?} atoms", lookup);
}
