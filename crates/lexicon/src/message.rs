//! Messages: named formulas with costs, plus the designated null message.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::semantics::Formula;

/// Name of the null message, true in every state.
pub const NULL: &str = "NULL";

/// A candidate utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub formula: Formula,
    /// Production cost; nonzero only for marked forms.
    #[serde(default)]
    pub cost: f64,
}

impl Message {
    /// An unmarked message (cost 0).
    pub fn new(formula: Formula) -> Self {
        Self { formula, cost: 0.0 }
    }

    /// Set the production cost.
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    /// Identifier of this message: its formula written out.
    pub fn name(&self) -> String {
        self.formula.to_string()
    }
}

/// An ordered message set: sorted by name, duplicates removed, `NULL` last.
///
/// `NULL` is implicit: it has no formula and is never stored, but it is
/// counted by [`Messages::len`] and appears last in [`Messages::names`].
#[derive(Debug, Clone, PartialEq)]
pub struct Messages {
    items: Vec<(String, Message)>,
}

impl Messages {
    /// Order and deduplicate `messages`.
    ///
    /// The first message with a given name wins. A message that renders as
    /// `NULL` is dropped in favour of the built-in one.
    pub fn new<I: IntoIterator<Item = Message>>(messages: I) -> Self {
        let mut by_name: BTreeMap<String, Message> = BTreeMap::new();
        for message in messages {
            let name = message.name();
            if name == NULL {
                continue;
            }
            by_name.entry(name).or_insert(message);
        }
        Self {
            items: by_name.into_iter().collect(),
        }
    }

    /// Number of messages including `NULL`.
    pub fn len(&self) -> usize {
        self.items.len() + 1
    }

    /// Always false: `NULL` is always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of messages with a formula (everything but `NULL`).
    pub fn n_formulas(&self) -> usize {
        self.items.len()
    }

    /// Messages with a formula, in order.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.items.iter().map(|(_, m)| m)
    }

    /// Row names, `NULL` last.
    pub fn names(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|(name, _)| name.clone())
            .chain(std::iter::once(NULL.to_string()))
            .collect()
    }

    /// Cost vector aligned with [`Messages::names`].
    pub fn costs(&self, null_cost: f64) -> Vec<f64> {
        self.items
            .iter()
            .map(|(_, m)| m.cost)
            .chain(std::iter::once(null_cost))
            .collect()
    }
}
