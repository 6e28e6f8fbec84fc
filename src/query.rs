//! Query Module
//!
//! Composable filters over the engine's in-memory record list.
//!
//! ```ignore
//! let blue = engine
//!     .select()
//!     .filter(|item| item.colour == "Blue")
//!     .filter(|item| item.quantity > 100)
//!     .limit(5);
//! ```
//!
//! Nothing runs until a terminal method (`all`, `first`, `limit`) is called.

use crate::engine::Engine;
use crate::record::Item;

/// A filter accepting or rejecting one record
pub trait Predicate {
    fn accepts(&self, item: &Item) -> bool;
}

impl<F> Predicate for F
where
    F: Fn(&Item) -> bool,
{
    fn accepts(&self, item: &Item) -> bool {
        self(item)
    }
}

/// Bound on the number of results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Unbounded,
    AtMost(usize),
}

/// Ordered conjunction of predicates, executed against an engine
pub struct QueryBuilder<'a> {
    engine: &'a Engine,
    predicates: Vec<Box<dyn Predicate + 'a>>,
}

impl<'a> QueryBuilder<'a> {
    pub(crate) fn new(engine: &'a Engine) -> Self {
        Self {
            engine,
            predicates: Vec::new(),
        }
    }

    /// Add a closure filter; a record must satisfy every filter
    pub fn filter<F>(self, f: F) -> Self
    where
        F: Fn(&Item) -> bool + 'a,
    {
        self.filter_with(f)
    }

    /// Add any predicate object
    pub fn filter_with(mut self, predicate: impl Predicate + 'a) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// Every matching record
    pub fn all(self) -> Vec<Item> {
        self.execute(Limit::Unbounded)
    }

    /// The first matching record
    pub fn first(self) -> Option<Item> {
        self.execute(Limit::AtMost(1)).into_iter().next()
    }

    /// At most `max` matching records
    pub fn limit(self, max: usize) -> Vec<Item> {
        self.execute(Limit::AtMost(max))
    }

    /// Scan in insertion order, stopping once the limit is reached
    pub fn execute(&self, limit: Limit) -> Vec<Item> {
        let max = match limit {
            Limit::Unbounded => usize::MAX,
            Limit::AtMost(max) => max,
        };

        self.engine
            .items()
            .iter()
            .filter(|item| self.predicates.iter().all(|p| p.accepts(item)))
            .take(max)
            .cloned()
            .collect()
    }
}
