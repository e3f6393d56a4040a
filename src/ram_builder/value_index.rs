//! Per-clause index of value definition points.
//!
//! During indexing, every variable occurrence, record constructor, and
//! generator in a clause is assigned a `(level, column)` coordinate. The
//! index is populated once by the indexing passes and then read-only
//! while the operation tree is emitted; it lives for exactly one
//! lowering call.

use crate::ast::{Aggregator, IntrinsicFunctor, RecordInit};
use std::collections::{BTreeMap, BTreeSet};

/// Coordinate of a value: the column of the tuple introduced at a
/// nesting level. Ordered by level first, so the first element of an
/// ordered reference set is the earliest binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub level: usize,
    pub column: usize,
}

impl Location {
    pub fn new(level: usize, column: usize) -> Self {
        Location { level, column }
    }
}

/// A node whose evaluation generates a tuple at a reserved level
#[derive(Debug, Clone, Copy)]
pub enum GeneratorSource<'a> {
    Aggregator(&'a Aggregator),
    Functor(&'a IntrinsicFunctor),
}

impl GeneratorSource<'_> {
    /// Address identity within the borrowed clause
    fn is_same_node(&self, other: &GeneratorSource<'_>) -> bool {
        match (self, other) {
            (GeneratorSource::Aggregator(a), GeneratorSource::Aggregator(b)) => {
                std::ptr::eq(*a, *b)
            }
            (GeneratorSource::Functor(a), GeneratorSource::Functor(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }
}

/// Definition points for every variable, record, and generator of one
/// clause
#[derive(Debug, Default)]
pub struct ValueIndex<'a> {
    var_refs: BTreeMap<String, BTreeSet<Location>>,
    record_defs: Vec<(&'a RecordInit, Location)>,
    generator_locs: Vec<(GeneratorSource<'a>, Location)>,
    generator_levels: BTreeSet<usize>,
}

impl<'a> ValueIndex<'a> {
    pub fn new() -> Self {
        ValueIndex::default()
    }

    /// Record one syntactic occurrence of a variable
    pub fn add_var_reference(&mut self, name: &str, location: Location) {
        self.var_refs
            .entry(name.to_string())
            .or_default()
            .insert(location);
    }

    /// Record the coordinate at which a record constructor resides
    pub fn set_record_definition(&mut self, record: &'a RecordInit, location: Location) {
        self.record_defs.push((record, location));
    }

    /// Record the coordinate of a generator's first output column
    pub fn set_generator_loc(&mut self, generator: GeneratorSource<'a>, location: Location) {
        self.generator_levels.insert(location.level);
        self.generator_locs.push((generator, location));
    }

    /// All variables with their ordered reference sets
    pub fn variable_references(
        &self,
    ) -> impl Iterator<Item = (&String, &BTreeSet<Location>)> {
        self.var_refs.iter()
    }

    /// The ordered reference set of one variable
    pub fn references_of(&self, name: &str) -> Option<&BTreeSet<Location>> {
        self.var_refs.get(name)
    }

    /// The earliest recorded reference of a variable: its binding point
    pub fn first_reference(&self, name: &str) -> Option<Location> {
        self.var_refs
            .get(name)
            .and_then(|refs| refs.iter().next())
            .copied()
    }

    /// The definition point of a record constructor, by node identity
    pub fn record_definition(&self, record: &RecordInit) -> Option<Location> {
        self.record_defs
            .iter()
            .find(|(known, _)| std::ptr::eq(*known, record))
            .map(|(_, location)| *location)
    }

    /// The output coordinate of a generator, by node identity
    pub fn generator_loc(&self, generator: GeneratorSource<'_>) -> Option<Location> {
        self.generator_locs
            .iter()
            .find(|(known, _)| known.is_same_node(&generator))
            .map(|(_, location)| *location)
    }

    /// Shorthand for [`Self::generator_loc`] on an aggregator node
    pub fn aggregator_loc(&self, aggregator: &Aggregator) -> Option<Location> {
        self.generator_loc(GeneratorSource::Aggregator(aggregator))
    }

    /// Shorthand for [`Self::generator_loc`] on a functor node
    pub fn functor_loc(&self, functor: &IntrinsicFunctor) -> Option<Location> {
        self.generator_loc(GeneratorSource::Functor(functor))
    }

    /// True if the level was reserved by a generator. Generator
    /// coordinates are values, not binding sites, so the
    /// variable-binding pass must not equate through them.
    pub fn is_generator_level(&self, level: usize) -> bool {
        self.generator_levels.contains(&level)
    }
}
