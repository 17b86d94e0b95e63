use indexmap::IndexSet;

use crate::ir::{Descriptor, TypeTag};

/// Distinct string values seen for one field, in first-seen order.
/// Membership only; repeats are not counted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValueSet {
    values: IndexSet<String>,
}

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(value: &str) -> Self {
        let mut out = Self::new();
        out.observe(value);
        out
    }

    pub fn observe(&mut self, value: &str) {
        if !self.values.contains(value) {
            self.values.insert(value.to_owned());
        }
    }

    /// Values already present keep their position.
    pub fn union(&mut self, other: ValueSet) {
        self.values.extend(other.values);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Exactly `LITERAL_UNION_ARITY` values → literal union in set order;
    /// any other count → plain `string`.
    pub fn resolve(&self) -> Descriptor {
        if self.values.len() == super::LITERAL_UNION_ARITY {
            Descriptor::Union(self.values.iter().cloned().collect())
        } else {
            Descriptor::Primitive(TypeTag::String)
        }
    }
}
