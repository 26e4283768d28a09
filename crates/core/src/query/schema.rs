use crate::storage::Order;

/// How a non-key filter parameter becomes a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Exact value comparison.
    Equals,
    /// Numeric upper bound (`attribute <= value`).
    AtMost,
    /// Stock flag: a truthy value requires `attribute > 0`, a falsy one is unconstrained.
    InStock,
    /// Attribute value is a member of the provided set.
    OneOf,
    /// Case-normalised substring match.
    Search,
}

/// A filter parameter accepted by an entity, and the attribute it constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    pub param: &'static str,
    pub attribute: &'static str,
    pub kind: FilterKind,
}

impl FilterField {
    pub const fn new(param: &'static str, attribute: &'static str, kind: FilterKind) -> Self {
        Self {
            param,
            attribute,
            kind,
        }
    }
}

/// Key layout and filterable fields of a queryable entity.
///
/// Key components are filtered by their attribute name; all other accepted
/// parameters are listed in `filters`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    /// Stable name, part of every cursor scope.
    pub name: &'static str,
    pub partition_key: &'static str,
    pub sort_key: Option<&'static str>,
    /// Secondary index carrying this key layout, if not the base table.
    pub index: Option<&'static str>,
    pub order: Order,
    pub filters: &'static [FilterField],
}

impl EntitySchema {
    pub fn is_key(&self, param: &str) -> bool {
        param == self.partition_key || self.sort_key == Some(param)
    }

    pub fn filter(&self, param: &str) -> Option<&FilterField> {
        self.filters.iter().find(|f| f.param == param)
    }

    /// Parameter names this schema accepts.
    pub fn accepts(&self, param: &str) -> bool {
        self.is_key(param) || self.filter(param).is_some()
    }
}
