use hateoas_types::{HateoasError, HateoasResult, Link, LinkSet};

/// Anything that owns a HAL link set.
pub trait Relational {
    fn links(&self) -> &LinkSet;

    /// Returns the link for `relation` or [`HateoasError::MissingRelation`].
    fn relation_link(&self, relation: &str) -> HateoasResult<&Link> {
        self.links()
            .get(relation)
            .ok_or_else(|| HateoasError::MissingRelation(relation.to_string()))
    }

    fn has_relation(&self, relation: &str) -> bool {
        self.links().contains(relation)
    }
}
