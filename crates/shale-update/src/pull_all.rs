use bson::Bson;
use shale_query::{Collator, values_equal};

use crate::context::{ApplyParams, ApplyResult};
use crate::culling::cull_array;
use crate::error::UpdateError;
use crate::node::UpdateNode;

/// `$pullAll`: removes every array element equal to one of the listed values.
///
/// Regex operands are compared as values, not evaluated as patterns.
#[derive(Debug, Clone, Default)]
pub struct PullAllNode<'c> {
    values: Option<Vec<Bson>>,
    collator: Option<&'c dyn Collator>,
    collator_set: bool,
}

impl<'c> PullAllNode<'c> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'c> UpdateNode<'c> for PullAllNode<'c> {
    fn init(
        &mut self,
        operand: &Bson,
        collator: Option<&'c dyn Collator>,
    ) -> Result<(), UpdateError> {
        let Bson::Array(values) = operand else {
            return Err(UpdateError::BadValue(format!(
                "$pullAll requires an array argument but was given a {:?}",
                operand.element_type()
            )));
        };
        self.values = Some(values.clone());
        self.collator = collator;
        Ok(())
    }

    fn apply(&self, params: ApplyParams<'_>) -> Result<ApplyResult, UpdateError> {
        let values = self
            .values
            .as_ref()
            .ok_or(UpdateError::Uninitialized(self.operator_name()))?;
        cull_array(self.operator_name(), params, |element| {
            values
                .iter()
                .any(|value| values_equal(element, value, self.collator))
        })
    }

    fn clone_node(&self) -> Box<dyn UpdateNode<'c> + 'c> {
        Box::new(self.clone())
    }

    fn set_collator(&mut self, collator: Option<&'c dyn Collator>) {
        debug_assert!(!self.collator_set, "collator already set on $pullAll node");
        self.collator_set = true;
        self.collator = collator;
    }

    fn operator_name(&self) -> &'static str {
        "$pullAll"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use bson::bson;

    #[test]
    fn non_array_operand_fails_init() {
        let mut node = PullAllNode::new();
        let err = node.init(&bson!(1), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadValue);
        assert!(err.to_string().starts_with("$pullAll requires an array argument"));
    }

    #[test]
    fn empty_list_is_accepted() {
        let mut node = PullAllNode::new();
        assert!(node.init(&bson!([]), None).is_ok());
    }
}
