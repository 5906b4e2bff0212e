use std::fmt;

use bson::Bson;
use shale_query::Collator;

use crate::context::{ApplyParams, ApplyResult};
use crate::error::UpdateError;

/// A single update operator bound to one field path.
///
/// Lifecycle: constructed empty, `init`-ed once from its operand, optionally
/// given a collator with `set_collator`, then applied to any number of
/// documents. `apply` takes `&self`, so one initialized node can serve many
/// documents (and threads) as long as nobody rebinds its collator meanwhile.
///
/// The collator is borrowed for `'c`; nodes never own it.
pub trait UpdateNode<'c>: fmt::Debug + Send + Sync {
    fn init(
        &mut self,
        operand: &Bson,
        collator: Option<&'c dyn Collator>,
    ) -> Result<(), UpdateError>;

    fn apply(&self, params: ApplyParams<'_>) -> Result<ApplyResult, UpdateError>;

    /// An independent copy; later `set_collator` calls on either side are not shared.
    fn clone_node(&self) -> Box<dyn UpdateNode<'c> + 'c>;

    /// Rebind the collator used for string comparisons.
    ///
    /// Must be called at most once per node.
    fn set_collator(&mut self, collator: Option<&'c dyn Collator>);

    fn operator_name(&self) -> &'static str;
}
