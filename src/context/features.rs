use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::RequestContext;

/// Per-request feature flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    VideoCalling,
    CarePlans,
    Payments,
}

/// Computes a feature value the first time it is asked for
pub type FeatureEvaluator = Arc<dyn Fn(RequestContext) -> BoxFuture<'static, bool> + Send + Sync>;

pub(crate) enum FeatureSlot {
    Fixed(bool),
    Lazy {
        value: OnceCell<bool>,
        evaluate: FeatureEvaluator,
    },
}

impl FeatureSlot {
    pub(crate) fn lazy(evaluate: FeatureEvaluator) -> Self {
        FeatureSlot::Lazy {
            value: OnceCell::new(),
            evaluate,
        }
    }

    /// Concurrent callers wait on the same evaluation; the evaluator runs at
    /// most once per slot.
    pub(crate) async fn resolve(&self, ctx: &RequestContext) -> bool {
        match self {
            FeatureSlot::Fixed(enabled) => *enabled,
            FeatureSlot::Lazy { value, evaluate } => {
                *value.get_or_init(|| evaluate(ctx.clone())).await
            }
        }
    }
}

impl fmt::Debug for FeatureSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureSlot::Fixed(enabled) => f.debug_tuple("Fixed").field(enabled).finish(),
            FeatureSlot::Lazy { value, .. } => {
                f.debug_struct("Lazy").field("value", &value.get()).finish()
            }
        }
    }
}
