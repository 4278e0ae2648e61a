//! Strategy trait and the ordered registry that drives dispatch.
//!
//! Strategies are registered with an integer priority, lower runs
//! first. For one operation every compatible strategy is tried in
//! order until one produces output that passes syntax validation; a
//! failed attempt leaves no trace in the result content.

use codepatch_ast::{validate_syntax, Validation};
use tracing::{debug, warn};

use crate::error::EditError;
use crate::model::{PatchOperation, PatchResult};
use crate::strategies::{
    BraceElementStrategy, ClassReplaceStrategy, FileActionStrategy, FunctionReplaceStrategy,
    MethodReplaceStrategy, SmartClassStrategy, WholeFileStrategy,
};

/// A single way of applying an operation to file content.
pub trait Strategy {
    /// Stable name, recorded on operations and results.
    fn name(&self) -> &'static str;

    /// Whether this strategy can attempt the operation at all.
    fn handles(&self, op: &PatchOperation) -> bool;

    /// Rewrite `result.current_content` according to `op`.
    fn apply(&self, op: &PatchOperation, result: &mut PatchResult) -> Result<(), EditError>;
}

/// Priority-ordered collection of strategies.
///
/// Built explicitly and passed to the pipeline; [`Default`] installs
/// the standard set.
pub struct StrategyRegistry {
    entries: Vec<(i32, Box<dyn Strategy>)>,
}

impl StrategyRegistry {
    /// An empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a strategy. Lower priorities run first; equal
    /// priorities keep registration order.
    pub fn register(&mut self, priority: i32, strategy: Box<dyn Strategy>) {
        self.entries.push((priority, strategy));
        self.entries.sort_by_key(|(p, _)| *p);
    }

    /// Compatible strategies for `op`, in run order.
    #[must_use]
    pub fn strategies_for(&self, op: &PatchOperation) -> Vec<&dyn Strategy> {
        self.entries
            .iter()
            .filter(|(_, s)| s.handles(op))
            .map(|(_, s)| s.as_ref())
            .collect()
    }

    /// Run `op` against the compatible strategies until one sticks.
    ///
    /// Each attempt starts from the same snapshot of
    /// `current_content`; a strategy that errors or produces
    /// syntactically invalid output is rolled back before the next one
    /// runs. Returns whether any strategy succeeded.
    pub fn process_operation(&self, op: &mut PatchOperation, result: &mut PatchResult) -> bool {
        let compatible = self.strategies_for(op);
        if compatible.is_empty() {
            let message = format!("no strategy handles {}", op.path.display());
            op.add_error(message.clone());
            result.add_error(message);
            return false;
        }

        let snapshot = result.current_content.clone();
        for strategy in compatible {
            result.current_content.clone_from(&snapshot);
            match strategy.apply(op, result) {
                Ok(()) => {
                    let verdict = op.lang.map_or(Validation::Unchecked, |lang| {
                        validate_syntax(lang, &result.current_content)
                    });
                    if let Validation::Invalid(reason) = verdict {
                        warn!(strategy = strategy.name(), %reason, "rejected invalid output");
                        op.add_error(format!(
                            "{} produced invalid syntax: {reason}",
                            strategy.name()
                        ));
                        continue;
                    }
                    debug!(strategy = strategy.name(), path = %op.path.display(), "applied");
                    op.record_strategy(strategy.name());
                    result.applied_strategies.push(strategy.name().to_string());
                    return true;
                }
                Err(err) => {
                    debug!(strategy = strategy.name(), %err, "strategy failed");
                    op.add_error(format!("{}: {err}", strategy.name()));
                }
            }
        }

        result.current_content = snapshot;
        let message = format!("all compatible strategies failed for {}", op.path.display());
        op.add_error(message.clone());
        result.add_error(message);
        false
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(4, Box::new(FunctionReplaceStrategy));
        registry.register(5, Box::new(MethodReplaceStrategy));
        registry.register(5, Box::new(SmartClassStrategy::default()));
        registry.register(10, Box::new(ClassReplaceStrategy));
        registry.register(10, Box::new(FileActionStrategy));
        registry.register(20, Box::new(BraceElementStrategy));
        registry.register(50, Box::new(WholeFileStrategy));
        registry
    }
}
