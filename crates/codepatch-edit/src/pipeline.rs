//! Sequential processing of operations, grouped per file.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::model::{OperationKind, PatchOperation, PatchResult, Target};
use crate::registry::StrategyRegistry;
use crate::target::resolve_target;

/// Drives operations through a strategy registry, one file at a time.
///
/// Operations for the same file run in submission order against one
/// evolving content buffer; nothing is written back to disk, the
/// caller decides what to do with each [`PatchResult`].
pub struct Pipeline {
    registry: StrategyRegistry,
}

impl Pipeline {
    /// A pipeline over an explicit registry.
    #[must_use]
    pub fn new(registry: StrategyRegistry) -> Self {
        Self { registry }
    }

    /// Process every operation, yielding one result per distinct file
    /// in first-appearance order.
    #[must_use]
    pub fn run(&self, operations: Vec<PatchOperation>) -> Vec<PatchResult> {
        let mut order: Vec<PathBuf> = Vec::new();
        let mut groups: HashMap<PathBuf, Vec<PatchOperation>> = HashMap::new();
        for op in operations {
            if !groups.contains_key(&op.path) {
                order.push(op.path.clone());
            }
            groups.entry(op.path.clone()).or_default().push(op);
        }

        let mut results = Vec::with_capacity(order.len());
        for path in order {
            let ops = groups.remove(&path).unwrap_or_default();
            info!(path = %path.display(), operations = ops.len(), "processing file");

            let original = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(err) => {
                    warn!(path = %path.display(), %err, "unreadable, starting from empty");
                    String::new()
                }
            };

            let mut result = PatchResult::new(&path, original);
            for mut op in ops {
                if op.kind == OperationKind::File && op.target.is_none() {
                    match &op.xpath {
                        Some(xpath) => match resolve_target(xpath, &op.content) {
                            Ok(target) => op.target = Some(target),
                            Err(err) => {
                                let message = format!("bad locator: {err}");
                                op.add_error(message.clone());
                                result.add_error(message);
                                continue;
                            }
                        },
                        None => op.target = Some(Target::WholeFile),
                    }
                }
                self.registry.process_operation(&mut op, &mut result);
            }
            results.push(result);
        }
        results
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(StrategyRegistry::default())
    }
}
