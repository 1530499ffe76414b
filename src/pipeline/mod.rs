//! Pipeline runner.
//!
//! Runs a [`RuleSet`] over one document until no rule asks for another pass,
//! or the pass budget runs out.
//!
//! ```text
//! pass 1: rule 0 → rule 1 → … → rule n   (dirty?)
//! pass 2: rule 0 → rule 1 → … → rule n   (dirty?)
//! …                                       (max_passes)
//! ```
//!
//! - Rules within a pass run strictly in registration order
//! - A rule raising dirty does not stop the pass
//! - The first failing rule aborts the run; the document is dropped
//! - Running out of passes is not an error (`converged: false`)

#[cfg(test)]
mod tests;

use crate::dom::Document;
use crate::error::PipelineError;
use crate::meta::Metadata;
use crate::partial::Partials;
use crate::rules::{Context, Dirty, RuleSet};
use crate::{debug, log};

// =============================================================================
// Types
// =============================================================================

/// Result of running the pipeline on one document.
#[derive(Debug)]
pub struct Outcome {
    /// The rewritten document.
    pub document: Document,
    /// Number of passes executed (at least 1).
    pub passes: usize,
    /// `false` when the last pass still raised dirty.
    pub converged: bool,
}

impl Outcome {
    pub fn to_html(&self) -> String {
        self.document.to_html()
    }
}

/// Entry point for running a rule set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline;

// =============================================================================
// Execution
// =============================================================================

impl Pipeline {
    /// Rewrite `document` with every rule in `rules`.
    ///
    /// `metadata` falls back to the rule set's root URL when it has none.
    pub async fn run<P: Partials>(
        document: Document,
        metadata: &Metadata,
        rules: &RuleSet<P>,
    ) -> Result<Outcome, PipelineError> {
        let metadata = metadata.clone().or_root_url(rules.root_url());
        let dirty = Dirty::new();
        let cx = Context {
            document: &document,
            metadata: &metadata,
            partials: rules.partials(),
            dirty: &dirty,
        };

        let max_passes = rules.max_passes().max(1);
        let mut pass = 1;
        loop {
            for rule in rules.rules() {
                if let Err(source) = rule.apply(&cx).await {
                    log!(
                        "error";
                        "{} failed in pass {} ({}): {}",
                        rule.name(),
                        pass,
                        source.kind(),
                        source
                    );
                    return Err(PipelineError {
                        rule: rule.name().to_string(),
                        pass,
                        source,
                    });
                }
            }

            if !dirty.take() {
                debug!("pipeline"; "converged after {} pass(es)", pass);
                return Ok(Outcome {
                    document,
                    passes: pass,
                    converged: true,
                });
            }
            if pass >= max_passes {
                log!(
                    "pipeline";
                    "still dirty after {} passes, giving up",
                    max_passes
                );
                return Ok(Outcome {
                    document,
                    passes: pass,
                    converged: false,
                });
            }
            pass += 1;
        }
    }
}

/// Parse `html`, run the pipeline, and serialise the result.
pub async fn render_html<P: Partials>(
    html: &str,
    metadata: &Metadata,
    rules: &RuleSet<P>,
) -> Result<String, PipelineError> {
    Pipeline::run(Document::parse(html), metadata, rules)
        .await
        .map(|outcome| outcome.to_html())
}
