//! Hierarchy walk: visit the class tree and declare every concrete operation.
//!
//! The traversal is a plain pre-order recursion: a node, then its children in
//! registration order. Abstract classes are never declared but are always
//! descended into. Nicknames are deduplicated across the whole run, first seen
//! wins, and a duplicate only suppresses its own declaration, never the
//! subtree below it.

use std::collections::HashSet;
use tracing::{debug, info, trace};

use crate::classify::{classify, collect_arguments};
use crate::codegen::{DeclarationStyle, render_signature};
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::registry::OperationRegistry;
use crate::sink::DeclarationSink;
use crate::types::TypeMapper;

/// Per-run state: which nicknames have been declared so far.
///
/// One context spans one run. Independent runs use independent contexts.
#[derive(Debug, Default, Clone)]
pub struct GenerationContext {
    generated: HashSet<String>,
    report: GenerationReport,
}

impl GenerationContext {
    /// Start an empty run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `nickname` has already been declared in this run.
    pub fn is_generated(&self, nickname: &str) -> bool {
        self.generated.contains(nickname)
    }

    /// Summary of what the run has done so far.
    pub fn report(&self) -> &GenerationReport {
        &self.report
    }

    fn record(&mut self, nickname: String) {
        self.report.emitted.push(nickname.clone());
        self.generated.insert(nickname);
    }
}

/// Summary of a generation run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Nicknames declared, in emission order.
    pub emitted: Vec<String>,
    /// Nicknames of concrete classes skipped as synonyms, in visit order.
    pub synonyms: Vec<String>,
    /// Number of abstract classes visited.
    pub abstract_classes: usize,
}

/// Drives classification and emission over a registry's class tree.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    mapper: TypeMapper,
    style: DeclarationStyle,
}

impl Generator {
    /// Build a generator from a configuration.
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            mapper: TypeMapper::new(config),
            style: DeclarationStyle::new(config),
        }
    }

    /// Declare every operation reachable from the registry root.
    ///
    /// Lines reach `sink` in traversal order. The first error aborts the run;
    /// nothing after the failing operation is written.
    pub fn run<R, S>(&self, registry: &R, sink: &mut S) -> Result<GenerationReport>
    where
        R: OperationRegistry,
        S: DeclarationSink + ?Sized,
    {
        let mut context = GenerationContext::new();
        let root = registry.root()?;
        self.walk(registry, &root, &mut context, sink)?;

        let report = context.report;
        info!(
            emitted = report.emitted.len(),
            synonyms = report.synonyms.len(),
            abstract_classes = report.abstract_classes,
            "Generated operation declarations."
        );
        Ok(report)
    }

    /// Visit `class` and everything below it.
    pub fn walk<R, S>(
        &self,
        registry: &R,
        class: &R::Class,
        context: &mut GenerationContext,
        sink: &mut S,
    ) -> Result<()>
    where
        R: OperationRegistry,
        S: DeclarationSink + ?Sized,
    {
        if registry.is_abstract(class)? {
            context.report.abstract_classes += 1;
        } else {
            let nickname = registry.nickname(class)?;
            if context.is_generated(&nickname) {
                debug!(nickname = %nickname, "Skipping synonym, already declared.");
                context.report.synonyms.push(nickname);
            } else {
                let line = self.declare(registry, class, &nickname)?;
                sink.accept(&line)?;
                trace!(nickname = %nickname, line = %line, "Declared operation.");
                context.record(nickname);
            }
        }

        for child in registry.children(class)? {
            self.walk(registry, &child, context, sink)?;
        }

        Ok(())
    }

    /// Build the declaration line for one concrete class.
    pub fn declare<R: OperationRegistry>(
        &self,
        registry: &R,
        class: &R::Class,
        nickname: &str,
    ) -> Result<String> {
        let operation = registry.instantiate(class)?;
        let arguments = collect_arguments(registry, &operation)?;
        let classified = classify(&arguments, |value_type| self.mapper.is_image(value_type));
        render_signature(nickname, &classified, &self.mapper, &self.style)
    }
}

/// Declare every operation in `registry` with the given configuration.
pub fn generate<R, S>(
    registry: &R,
    config: &GeneratorConfig,
    sink: &mut S,
) -> Result<GenerationReport>
where
    R: OperationRegistry,
    S: DeclarationSink + ?Sized,
{
    Generator::new(config).run(registry, sink)
}
