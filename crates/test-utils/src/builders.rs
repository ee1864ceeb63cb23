#![allow(dead_code)]

use stepdag::job::{RawPrecedence, RawStep};

/// Builder for a job (a list of raw step records) to simplify test setup.
#[derive(Debug, Default)]
pub struct JobBuilder {
    steps: Vec<RawStep>,
}

impl JobBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a well-formed step.
    pub fn step(mut self, name: &str, precedence: i64, deps: &[&str]) -> Self {
        let mut builder = RawStepBuilder::new(name).precedence(precedence);
        for dep in deps {
            builder = builder.after(dep);
        }
        self.steps.push(builder.build());
        self
    }

    pub fn with_step(mut self, step: RawStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn build(self) -> Vec<RawStep> {
        self.steps
    }
}

/// Builder for `RawStep`, including records that will fail validation.
#[derive(Debug, Default)]
pub struct RawStepBuilder {
    step: RawStep,
}

impl RawStepBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            step: RawStep {
                step: Some(name.to_string()),
                precedence: None,
                dependencies: None,
            },
        }
    }

    /// A record with no `step` field at all.
    pub fn unnamed() -> Self {
        Self::default()
    }

    pub fn precedence(mut self, value: i64) -> Self {
        self.step.precedence = Some(RawPrecedence::Integer(value));
        self
    }

    pub fn raw_precedence(mut self, value: RawPrecedence) -> Self {
        self.step.precedence = Some(value);
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        let deps = self.step.dependencies.get_or_insert(vec![]);
        deps.push(dep.to_string());
        self
    }

    /// Explicit `dependencies: []`.
    pub fn no_dependencies(mut self) -> Self {
        self.step.dependencies = Some(vec![]);
        self
    }

    pub fn build(self) -> RawStep {
        self.step
    }
}
