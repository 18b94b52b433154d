//! Start sequence as data.
//!
//! Each [`StartStep`] declares which earlier steps it needs. A [`StartPlan`]
//! is an ordering of steps that [`StartPlan::validate`] checks against those
//! declarations, independently of how the steps are carried out.

use std::fmt;

use crate::error::PlanError;

/// One step of bringing a cluster up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartStep {
    CreateNetwork,
    StartDatabase,
    StartExecutionContainer,
    StartQueue,
    InitializeSchema,
    StartScheduler,
    StartWorkers,
}

impl StartStep {
    /// Steps that must have completed before this one runs.
    #[must_use]
    pub const fn requires(self) -> &'static [StartStep] {
        use StartStep::*;
        match self {
            CreateNetwork => &[],
            StartDatabase => &[CreateNetwork],
            StartExecutionContainer => &[CreateNetwork],
            StartQueue => &[CreateNetwork],
            InitializeSchema => &[StartDatabase, StartExecutionContainer],
            StartScheduler => &[StartExecutionContainer, StartQueue, InitializeSchema],
            StartWorkers => &[StartExecutionContainer, StartQueue, InitializeSchema],
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            StartStep::CreateNetwork => "create-network",
            StartStep::StartDatabase => "start-database",
            StartStep::StartExecutionContainer => "start-execution-container",
            StartStep::StartQueue => "start-queue",
            StartStep::InitializeSchema => "initialize-schema",
            StartStep::StartScheduler => "start-scheduler",
            StartStep::StartWorkers => "start-workers",
        }
    }
}

impl fmt::Display for StartStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered list of start steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartPlan {
    steps: Vec<StartStep>,
}

impl Default for StartPlan {
    /// The full topology in its canonical order.
    fn default() -> Self {
        Self {
            steps: vec![
                StartStep::CreateNetwork,
                StartStep::StartDatabase,
                StartStep::StartExecutionContainer,
                StartStep::StartQueue,
                StartStep::InitializeSchema,
                StartStep::StartScheduler,
                StartStep::StartWorkers,
            ],
        }
    }
}

impl StartPlan {
    /// Build a plan from an explicit ordering, validating it.
    pub fn new(steps: Vec<StartStep>) -> Result<Self, PlanError> {
        let plan = Self { steps };
        plan.validate()?;
        Ok(plan)
    }

    #[must_use]
    pub fn steps(&self) -> &[StartStep] {
        &self.steps
    }

    /// Check that no step repeats and every requirement is scheduled earlier.
    pub fn validate(&self) -> Result<(), PlanError> {
        for (index, step) in self.steps.iter().enumerate() {
            let earlier = &self.steps[..index];
            if earlier.contains(step) {
                return Err(PlanError::Duplicate(step.name()));
            }
            if let Some(missing) = step.requires().iter().find(|req| !earlier.contains(req)) {
                return Err(PlanError::UnmetRequirement {
                    step: step.name(),
                    missing: missing.name(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan_is_valid() {
        assert!(StartPlan::default().validate().is_ok());
    }

    #[test]
    fn default_plan_matches_canonical_order() {
        let plan = StartPlan::default();
        assert_eq!(plan.steps().first(), Some(&StartStep::CreateNetwork));
        assert_eq!(plan.steps().last(), Some(&StartStep::StartWorkers));
        assert_eq!(plan.steps()[2], StartStep::StartExecutionContainer);
        assert_eq!(plan.steps()[3], StartStep::StartQueue);
    }

    #[test]
    fn schema_before_database_is_rejected() {
        let result = StartPlan::new(vec![
            StartStep::CreateNetwork,
            StartStep::StartExecutionContainer,
            StartStep::InitializeSchema,
            StartStep::StartDatabase,
        ]);
        assert_eq!(
            result,
            Err(PlanError::UnmetRequirement {
                step: "initialize-schema",
                missing: "start-database",
            })
        );
    }

    #[test]
    fn duplicate_steps_are_rejected() {
        let result = StartPlan::new(vec![StartStep::CreateNetwork, StartStep::CreateNetwork]);
        assert_eq!(result, Err(PlanError::Duplicate("create-network")));
    }

    #[test]
    fn partial_plan_with_met_requirements_is_valid() {
        let plan = StartPlan::new(vec![
            StartStep::CreateNetwork,
            StartStep::StartQueue,
            StartStep::StartDatabase,
        ]);
        assert!(plan.is_ok());
    }

    #[test]
    fn every_requirement_appears_earlier_in_default_plan() {
        let plan = StartPlan::default();
        for (index, step) in plan.steps().iter().enumerate() {
            for req in step.requires() {
                let position = plan.steps().iter().position(|s| s == req).unwrap();
                assert!(position < index, "{req} must precede {step}");
            }
        }
    }
}
