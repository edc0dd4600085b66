use crate::error::Error;

/// The action to take after a step completes.
#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    /// Continue to the next step
    Continue,
    /// Skip all remaining steps (successful early exit)
    Skip,
    /// Abort the pipeline with an error
    Abort(Error),
}

/// One unit of work in a [`Pipeline`].
///
/// Steps read their inputs from the context and write their results back to
/// it, so each step can be tested on its own with a hand-built context.
#[async_trait::async_trait]
pub trait PipelineStep<T>: Send + Sync {
    fn name(&self) -> &'static str;

    /// Determines if this step should execute based on current context
    fn should_execute(&self, _context: &T) -> bool {
        true
    }

    async fn execute(&self, context: &mut T) -> StepAction;
}

/// Runs steps in order until one skips or aborts.
pub struct Pipeline<T> {
    name: &'static str,
    steps: Vec<Box<dyn PipelineStep<T>>>,
}

impl<T: Send> Pipeline<T> {
    pub fn with_steps(name: &'static str, steps: Vec<Box<dyn PipelineStep<T>>>) -> Self {
        Self { name, steps }
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    pub async fn execute(&self, context: &mut T) -> Result<(), Error> {
        for step in &self.steps {
            if !step.should_execute(context) {
                tracing::debug!("[{}] step {} skipped", self.name, step.name());
                continue;
            }

            tracing::debug!("[{}] executing step {}", self.name, step.name());

            match step.execute(context).await {
                StepAction::Continue => continue,
                StepAction::Skip => {
                    tracing::info!(
                        "[{}] step {} requested skip - stopping pipeline",
                        self.name,
                        step.name()
                    );
                    return Ok(());
                }
                StepAction::Abort(error) => {
                    tracing::error!(
                        "[{}] step {} aborted the pipeline: {}",
                        self.name,
                        step.name(),
                        error
                    );
                    return Err(error);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Trace {
        visited: Vec<&'static str>,
        skip_second: bool,
    }

    struct Record(&'static str);

    #[async_trait::async_trait]
    impl PipelineStep<Trace> for Record {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn execute(&self, context: &mut Trace) -> StepAction {
            context.visited.push(self.0);
            StepAction::Continue
        }
    }

    struct SkipRest;

    #[async_trait::async_trait]
    impl PipelineStep<Trace> for SkipRest {
        fn name(&self) -> &'static str {
            "skip_rest"
        }

        async fn execute(&self, _context: &mut Trace) -> StepAction {
            StepAction::Skip
        }
    }

    struct Fail;

    #[async_trait::async_trait]
    impl PipelineStep<Trace> for Fail {
        fn name(&self) -> &'static str {
            "fail"
        }

        fn should_execute(&self, context: &Trace) -> bool {
            !context.skip_second
        }

        async fn execute(&self, _context: &mut Trace) -> StepAction {
            StepAction::Abort(Error::InvalidInput("boom".to_string()))
        }
    }

    #[async_std::test]
    async fn test_skip_stops_pipeline_successfully() {
        let pipeline = Pipeline::with_steps(
            "test",
            vec![Box::new(Record("first")), Box::new(SkipRest), Box::new(Record("never"))],
        );
        let mut trace = Trace::default();
        pipeline.execute(&mut trace).await.unwrap();
        assert_eq!(trace.visited, vec!["first"]);
    }

    #[async_std::test]
    async fn test_abort_returns_error_and_should_execute_is_honoured() {
        let pipeline = Pipeline::with_steps(
            "test",
            vec![Box::new(Fail), Box::new(Record("after"))],
        );

        let mut trace = Trace::default();
        let result = pipeline.execute(&mut trace).await;
        assert_eq!(result, Err(Error::InvalidInput("boom".to_string())));
        assert!(trace.visited.is_empty());

        let mut trace = Trace {
            skip_second: true,
            ..Default::default()
        };
        pipeline.execute(&mut trace).await.unwrap();
        assert_eq!(trace.visited, vec!["after"]);
        assert_eq!(pipeline.step_names(), vec!["fail", "after"]);
    }
}
