//! Assembles junctions from a [`JunctionConfig`].
//!
//! Filter functions cannot be written in a config file, so they are
//! registered with the builder under a name and looked up when a filter
//! stage refers to them. Configured parameters reach the filter function as
//! a shared [`ConfigValue`]; read them with `param_as::<ConfigValue>`.

use crate::config::{JunctionConfig, PipeConfig, StageConfig};
use crate::error::{PipesError, Result, ResultExt};
use crate::plumbing::fitting::FittingRef;
use crate::plumbing::fittings::{Filter, FilterFn, Pipe, PipeChain, Queue};
use crate::plumbing::junction::Junction;
use std::collections::HashMap;
use std::rc::Rc;

/// Registry of named filter functions plus the build step.
#[derive(Default)]
pub struct JunctionBuilder {
    filters: HashMap<String, FilterFn>,
}

impl JunctionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `filter` available to filter stages as `name`.
    /// A later registration under the same name replaces the earlier one.
    pub fn register_filter(&mut self, name: impl Into<String>, filter: FilterFn) -> &mut Self {
        let name = name.into();
        if self.filters.insert(name.clone(), filter).is_some() {
            tracing::debug!("JunctionBuilder replaced filter function '{}'", name);
        }
        self
    }

    pub fn has_filter(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Registered filter function names, sorted.
    pub fn filter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.filters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Validate `config` and build a junction holding one fitting per pipe.
    pub fn build(&self, config: &JunctionConfig) -> Result<Junction> {
        config.validate()?;

        let mut junction = Junction::new();
        for pipe in &config.pipes {
            let fitting = self
                .build_pipe(pipe)
                .with_context(|| format!("Failed to build pipe '{}'", pipe.name))?;
            junction.register_pipe(pipe.name.clone(), pipe.direction, fitting);
        }

        tracing::info!(
            "Built junction: {} input, {} output pipes",
            junction.input_pipe_names().len(),
            junction.output_pipe_names().len()
        );
        Ok(junction)
    }

    /// Build the fitting for a single configured pipe.
    pub fn build_pipe(&self, pipe: &PipeConfig) -> Result<FittingRef> {
        if pipe.stages.is_empty() {
            return Ok(Rc::new(Pipe::new()));
        }

        let stages = pipe
            .stages
            .iter()
            .map(|stage| self.build_stage(stage))
            .collect::<Result<Vec<_>>>()?;
        Ok(Rc::new(PipeChain::new(stages)?))
    }

    fn build_stage(&self, stage: &StageConfig) -> Result<FittingRef> {
        match stage {
            StageConfig::Pipe => Ok(Rc::new(Pipe::new())),
            StageConfig::Filter {
                name,
                filter,
                params,
                mode,
            } => {
                let function = self
                    .filters
                    .get(filter)
                    .cloned()
                    .ok_or_else(|| PipesError::UnknownFilter(filter.clone()))?;
                let mut stage = Filter::new(name.clone())
                    .with_filter_fn(function)
                    .with_mode(*mode);
                if let Some(params) = params {
                    stage = stage.with_params(params.clone());
                }
                Ok(Rc::new(stage))
            }
            StageConfig::Queue { name, mode } => {
                let queue = match name {
                    Some(name) => Queue::named(name.clone()),
                    None => Queue::new(),
                };
                Ok(Rc::new(queue.with_mode(*mode)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plumbing::direction::PipeDirection;
    use crate::plumbing::fittings::{filter_fn, param_as, FilterMode, QueueMode};
    use crate::plumbing::message::{ConfigValue, FilterControl, Message, QueueControl};
    use crate::plumbing::test_util::Collector;

    fn doubling_builder() -> JunctionBuilder {
        let mut builder = JunctionBuilder::new();
        builder.register_filter(
            "multiply",
            filter_fn(|message, params| {
                let factor = param_as::<ConfigValue>(params)
                    .and_then(ConfigValue::as_int)
                    .unwrap_or(2);
                if let Some(value) = message.borrow_mut().body_mut::<i64>() {
                    *value *= factor;
                }
                Ok(message)
            }),
        );
        builder
    }

    #[test]
    fn test_stageless_pipe_is_plain() {
        let config = JunctionConfig::new()
            .with_pipe(PipeConfig::new("fromShell", PipeDirection::Input))
            .with_pipe(PipeConfig::new("toShell", PipeDirection::Output));
        let junction = JunctionBuilder::new().build(&config).unwrap();

        assert!(junction.has_input_pipe("fromShell"));
        assert!(junction.has_output_pipe("toShell"));

        let collector = Collector::new();
        assert!(junction.add_pipe_listener("fromShell", collector.clone()));
        let pipe = junction.retrieve_pipe("fromShell").unwrap();
        assert!(pipe.write(Message::normal().into_ref()));
        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn test_filter_params_come_from_config() {
        let config = JunctionConfig::new().with_pipe(
            PipeConfig::new("toLogger", PipeDirection::Output).with_stage(StageConfig::Filter {
                name: "times".to_string(),
                filter: "multiply".to_string(),
                params: Some(ConfigValue::Int(10)),
                mode: FilterMode::Filter,
            }),
        );
        let junction = doubling_builder().build(&config).unwrap();
        let collector = Collector::new();
        assert!(junction
            .retrieve_pipe("toLogger")
            .unwrap()
            .connect(collector.listener()));

        assert!(junction.send_message("toLogger", Message::normal().with_body(3i64).into_ref()));
        assert_eq!(collector.received()[0].borrow().body::<i64>(), Some(&30));

        assert!(junction.send_message(
            "toLogger",
            Message::filter_control("times", FilterControl::Bypass).into_ref()
        ));
        assert!(junction.send_message("toLogger", Message::normal().with_body(3i64).into_ref()));
        assert_eq!(collector.received()[1].borrow().body::<i64>(), Some(&3));
    }

    #[test]
    fn test_filter_then_named_queue() {
        let config = JunctionConfig::new().with_pipe(
            PipeConfig::new("out", PipeDirection::Output)
                .with_stage(StageConfig::Filter {
                    name: "double".to_string(),
                    filter: "multiply".to_string(),
                    params: None,
                    mode: FilterMode::Filter,
                })
                .with_stage(StageConfig::Queue {
                    name: Some("buffer".to_string()),
                    mode: QueueMode::Fifo,
                }),
        );
        let junction = doubling_builder().build(&config).unwrap();
        let collector = Collector::new();
        assert!(junction.retrieve_pipe("out").unwrap().connect(collector.listener()));

        assert!(junction.send_message("out", Message::normal().with_body(4i64).into_ref()));
        assert_eq!(collector.len(), 0);
        assert!(junction.send_message(
            "out",
            Message::queue_control_for("elsewhere", QueueControl::Flush).into_ref()
        ));
        assert_eq!(collector.len(), 1);
        assert!(collector.received()[0]
            .borrow()
            .kind()
            .is_control());

        collector.clear();
        assert!(junction.send_message(
            "out",
            Message::queue_control_for("buffer", QueueControl::Flush).into_ref()
        ));
        assert_eq!(collector.len(), 1);
        assert_eq!(collector.received()[0].borrow().body::<i64>(), Some(&8));
    }

    #[test]
    fn test_unknown_filter_fails_with_context() {
        let config = JunctionConfig::new().with_pipe(
            PipeConfig::new("out", PipeDirection::Output).with_stage(StageConfig::Filter {
                name: "f".to_string(),
                filter: "nope".to_string(),
                params: None,
                mode: FilterMode::Filter,
            }),
        );
        let err = JunctionBuilder::new().build(&config).unwrap_err();
        match err {
            PipesError::WithContext { context, source } => {
                assert!(context.contains("'out'"));
                assert!(matches!(*source, PipesError::UnknownFilter(ref n) if n == "nope"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_config_rejected_before_build() {
        let config = JunctionConfig::new()
            .with_pipe(PipeConfig::new("dup", PipeDirection::Input))
            .with_pipe(PipeConfig::new("dup", PipeDirection::Input));
        assert!(matches!(
            JunctionBuilder::new().build(&config),
            Err(PipesError::Config(_))
        ));
    }

    #[test]
    fn test_filter_registry() {
        let mut builder = doubling_builder();
        builder.register_filter("identity", filter_fn(|m, _| Ok(m)));
        assert!(builder.has_filter("multiply"));
        assert_eq!(builder.filter_names(), vec!["identity", "multiply"]);
    }
}
