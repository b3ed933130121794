use anyhow::{Context, Result};

use crate::core::error::Error;
use crate::core::traits::{Device, Queue};
use crate::graph::frame_graph::{FrameGraph, GraphState};
use crate::graph::pass::Pass;
use crate::graph::physical_resource::PhysicalResourceBindings;

/// Executes a built graph on a [`Queue`].
pub trait RecordGraph<Q: Queue> {
    /// Records every surviving pass into a single recording context and submits it to the queue.
    /// Passes are recorded in the order they were added to the graph.
    /// # Errors
    /// - Fails with [`Error::GraphNotBuilt`] if the graph was not built successfully.
    /// - Fails if a pass callback returns an error. Recording stops at that pass and nothing is submitted.
    fn execute(&mut self, queue: &mut Q) -> Result<()>;
}

// The graph runs on a single queue and does not track resource states yet. Every hook is the place where
// transitions for the pass would be recorded.
fn barriers_before_pass<D: Device, C>(_pass: &Pass<D, C>, _bindings: &PhysicalResourceBindings<D>, _cmd: &mut C) {}

fn barriers_after_pass<D: Device, C>(_pass: &Pass<D, C>, _bindings: &PhysicalResourceBindings<D>, _cmd: &mut C) {}

fn record_pass<D: Device, C>(pass: &mut Pass<D, C>, bindings: &PhysicalResourceBindings<D>, cmd: &mut C) -> Result<()> {
    barriers_before_pass(pass, bindings, cmd);
    pass.execute
        .execute(bindings, cmd)
        .with_context(|| format!("Pass `{}` failed to record", pass.name))?;
    barriers_after_pass(pass, bindings, cmd);
    Ok(())
}

impl<D: Device, Q: Queue> RecordGraph<Q> for FrameGraph<'_, D, Q::CmdBuffer> {
    fn execute(&mut self, queue: &mut Q) -> Result<()> {
        let GraphState::Built(analysis) = &self.state else {
            return Err(Error::GraphNotBuilt.into());
        };

        let mut cmd = queue.begin()?;
        for &index in &analysis.liveness.survivors {
            record_pass(&mut self.passes[index], &self.bindings, &mut cmd)?;
        }
        queue.submit(cmd)?;
        trace!("Graph `{}` submitted {} passes", self.settings.name, analysis.liveness.survivors.len());
        Ok(())
    }
}
