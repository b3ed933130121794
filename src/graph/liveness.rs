//! Backward liveness analysis over the declared passes.
//!
//! Passes are visited from last to first with a running set of resources that a later, surviving pass reads.
//! A pass whose writes hit that set contributes to the frame. Non-root passes that do not contribute are culled.
//! A root that contributes anyway is demoted: its output is consumed by another survivor, so it is treated like
//! any other producer when islands are formed.

use fixedbitset::FixedBitSet;

use crate::core::traits::Device;
use crate::graph::pass::Pass;

/// Read and write sets of one pass, indexed by resource handle.
#[derive(Debug, Clone)]
pub(crate) struct LivenessNode {
    pub reads: FixedBitSet,
    pub writes: FixedBitSet,
    pub root: bool,
}

impl LivenessNode {
    pub fn from_pass<D: Device, C>(pass: &Pass<D, C>, resource_count: usize) -> Self {
        let mut reads = FixedBitSet::with_capacity(resource_count);
        let mut writes = FixedBitSet::with_capacity(resource_count);
        reads.extend(pass.reads().map(|handle| handle.index()));
        writes.extend(pass.writes().map(|handle| handle.index()));
        LivenessNode {
            reads,
            writes,
            root: pass.is_root(),
        }
    }
}

/// Result of the liveness pass. All pass lists hold indices into the declared pass list, in forward order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Liveness {
    pub survivors: Vec<usize>,
    pub culled: Vec<usize>,
    /// Root passes whose writes are read by a later survivor.
    pub demoted: FixedBitSet,
}

impl Liveness {
    pub fn is_demoted(&self, pass: usize) -> bool {
        self.demoted.contains(pass)
    }
}

pub(crate) fn analyze(nodes: &[LivenessNode], resource_count: usize) -> Liveness {
    let mut live_reads = FixedBitSet::with_capacity(resource_count);
    let mut contributes = FixedBitSet::with_capacity(nodes.len());
    let mut demoted = FixedBitSet::with_capacity(nodes.len());

    for (index, node) in nodes.iter().enumerate().rev() {
        let writes_are_live = !node.writes.is_disjoint(&live_reads);
        if !node.root && !writes_are_live {
            continue;
        }

        contributes.insert(index);
        if node.root && writes_are_live {
            demoted.insert(index);
        }
        live_reads.difference_with(&node.writes);
        live_reads.union_with(&node.reads);
    }

    let (survivors, culled): (Vec<usize>, Vec<usize>) = (0..nodes.len()).partition(|index| contributes.contains(*index));
    Liveness {
        survivors,
        culled,
        demoted,
    }
}

/// Builds a node over 8 resources from plain index lists.
#[cfg(test)]
pub(crate) fn node(reads: &[usize], writes: &[usize], root: bool) -> LivenessNode {
    let mut r = FixedBitSet::with_capacity(8);
    let mut w = FixedBitSet::with_capacity(8);
    r.extend(reads.iter().copied());
    w.extend(writes.iter().copied());
    LivenessNode {
        reads: r,
        writes: w,
        root,
    }
}
