//! Partitions the surviving passes into islands: groups of roots and their producers that share no resources
//! with any other group.
//!
//! Every surviving root that was not demoted seeds a footprint. Earlier survivors whose writes feed the footprint
//! join it, which pulls in their own reads and writes. Demoted roots never seed a footprint of their own, they join
//! the island of the root that consumes them like any other producer. Roots whose footprints touch a common
//! resource are merged into one island.
//!
//! Islands are not used by the executor. They describe which parts of the frame could be recorded and submitted
//! independently.

use fixedbitset::FixedBitSet;
use petgraph::unionfind::UnionFind;

use crate::graph::liveness::{Liveness, LivenessNode};

/// A group of roots that, together with their producers, touch no resource used by any other island.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Island {
    id: usize,
    root_mask: FixedBitSet,
    roots: Vec<usize>,
    passes: Vec<usize>,
    resources: FixedBitSet,
}

impl Island {
    /// Index of this island in the partition.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Bitmask over root indices. Roots are numbered by their position among the seeding roots, in pass order.
    pub fn root_mask(&self) -> &FixedBitSet {
        &self.root_mask
    }

    /// The roots seeding this island, as pass indices.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Every pass in this island, as pass indices in forward order.
    pub fn passes(&self) -> &[usize] {
        &self.passes
    }

    /// Every resource read or written by a pass of this island.
    pub fn resources(&self) -> &FixedBitSet {
        &self.resources
    }

    /// Whether a pass belongs to this island.
    pub fn contains_pass(&self, pass: usize) -> bool {
        self.passes.binary_search(&pass).is_ok()
    }
}

/// The islands of one build, ordered by their first root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IslandPartition {
    islands: Vec<Island>,
}

impl IslandPartition {
    /// All islands.
    pub fn islands(&self) -> &[Island] {
        &self.islands
    }

    /// Amount of islands.
    pub fn len(&self) -> usize {
        self.islands.len()
    }

    /// True if no pass survived.
    pub fn is_empty(&self) -> bool {
        self.islands.is_empty()
    }

    /// Find the island containing a pass.
    pub fn island_of(&self, pass: usize) -> Option<&Island> {
        self.islands.iter().find(|island| island.contains_pass(pass))
    }

    /// Panics if two islands share a resource.
    pub(crate) fn validate(&self) {
        for (i, a) in self.islands.iter().enumerate() {
            for b in &self.islands[i + 1..] {
                if !a.resources.is_disjoint(&b.resources) {
                    let shared = a.resources.intersection(&b.resources).collect::<Vec<_>>();
                    panic!("Islands {} and {} share resources {:?}. This is a bug in the island partition.", a.id, b.id, shared);
                }
            }
        }
    }
}

struct Footprint {
    pass: usize,
    reads: FixedBitSet,
    resources: FixedBitSet,
    passes: Vec<usize>,
}

pub(crate) fn partition(nodes: &[LivenessNode], liveness: &Liveness, resource_count: usize) -> IslandPartition {
    let seeds = liveness
        .survivors
        .iter()
        .copied()
        .filter(|&pass| nodes[pass].root && !liveness.is_demoted(pass))
        .collect::<Vec<_>>();
    let mut seed_mask = FixedBitSet::with_capacity(nodes.len());
    seed_mask.extend(seeds.iter().copied());

    let footprints = seeds
        .iter()
        .map(|&seed| {
            let node = &nodes[seed];
            let mut footprint = Footprint {
                pass: seed,
                reads: node.reads.clone(),
                resources: FixedBitSet::with_capacity(resource_count),
                passes: vec![seed],
            };
            footprint.resources.union_with(&node.reads);
            footprint.resources.union_with(&node.writes);

            for &pass in liveness.survivors.iter().rev().filter(|&&pass| pass < seed) {
                if seed_mask.contains(pass) {
                    continue;
                }
                let node = &nodes[pass];
                if node.writes.is_disjoint(&footprint.reads) {
                    continue;
                }
                footprint.reads.union_with(&node.reads);
                footprint.resources.union_with(&node.reads);
                footprint.resources.union_with(&node.writes);
                footprint.passes.push(pass);
            }
            footprint
        })
        .collect::<Vec<_>>();

    let mut sets = UnionFind::<usize>::new(footprints.len());
    for i in 0..footprints.len() {
        for j in i + 1..footprints.len() {
            if !footprints[i].resources.is_disjoint(&footprints[j].resources) {
                sets.union(i, j);
            }
        }
    }

    let mut islands: Vec<Island> = Vec::new();
    let mut island_of_set = vec![None; footprints.len()];
    for (root, footprint) in footprints.iter().enumerate() {
        let set = sets.find(root);
        let id = *island_of_set[set].get_or_insert_with(|| {
            islands.push(Island {
                id: islands.len(),
                root_mask: FixedBitSet::with_capacity(footprints.len()),
                roots: vec![],
                passes: vec![],
                resources: FixedBitSet::with_capacity(resource_count),
            });
            islands.len() - 1
        });
        let island = &mut islands[id];
        island.root_mask.insert(root);
        island.roots.push(footprint.pass);
        island.passes.extend(footprint.passes.iter().copied());
        island.resources.union_with(&footprint.resources);
    }

    for island in &mut islands {
        island.passes.sort_unstable();
        island.passes.dedup();
    }

    IslandPartition {
        islands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::liveness::{analyze, node};

    fn run(nodes: &[LivenessNode]) -> IslandPartition {
        let liveness = analyze(nodes, 8);
        let islands = partition(nodes, &liveness, 8);
        islands.validate();
        islands
    }

    #[test]
    fn chain_forms_one_island() {
        let islands = run(&[node(&[], &[0], false), node(&[0], &[1], false), node(&[1], &[], true)]);
        assert_eq!(islands.len(), 1);
        assert_eq!(islands.islands()[0].roots(), &[2]);
        assert_eq!(islands.islands()[0].passes(), &[0, 1, 2]);
    }

    #[test]
    fn shared_producer_merges_roots() {
        let islands = run(&[node(&[], &[0], false), node(&[0], &[1], true), node(&[0], &[2], true)]);
        assert_eq!(islands.len(), 1);
        assert_eq!(islands.islands()[0].roots(), &[1, 2]);
        assert_eq!(islands.islands()[0].root_mask().ones().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn demoted_root_joins_consumer() {
        let islands = run(&[node(&[], &[0], true), node(&[0], &[1], true), node(&[], &[2], true)]);
        assert_eq!(islands.len(), 2);
        assert_eq!(islands.island_of(0).map(Island::id), islands.island_of(1).map(Island::id));
        assert_eq!(islands.islands()[0].roots(), &[1]);
        assert_eq!(islands.islands()[1].roots(), &[2]);
    }

    #[test]
    #[should_panic]
    fn overlapping_islands_panic() {
        let mut resources = FixedBitSet::with_capacity(4);
        resources.insert(1);
        let island = |id| Island {
            id,
            root_mask: FixedBitSet::with_capacity(2),
            roots: vec![id],
            passes: vec![id],
            resources: resources.clone(),
        };
        IslandPartition {
            islands: vec![island(0), island(1)],
        }
        .validate();
    }
}
