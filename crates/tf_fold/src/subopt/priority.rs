//! Best-first suboptimal enumeration with eager nodes.
//!
//! Each frontier node owns its partial structure outright, so expanding
//! a node clones the pair table and CTD list per candidate. Simple and
//! duplicate-free: every candidate replaces exactly one obligation, so
//! no two paths through the tree produce the same complete structure.

use tf_energy::Energy;
use tf_structure::{Ctd, NAIDX, PairTable};

use crate::context::Computed;
use crate::expand::expansions;
use crate::index::DpState::P;
use crate::index::ExtState::Ext;
use crate::index::Index;
use crate::subopt::bounded::BoundedSet;
use crate::tables::FoldState;

#[derive(Clone)]
struct Node {
    /// Obligations still to be replaced; the structure is complete once
    /// this is empty.
    not_yet_expanded: Vec<Index>,
    pt: PairTable,
    ctds: Vec<Ctd>,
    /// Energy of the full structure this node commits to.
    energy: Energy,
}

pub(crate) fn suboptimal_priority(
    s: &FoldState,
    max_energy: Energy,
    max_structures: usize,
) -> Vec<Computed> {
    let n = s.n() as usize;
    let mut q = BoundedSet::new(max_structures, max_energy);
    let mut finished = BoundedSet::new(max_structures, max_energy);

    let root = Node {
        not_yet_expanded: vec![Index::ext(0, Ext)],
        pt: PairTable::new(n),
        ctds: vec![Ctd::Na; n],
        energy: s.ext(0, Ext),
    };
    q.insert(root.energy, root);

    while let Some((energy, mut node)) = q.pop_first() {
        debug_assert_eq!(energy, node.energy);
        let Some(idx) = node.not_yet_expanded.pop() else {
            finished.insert(node.energy, node);
            continue;
        };
        // The best unfinished node cannot beat a full finished set.
        if finished.len() >= max_structures
            && finished.worst_energy().is_some_and(|worst| worst <= node.energy)
        {
            break;
        }

        if let Index::Dp { st, en, a: P } = idx {
            node.pt.set_pair(st as NAIDX, en as NAIDX);
        }
        let base_energy = node.energy - s.at(idx);
        for exp in expansions(s, idx) {
            let mut child = node.clone();
            child.energy = base_energy + exp.energy;
            if let Some((i, ctd)) = exp.ctd0 {
                child.ctds[i as usize] = ctd;
            }
            if let Some((i, ctd)) = exp.ctd1 {
                child.ctds[i as usize] = ctd;
            }
            if let Some(idx0) = exp.idx0 {
                child.not_yet_expanded.push(idx0);
            }
            if let Some(idx1) = exp.idx1 {
                child.not_yet_expanded.push(idx1);
            }
            q.insert(child.energy, child);
        }
    }

    finished
        .into_values()
        .map(|node| Computed { pt: node.pt, ctds: node.ctds, energy: node.energy })
        .collect()
}
