//! Best-first suboptimal enumeration with shared, lazy nodes.
//!
//! Same search as the priority enumerator, different representation:
//! nodes live in an arena and only record the delta against their
//! parent (the candidate chosen, its CTDs, and the next obligation).
//! Remaining obligations are a persistent list shared between siblings,
//! and expansion lists are computed once per index and cached, since
//! many nodes expand the same index. Structures are materialized only
//! for the nodes that survive to the end, by walking the parent chain.

use std::rc::Rc;

use ahash::AHashMap;
use tf_energy::Energy;
use tf_structure::{Ctd, NAIDX, PairTable};

use crate::context::Computed;
use crate::expand::{Expansion, expansions};
use crate::index::DpState::P;
use crate::index::ExtState::Ext;
use crate::index::Index;
use crate::subopt::bounded::BoundedSet;
use crate::tables::FoldState;

struct UnexpandedList {
    idx: Index,
    next: Option<Rc<UnexpandedList>>,
}

struct Node {
    /// Energy of the full structure this node commits to.
    energy: Energy,
    /// The obligation the next expansion step will replace; None once
    /// the structure is complete.
    to_expand: Option<Index>,
    /// Obligations deferred past |to_expand|, shared with siblings.
    unexpanded: Option<Rc<UnexpandedList>>,
    parent: Option<usize>,
    ctd0: Option<(i32, Ctd)>,
    ctd1: Option<(i32, Ctd)>,
}

pub(crate) fn suboptimal_cached(
    s: &FoldState,
    max_energy: Energy,
    max_structures: usize,
) -> Vec<Computed> {
    let n = s.n() as usize;
    let mut q = BoundedSet::new(max_structures, max_energy);
    let mut finished = BoundedSet::new(max_structures, max_energy);
    let mut cache: AHashMap<Index, Rc<Vec<Expansion>>> = AHashMap::new();

    let mut nodes = vec![Node {
        energy: s.ext(0, Ext),
        to_expand: Some(Index::ext(0, Ext)),
        unexpanded: None,
        parent: None,
        ctd0: None,
        ctd1: None,
    }];
    q.insert(nodes[0].energy, 0);

    while let Some((energy, id)) = q.pop_first() {
        let Some(idx) = nodes[id].to_expand else {
            finished.insert(energy, id);
            continue;
        };
        if finished.len() >= max_structures
            && finished.worst_energy().is_some_and(|worst| worst <= energy)
        {
            break;
        }

        let exps = cache
            .entry(idx)
            .or_insert_with(|| Rc::new(expansions(s, idx)))
            .clone();
        let base_energy = energy - s.at(idx);
        let tail = nodes[id].unexpanded.clone();
        for exp in exps.iter() {
            let (to_expand, unexpanded) = match (exp.idx0, exp.idx1) {
                (Some(idx0), Some(idx1)) => (
                    Some(idx0),
                    Some(Rc::new(UnexpandedList { idx: idx1, next: tail.clone() })),
                ),
                (Some(idx0), None) => (Some(idx0), tail.clone()),
                // Leaf candidate: pull the next deferred obligation.
                (None, _) => match &tail {
                    Some(list) => (Some(list.idx), list.next.clone()),
                    None => (None, None),
                },
            };
            let node = Node {
                energy: base_energy + exp.energy,
                to_expand,
                unexpanded,
                parent: Some(id),
                ctd0: exp.ctd0,
                ctd1: exp.ctd1,
            };
            let node_id = nodes.len();
            if q.insert(node.energy, node_id) {
                nodes.push(node);
            }
        }
    }

    finished
        .into_values()
        .map(|id| {
            let mut pt = PairTable::new(n);
            let mut ctds = vec![Ctd::Na; n];
            let energy = nodes[id].energy;
            let mut cur = Some(id);
            while let Some(i) = cur {
                let node = &nodes[i];
                // Every expanded ancestor's pair obligation is part of
                // this structure.
                if let Some(Index::Dp { st, en, a: P }) = node.to_expand {
                    pt.set_pair(st as NAIDX, en as NAIDX);
                }
                if let Some((i, ctd)) = node.ctd0 {
                    ctds[i as usize] = ctd;
                }
                if let Some((i, ctd)) = node.ctd1 {
                    ctds[i as usize] = ctd;
                }
                cur = node.parent;
            }
            Computed { pt, ctds, energy }
        })
        .collect()
}
