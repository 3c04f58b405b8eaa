//! Recursive provenance resolution
//!
//! Chases an arbitrary number of intermediate reconstruction hops from a
//! candidate down to ground-truth generated particles. A stable identifier
//! inside the generated range is a base case; one outside it names an
//! intermediate object whose own relations are chased in turn.
//!
//! The upstream engine guarantees the relation graph is acyclic, but that
//! guarantee is external, so the walk still carries a depth bound and fails
//! loudly when it is exceeded.

use crate::candidate::{Candidate, CandidateGraph};
use crate::error::ConvertError;
use crate::ConvertResult;
use std::collections::BTreeSet;

/// Maximum number of relation hops before the walk is considered runaway
pub const MAX_RELATION_DEPTH: usize = 32;

/// Collect the generated-particle indices reachable from `cand`
///
/// Indices land in `resolved`, deduplicated and ordered. A candidate with
/// no relations warns and contributes nothing. Identifiers that resolve
/// neither to a generated particle nor to a known intermediate candidate
/// warn and are skipped.
pub fn resolve_gen_refs(
    graph: &CandidateGraph,
    cand: &Candidate,
    gen_count: usize,
    depth: usize,
    resolved: &mut BTreeSet<usize>,
) -> ConvertResult<()> {
    if depth >= MAX_RELATION_DEPTH {
        return Err(ConvertError::RelationDepthExceeded { depth });
    }

    if cand.related.is_empty() {
        log::warn!(
            "no relation from candidate {} toward a generated particle",
            cand.uid
        );
        return Ok(());
    }

    for &uid in &cand.related {
        match uid.checked_sub(1) {
            Some(index) if index < gen_count => {
                resolved.insert(index);
            }
            _ => match graph.resolve_uid(uid) {
                Some(next) => resolve_gen_refs(graph, next, gen_count, depth + 1, resolved)?,
                None => log::warn!(
                    "candidate {} relates to unknown identifier {}",
                    cand.uid,
                    uid
                ),
            },
        }
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{FourMomentum, Position};

    fn cand() -> Candidate {
        Candidate::new(1, 1, FourMomentum::new(10.0, 1.0, 0.0, 0.0), Position::origin())
    }

    fn resolve(graph: &CandidateGraph, start: usize, gen_count: usize) -> BTreeSet<usize> {
        let mut resolved = BTreeSet::new();
        resolve_gen_refs(
            graph,
            graph.candidate(start).unwrap(),
            gen_count,
            0,
            &mut resolved,
        )
        .unwrap();
        resolved
    }

    #[test]
    fn test_direct_reference_is_base_case() {
        let mut graph = CandidateGraph::new();
        let g = graph.push(cand());
        let node = graph.push(cand().with_related(vec![g + 1]));

        assert_eq!(resolve(&graph, node, 1), BTreeSet::from([0]));
    }

    #[test]
    fn test_pass_through_hop_yields_identical_set() {
        // Wrapping a direct link in one extra pass-through node must not
        // change the resolved index set.
        let mut direct = CandidateGraph::new();
        let g = direct.push(cand());
        let constituent = direct.push(cand().with_related(vec![g + 1]));

        let mut wrapped = CandidateGraph::new();
        let g2 = wrapped.push(cand());
        let inner = wrapped.push(cand().with_related(vec![g2 + 1]));
        let outer = wrapped.push(cand().with_related(vec![inner + 1]));

        assert_eq!(resolve(&direct, constituent, 1), resolve(&wrapped, outer, 1));
    }

    #[test]
    fn test_relationless_node_contributes_nothing() {
        let mut graph = CandidateGraph::new();
        graph.push(cand());
        let dead_end = graph.push(cand());
        let node = graph.push(cand().with_related(vec![dead_end + 1]));

        assert!(resolve(&graph, node, 1).is_empty());
    }

    #[test]
    fn test_branching_chain_deduplicates() {
        let mut graph = CandidateGraph::new();
        let g0 = graph.push(cand());
        let g1 = graph.push(cand());
        let left = graph.push(cand().with_related(vec![g0 + 1, g1 + 1]));
        let right = graph.push(cand().with_related(vec![g1 + 1]));
        let top = graph.push(cand().with_related(vec![left + 1, right + 1]));

        assert_eq!(resolve(&graph, top, 2), BTreeSet::from([0, 1]));
    }

    #[test]
    fn test_depth_guard_fails_loudly() {
        // A self-referencing intermediate would recurse forever without the
        // depth bound. Slot 1 holds uid 2, so relating to uid 2 loops.
        let mut graph = CandidateGraph::new();
        graph.push(cand());
        let looped = graph.push(cand().with_related(vec![2]));

        let mut resolved = BTreeSet::new();
        let result = resolve_gen_refs(
            &graph,
            graph.candidate(looped).unwrap(),
            1,
            0,
            &mut resolved,
        );
        assert!(matches!(
            result,
            Err(ConvertError::RelationDepthExceeded { .. })
        ));
    }
}
