//! Jet conversion
//!
//! One output jet per input entry with its b-tag and tau-tag values, plus
//! one association per generated particle reached from the jet's
//! constituents. Constituents sit an arbitrary number of reconstruction
//! hops above the generator record, so resolution goes through
//! [`resolve_gen_refs`](super::resolve::resolve_gen_refs).

use crate::candidate::CandidateGraph;
use crate::convert::resolve::resolve_gen_refs;
use crate::edm::{EventData, Jet, JetToGenAssociation, JetToTagAssociation, Tag};
use crate::ConvertResult;
use std::collections::BTreeSet;

/// Convert the jet array into jets, tags and associations
pub fn convert_jets(
    graph: &CandidateGraph,
    input: &[usize],
    gen_count: usize,
    event: &mut EventData,
) -> ConvertResult<()> {
    for &id in input {
        let cand = match graph.candidate(id) {
            Some(c) => c,
            None => {
                log::warn!("jet array references missing arena slot {}", id);
                continue;
            }
        };

        let jet = event.jets.len();
        event.jets.push(Jet {
            px: cand.momentum.px,
            py: cand.momentum.py,
            pz: cand.momentum.pz,
            mass: cand.mass,
            area: -1.0,
        });

        // Tags are copied verbatim, one of each per jet
        let btag = event.btags.len();
        event.btags.push(Tag { value: cand.btag });
        event.jets_to_btags.push(JetToTagAssociation { jet, tag: btag });

        let tautag = event.tautags.len();
        event.tautags.push(Tag { value: cand.tautag });
        event.jets_to_tautags.push(JetToTagAssociation { jet, tag: tautag });

        let mut resolved: BTreeSet<usize> = BTreeSet::new();
        for &constituent_uid in &cand.related {
            match graph.resolve_uid(constituent_uid) {
                Some(constituent) => {
                    resolve_gen_refs(graph, constituent, gen_count, 0, &mut resolved)?;
                }
                None => log::warn!(
                    "jet candidate {} references unknown constituent identifier {}",
                    cand.uid,
                    constituent_uid
                ),
            }
        }

        for index in resolved {
            event.jets_to_gen.push(JetToGenAssociation { jet, gen: index });
        }

        log::debug!(
            "jet {:>3}: btag {:.1} tautag {:.1} gen refs {}",
            jet,
            cand.btag,
            cand.tautag,
            event.jets_to_gen.iter().filter(|a| a.jet == jet).count(),
        );
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
