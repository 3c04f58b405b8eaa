//! Tower conversion (photons, neutral hadrons)
//!
//! One output particle per input entry. Provenance goes through one
//! intermediate hop: each related candidate is a calorimeter cluster, and
//! the cluster's own related list names the generated particles whose
//! energy the tower aggregates. Resolved indices are deduplicated, so a
//! tower linking to the same generated particle through several clusters
//! still emits a single association.

use crate::candidate::CandidateGraph;
use crate::edm::{ParticleCore, RecParticle, RecToGenAssociation, StatusBits};
use std::collections::BTreeSet;

/// Convert one tower-stage array into reconstructed particles
pub fn convert_towers(
    graph: &CandidateGraph,
    input: &[usize],
    gen_count: usize,
    out_particles: &mut Vec<RecParticle>,
    out_associations: &mut Vec<RecToGenAssociation>,
) {
    for &id in input {
        let cand = match graph.candidate(id) {
            Some(c) => c,
            None => {
                log::warn!("tower array references missing arena slot {}", id);
                continue;
            }
        };

        let core = ParticleCore::from_candidate(cand);

        let mut resolved: BTreeSet<usize> = BTreeSet::new();
        for &cluster_uid in &cand.related {
            let cluster = match graph.resolve_uid(cluster_uid) {
                Some(c) => c,
                None => {
                    log::warn!(
                        "tower candidate {} references unknown cluster identifier {}",
                        cand.uid,
                        cluster_uid
                    );
                    continue;
                }
            };
            for &ref_uid in &cluster.related {
                match ref_uid.checked_sub(1).filter(|&index| index < gen_count) {
                    Some(index) => {
                        resolved.insert(index);
                    }
                    None => log::warn!(
                        "cannot relate tower candidate {} to a generated particle",
                        cand.uid
                    ),
                }
            }
        }

        let bits = if resolved.is_empty() {
            StatusBits::Unmatched
        } else {
            StatusBits::Matched
        };

        let rec = out_particles.len();
        out_particles.push(RecParticle { core, bits });
        for index in resolved {
            out_associations.push(RecToGenAssociation { rec, gen: index });
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
