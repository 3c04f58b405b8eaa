//! Track conversion (muons, electrons, charged hadrons)
//!
//! One output particle per input entry and at most one provenance link,
//! read from the first entry of the candidate's related list. A track whose
//! link cannot be resolved is emitted `Unmatched` with no association; that
//! is a warning, not a failure.

use crate::candidate::CandidateGraph;
use crate::edm::{ParticleCore, RecParticle, RecToGenAssociation, StatusBits};

/// Convert one track-stage array into reconstructed particles
pub fn convert_tracks(
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
                log::warn!("track array references missing arena slot {}", id);
                continue;
            }
        };

        let core = ParticleCore::from_candidate(cand);

        // Only the first related candidate points back at the generator
        let gen_index = cand
            .related
            .first()
            .and_then(|&uid| uid.checked_sub(1))
            .filter(|&index| index < gen_count);

        match gen_index {
            Some(index) => {
                let rec = out_particles.len();
                out_particles.push(RecParticle {
                    core,
                    bits: StatusBits::Matched,
                });
                out_associations.push(RecToGenAssociation { rec, gen: index });
            }
            None => {
                log::warn!(
                    "cannot relate track candidate {} to a generated particle",
                    cand.uid
                );
                out_particles.push(RecParticle {
                    core,
                    bits: StatusBits::Unmatched,
                });
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
