//! Missing-energy conversion
//!
//! Pairs entry `j` of the missing-energy array with entry `j` of the
//! scalar-sum array by position. A length mismatch disables the scalar sum
//! for the whole event (sentinel -1), not per entry.

use crate::candidate::CandidateGraph;
use crate::edm::Met;

/// Convert the missing-energy and scalar-sum arrays
pub fn convert_met(
    graph: &CandidateGraph,
    input_met: &[usize],
    input_sht: &[usize],
    out_mets: &mut Vec<Met>,
) {
    let mut save_scalar_sum = true;
    if input_met.len() != input_sht.len() {
        save_scalar_sum = false;
        log::warn!(
            "missing-energy and scalar-sum arrays differ in length ({} vs {}); \
             scalar sum disabled for this event",
            input_met.len(),
            input_sht.len()
        );
    }

    for (j, &id) in input_met.iter().enumerate() {
        let cand = match graph.candidate(id) {
            Some(c) => c,
            None => {
                log::warn!("missing-energy array references missing arena slot {}", id);
                continue;
            }
        };

        let scalar_sum = if save_scalar_sum {
            input_sht
                .get(j)
                .and_then(|&sid| graph.candidate(sid))
                .map(|s| s.momentum.transverse_momentum())
                .unwrap_or(-1.0)
        } else {
            -1.0
        };

        out_mets.push(Met {
            magnitude: cand.momentum.transverse_momentum(),
            phi: (-cand.momentum).azimuthal_angle(),
            scalar_sum,
        });
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
