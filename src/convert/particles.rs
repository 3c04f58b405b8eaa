//! Generated-particle and vertex conversion
//!
//! Walks the full candidate array once, emits one output particle per
//! candidate (index order preserved) and reconstructs the deduplicated set
//! of production/decay vertices.
//!
//! Vertex sharing runs over a parallel slot array. A slot holds the index
//! of an already-emitted particle whose opposite-end vertex coincides:
//!
//! - `start[j] = h` → particle `j` shares particle `h`'s end vertex
//! - `end[j] = h`   → particle `j` shares particle `h`'s start vertex
//!
//! A slot is only ever written while unset (first writer wins), which keeps
//! the result independent of how parents and children are interleaved in
//! the array. After a particle creates its own vertex it marks its slot
//! occupied; those self-markers are never read back.
//!
//! Beam candidates carry an untrustworthy child-range upper bound (some
//! generator input formats lose the direct link between the colliding
//! particles and their first-generation daughters). A pre-pass gathers the
//! true daughter sets from the children's parent ranges instead; see
//! [`beam_daughters`].

use crate::candidate::CandidateGraph;
use crate::edm::{GenParticle, GenVertex, ParticleCore, Point, StatusBits};
use std::collections::BTreeSet;

/// Start/end vertex slots of one candidate, `None` while unset
#[derive(Debug, Clone, Copy, Default)]
struct VertexSlots {
    start: Option<usize>,
    end: Option<usize>,
}

/// Collect the corrected daughter sets of the two beam candidates
///
/// Scans every candidate's parent range and records array positions whose
/// range covers index 0 (first beam) or index 1 (second beam). The sets are
/// ordered so later propagation is deterministic.
pub fn beam_daughters(
    graph: &CandidateGraph,
    input: &[usize],
) -> (BTreeSet<usize>, BTreeSet<usize>) {
    let mut first_beam = BTreeSet::new();
    let mut second_beam = BTreeSet::new();

    for (j, &id) in input.iter().enumerate() {
        let cand = match graph.candidate(id) {
            Some(c) => c,
            None => continue,
        };
        if let Some(mothers) = cand.mothers {
            for mother in mothers.indices() {
                if mother == 0 {
                    first_beam.insert(j);
                }
                if mother == 1 {
                    second_beam.insert(j);
                }
            }
        }
    }

    (first_beam, second_beam)
}

/// Convert the full candidate array into generated particles and vertices
///
/// Output particle `j` corresponds exactly to candidate `j` of `input`.
/// Candidates with unresolved links end up with fewer or no vertices
/// attached; that is not an error condition.
pub fn convert_gen_particles(
    graph: &CandidateGraph,
    input: &[usize],
    out_particles: &mut Vec<GenParticle>,
    out_vertices: &mut Vec<GenVertex>,
) {
    let n = input.len();
    let mut slots = vec![VertexSlots::default(); n];

    let (first_beam_daughters, second_beam_daughters) = beam_daughters(graph, input);

    for (j, &id) in input.iter().enumerate() {
        let cand = match graph.candidate(id) {
            Some(c) => c,
            None => {
                log::warn!("candidate array references missing arena slot {}", id);
                continue;
            }
        };

        let bits = if cand.mothers.is_none() {
            StatusBits::Beam
        } else if cand.daughters.is_none() {
            StatusBits::Stable
        } else {
            StatusBits::Decayed
        };

        let mut particle = GenParticle {
            core: ParticleCore::from_candidate(cand),
            bits,
            start_vertex: None,
            end_vertex: None,
        };

        // Production vertex
        if let Some(mothers) = cand.mothers {
            match slots[j].start {
                Some(holder) => {
                    particle.start_vertex = out_particles.get(holder).and_then(|p| p.end_vertex);
                }
                None => {
                    particle.start_vertex = Some(out_vertices.len());
                    out_vertices.push(GenVertex {
                        position: Point::from(cand.position),
                        ctau: cand.position.t,
                    });
                    slots[j].start = Some(j);
                }
            }
            for mother in mothers.indices() {
                if mother < n && slots[mother].end.is_none() {
                    slots[mother].end = Some(j);
                }
            }
        }

        // Decay vertex
        if let Some(daughters) = cand.daughters {
            if let Some(holder) = slots[j].end {
                particle.end_vertex = out_particles.get(holder).and_then(|p| p.start_vertex);
            } else if let Some(first) = input
                .get(daughters.first)
                .and_then(|&d| graph.candidate(d))
            {
                // The vertex sits at the first daughter's position; only the
                // first bound of the child range is trustworthy here.
                particle.end_vertex = Some(out_vertices.len());
                out_vertices.push(GenVertex {
                    position: Point::from(first.position),
                    ctau: cand.position.t,
                });
                slots[j].end = Some(daughters.first);
            }

            if cand.mothers.is_none() {
                // Beam candidates: substitute the corrected daughter sets
                let corrected = match j {
                    0 => Some(&first_beam_daughters),
                    1 => Some(&second_beam_daughters),
                    _ => None,
                };
                if let Some(set) = corrected {
                    for &daughter in set {
                        if daughter < n && slots[daughter].start.is_none() {
                            slots[daughter].start = Some(j);
                        }
                    }
                }
            } else {
                for daughter in daughters.indices() {
                    if daughter < n && slots[daughter].start.is_none() {
                        slots[daughter].start = Some(j);
                    }
                }
            }
        }

        log::debug!(
            "gen particle {:>3}: pdg {:>6} stat {:>2} bits {:<9} start {:?} end {:?}",
            j,
            cand.pid,
            cand.status,
            particle.bits.name(),
            particle.start_vertex,
            particle.end_vertex,
        );

        out_particles.push(particle);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{Candidate, FourMomentum, Position};

    fn particle_at(x: f64, y: f64, z: f64) -> Candidate {
        Candidate::new(
            1,
            1,
            FourMomentum::new(10.0, 1.0, 0.0, 0.0),
            Position::new(x, y, z, 0.0),
        )
    }

    fn convert(graph: &CandidateGraph) -> (Vec<GenParticle>, Vec<GenVertex>) {
        let input: Vec<usize> = (0..graph.len()).collect();
        let mut particles = Vec::new();
        let mut vertices = Vec::new();
        convert_gen_particles(graph, &input, &mut particles, &mut vertices);
        (particles, vertices)
    }

    #[test]
    fn test_status_bit_classification() {
        let mut graph = CandidateGraph::new();
        graph.push(particle_at(0.0, 0.0, -10.0).with_daughters(1, 1));
        graph.push(particle_at(0.0, 0.0, 0.0).with_mothers(0, 0).with_daughters(2, 2));
        graph.push(particle_at(1.0, 0.0, 0.0).with_mothers(1, 1));

        let (particles, _) = convert(&graph);
        assert_eq!(particles[0].bits, StatusBits::Beam);
        assert_eq!(particles[1].bits, StatusBits::Decayed);
        assert_eq!(particles[2].bits, StatusBits::Stable);
    }

    #[test]
    fn test_parent_child_share_one_vertex() {
        // beam(0) → X(1) → Y(2): two physical vertices, each shared
        let mut graph = CandidateGraph::new();
        graph.push(particle_at(0.0, 0.0, -10.0).with_daughters(1, 1));
        graph.push(particle_at(0.0, 0.0, 0.0).with_mothers(0, 0).with_daughters(2, 2));
        graph.push(particle_at(1.0, 0.0, 0.0).with_mothers(1, 1));

        let (particles, vertices) = convert(&graph);
        assert_eq!(vertices.len(), 2);

        // Beam's end vertex is X's start vertex
        assert!(particles[0].end_vertex.is_some());
        assert_eq!(particles[0].end_vertex, particles[1].start_vertex);
        // X's end vertex is Y's start vertex
        assert_eq!(particles[1].end_vertex, particles[2].start_vertex);
        assert!(particles[0].start_vertex.is_none());
        assert!(particles[2].end_vertex.is_none());
    }

    #[test]
    fn test_vertex_count_stable_under_reversed_order() {
        // Same decay chain laid out parents-first and children-first must
        // give the same vertex count and the same point grouping.
        let mut forward = CandidateGraph::new();
        forward.push(particle_at(0.0, 0.0, -10.0).with_daughters(1, 1));
        forward.push(particle_at(0.0, 0.0, 0.0).with_mothers(0, 0).with_daughters(2, 2));
        forward.push(particle_at(1.0, 0.0, 0.0).with_mothers(1, 1));

        let mut reversed = CandidateGraph::new();
        reversed.push(particle_at(1.0, 0.0, 0.0).with_mothers(1, 1));
        reversed.push(particle_at(0.0, 0.0, 0.0).with_mothers(2, 2).with_daughters(0, 0));
        reversed.push(particle_at(0.0, 0.0, -10.0).with_daughters(1, 1));

        let (_, fwd_vertices) = convert(&forward);
        let (_, rev_vertices) = convert(&reversed);

        assert_eq!(fwd_vertices.len(), rev_vertices.len());

        let mut fwd_points: Vec<(i64, i64, i64)> = fwd_vertices
            .iter()
            .map(|v| {
                (
                    (v.position.x * 1e6) as i64,
                    (v.position.y * 1e6) as i64,
                    (v.position.z * 1e6) as i64,
                )
            })
            .collect();
        let mut rev_points: Vec<(i64, i64, i64)> = rev_vertices
            .iter()
            .map(|v| {
                (
                    (v.position.x * 1e6) as i64,
                    (v.position.y * 1e6) as i64,
                    (v.position.z * 1e6) as i64,
                )
            })
            .collect();
        fwd_points.sort_unstable();
        rev_points.sort_unstable();
        assert_eq!(fwd_points, rev_points);
    }

    #[test]
    fn test_vertex_round_trip_points() {
        let mut graph = CandidateGraph::new();
        graph.push(particle_at(0.0, 0.0, -10.0).with_daughters(1, 1));
        graph.push(particle_at(0.5, 0.25, 0.0).with_mothers(0, 0).with_daughters(2, 2));
        graph.push(particle_at(1.0, 2.0, 3.0).with_mothers(1, 1));

        let (particles, vertices) = convert(&graph);

        // Start vertex point equals the particle's own position
        let start = particles[1].start_vertex.unwrap();
        assert!((vertices[start].position.x - 0.5).abs() < 1e-10);
        assert!((vertices[start].position.y - 0.25).abs() < 1e-10);

        // End vertex point equals the first child's position
        let end = particles[1].end_vertex.unwrap();
        assert!((vertices[end].position.x - 1.0).abs() < 1e-10);
        assert!((vertices[end].position.z - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_beam_daughter_correction() {
        // Beam pair at 0 and 1. Native child ranges only cover index 2 (the
        // upper bound is broken upstream), but candidate 3's parent range
        // proves it is a first-generation daughter too.
        let mut graph = CandidateGraph::new();
        graph.push(particle_at(0.0, 0.0, -10.0).with_daughters(2, 2));
        graph.push(particle_at(0.0, 0.0, 10.0).with_daughters(2, 2));
        graph.push(particle_at(0.0, 0.0, 0.0).with_mothers(0, 0).with_daughters(4, 4));
        graph.push(particle_at(0.0, 0.0, 0.0).with_mothers(0, 1).with_daughters(4, 4));
        graph.push(particle_at(1.0, 0.0, 0.0).with_mothers(2, 3));

        let input: Vec<usize> = (0..graph.len()).collect();
        let (first_beam, second_beam) = beam_daughters(&graph, &input);
        assert!(first_beam.contains(&2));
        assert!(first_beam.contains(&3));
        assert!(second_beam.contains(&3));
        assert!(!second_beam.contains(&2));

        let (particles, _) = convert(&graph);

        // Candidate 3 shares the first beam's end vertex even though the
        // beam's native child range does not cover index 3.
        assert!(particles[3].start_vertex.is_some());
        assert_eq!(particles[3].start_vertex, particles[0].end_vertex);
        assert_eq!(particles[2].start_vertex, particles[0].end_vertex);
    }

    #[test]
    fn test_unlinked_candidate_has_no_vertices() {
        let mut graph = CandidateGraph::new();
        graph.push(particle_at(0.0, 0.0, 0.0));

        let (particles, vertices) = convert(&graph);
        assert_eq!(particles.len(), 1);
        assert!(vertices.is_empty());
        assert!(particles[0].start_vertex.is_none());
        assert!(particles[0].end_vertex.is_none());
        assert_eq!(particles[0].bits, StatusBits::Beam);
    }
}
