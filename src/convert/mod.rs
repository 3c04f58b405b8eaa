//! # Candidate-Graph → Event-Data-Model Conversion
//!
//! Translates the engine's frozen per-event candidate graph into the
//! relational output collections of [`EventData`](crate::edm::EventData).
//! Four converters run independently over named array views of the graph:
//!
//! ```text
//!                        CANDIDATE GRAPH (one event)
//!     ┌──────────────────────────────────────────────────────────────┐
//!     │  allParticles │ muons │ … │ photons │ jets │ MET │ scalarHT  │
//!     └───────┬───────────┬────────────┬────────┬─────────┬──────────┘
//!             │           │            │        │         │
//!             ▼           ▼            ▼        ▼         ▼
//!       ┌──────────┐ ┌─────────┐ ┌─────────┐ ┌──────┐ ┌───────┐
//!       │ Particle │ │  Track  │ │  Tower  │ │ Jet  │ │  MET  │
//!       │ /Vertex  │ │(direct) │ │(cluster │ │(rec.)│ │(pair) │
//!       │          │ │         │ │  hop)   │ │      │ │       │
//!       └────┬─────┘ └────┬────┘ └────┬────┘ └──┬───┘ └───┬───┘
//!            │            │           │         │         │
//!            ▼            ▼           ▼         ▼         ▼
//!      gen particles  rec particles + associations   jets/tags/METs
//!      + vertices
//! ```
//!
//! All converters read the same graph; each writes only its own output
//! collections. A named array the engine did not produce is skipped with a
//! warning, never an error.

pub mod jets;
pub mod met;
pub mod particles;
pub mod resolve;
pub mod tracks;
pub mod towers;

pub use jets::convert_jets;
pub use met::convert_met;
pub use particles::{beam_daughters, convert_gen_particles};
pub use resolve::{resolve_gen_refs, MAX_RELATION_DEPTH};
pub use tracks::convert_tracks;
pub use towers::convert_towers;

use crate::candidate::CandidateGraph;
use crate::edm::EventData;
use crate::ConvertResult;
use serde::{Deserialize, Serialize};
use std::time::Instant;

// ═══════════════════════════════════════════════════════════════════════════════
// ARRAY NAMES (Configuration Surface)
// ═══════════════════════════════════════════════════════════════════════════════

/// Names of the engine output arrays to convert
///
/// The engine exposes each reconstruction stage under the name of the
/// module that produced it; which module runs last is a matter of detector
/// configuration, so the names are configurable. The defaults match the
/// conventional module paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayNames {
    /// Full generator-level particle array
    pub all_particles: String,
    /// Stable generator-level particles (engine export, not converted)
    pub stable_particles: String,
    /// Partons (engine export, not converted)
    pub partons: String,
    /// Reconstructed muons
    pub muons: String,
    /// Reconstructed electrons
    pub electrons: String,
    /// Reconstructed charged hadrons
    pub charged: String,
    /// Reconstructed neutral hadrons
    pub neutral: String,
    /// Reconstructed photons
    pub photons: String,
    /// Reconstructed jets
    pub jets: String,
    /// Missing transverse energy
    pub met: String,
    /// Scalar momentum sum
    pub scalar_ht: String,
}

impl Default for ArrayNames {
    fn default() -> Self {
        Self {
            all_particles: "allParticles".to_string(),
            stable_particles: "stableParticles".to_string(),
            partons: "partons".to_string(),
            muons: "MuonIsolation/muons".to_string(),
            electrons: "ElectronIsolation/electrons".to_string(),
            charged: "ChargedHadronMomentumSmearing/chargedHadrons".to_string(),
            neutral: "Hcal/eflowNeutralHadrons".to_string(),
            photons: "PhotonIsolation/photons".to_string(),
            jets: "JetEnergyScale/jets".to_string(),
            met: "MissingET/momentum".to_string(),
            scalar_ht: "ScalarHT/energy".to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EVENT CONVERTER (Per-Run Session)
// ═══════════════════════════════════════════════════════════════════════════════

/// Converts one event at a time, keeping per-run counters
///
/// The converter holds no per-event state: every call to
/// [`convert_event`](Self::convert_event) starts from an empty
/// [`EventData`] and hands it back fully populated.
#[derive(Debug)]
pub struct EventConverter {
    names: ArrayNames,
    events_converted: u64,
}

impl EventConverter {
    /// Create a converter with the given array names
    pub fn new(names: ArrayNames) -> Self {
        Self {
            names,
            events_converted: 0,
        }
    }

    /// Array names this converter reads
    pub fn names(&self) -> &ArrayNames {
        &self.names
    }

    /// Number of events converted so far in this run
    pub fn events_converted(&self) -> u64 {
        self.events_converted
    }

    /// Convert one event's candidate graph into its output collections
    pub fn convert_event(&mut self, graph: &CandidateGraph) -> ConvertResult<EventData> {
        let started = Instant::now();
        let mut event = EventData::new();

        // Generated particles and vertices
        match graph.array(&self.names.all_particles) {
            Some(input) => convert_gen_particles(
                graph,
                input,
                &mut event.gen_particles,
                &mut event.gen_vertices,
            ),
            None => log::warn!(
                "cannot convert generator array '{}': not present in this event",
                self.names.all_particles
            ),
        }
        let gen_count = event.gen_particles.len();

        // Track stages
        match graph.array(&self.names.muons) {
            Some(input) => convert_tracks(
                graph,
                input,
                gen_count,
                &mut event.muons,
                &mut event.muons_to_gen,
            ),
            None => log::warn!(
                "cannot convert muon array '{}': not present in this event",
                self.names.muons
            ),
        }
        match graph.array(&self.names.electrons) {
            Some(input) => convert_tracks(
                graph,
                input,
                gen_count,
                &mut event.electrons,
                &mut event.electrons_to_gen,
            ),
            None => log::warn!(
                "cannot convert electron array '{}': not present in this event",
                self.names.electrons
            ),
        }
        match graph.array(&self.names.charged) {
            Some(input) => convert_tracks(
                graph,
                input,
                gen_count,
                &mut event.charged,
                &mut event.charged_to_gen,
            ),
            None => log::warn!(
                "cannot convert charged hadron array '{}': not present in this event",
                self.names.charged
            ),
        }

        // Tower stages
        match graph.array(&self.names.neutral) {
            Some(input) => convert_towers(
                graph,
                input,
                gen_count,
                &mut event.neutral,
                &mut event.neutral_to_gen,
            ),
            None => log::warn!(
                "cannot convert neutral hadron array '{}': not present in this event",
                self.names.neutral
            ),
        }
        match graph.array(&self.names.photons) {
            Some(input) => convert_towers(
                graph,
                input,
                gen_count,
                &mut event.photons,
                &mut event.photons_to_gen,
            ),
            None => log::warn!(
                "cannot convert photon array '{}': not present in this event",
                self.names.photons
            ),
        }

        // Jets
        match graph.array(&self.names.jets) {
            Some(input) => convert_jets(graph, input, gen_count, &mut event)?,
            None => log::warn!(
                "cannot convert jet array '{}': not present in this event",
                self.names.jets
            ),
        }

        // Missing energy needs both arrays
        let met_input = graph.array(&self.names.met);
        let sht_input = graph.array(&self.names.scalar_ht);
        if met_input.is_none() {
            log::warn!(
                "cannot convert missing-energy array '{}': not present in this event",
                self.names.met
            );
        }
        if sht_input.is_none() {
            log::warn!(
                "cannot convert scalar-sum array '{}': not present in this event",
                self.names.scalar_ht
            );
        }
        if let (Some(met_input), Some(sht_input)) = (met_input, sht_input) {
            convert_met(graph, met_input, sht_input, &mut event.mets);
        }

        self.events_converted += 1;
        log::debug!(
            "event {} converted in {:?}: {} gen, {} rec, {} jets, {} mets",
            self.events_converted,
            started.elapsed(),
            event.gen_particles.len(),
            event.rec_particle_count(),
            event.jets.len(),
            event.mets.len(),
        );

        Ok(event)
    }
}

impl Default for EventConverter {
    fn default() -> Self {
        Self::new(ArrayNames::default())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{Candidate, FourMomentum, Position};

    #[test]
    fn test_default_array_names() {
        let names = ArrayNames::default();
        assert_eq!(names.all_particles, "allParticles");
        assert_eq!(names.jets, "JetEnergyScale/jets");
    }

    #[test]
    fn test_missing_arrays_skip_outputs() {
        let graph = CandidateGraph::new();
        let mut converter = EventConverter::default();

        let event = converter.convert_event(&graph).unwrap();
        assert!(event.gen_particles.is_empty());
        assert!(event.muons.is_empty());
        assert!(event.jets.is_empty());
        assert!(event.mets.is_empty());
        assert_eq!(converter.events_converted(), 1);
    }

    #[test]
    fn test_event_counter_increments() {
        let mut graph = CandidateGraph::new();
        let id = graph.push(Candidate::new(
            2212,
            4,
            FourMomentum::new(6500.0, 0.0, 0.0, 6500.0),
            Position::origin(),
        ));
        graph.register_array("allParticles", vec![id]);

        let mut converter = EventConverter::default();
        converter.convert_event(&graph).unwrap();
        converter.convert_event(&graph).unwrap();
        assert_eq!(converter.events_converted(), 2);
    }

    #[test]
    fn test_met_requires_both_arrays() {
        let mut graph = CandidateGraph::new();
        let met = graph.push(Candidate::new(
            0,
            0,
            FourMomentum::new(30.0, 30.0, 0.0, 0.0),
            Position::origin(),
        ));
        graph.register_array("MissingET/momentum", vec![met]);
        // Scalar-sum array deliberately absent

        let mut converter = EventConverter::default();
        let event = converter.convert_event(&graph).unwrap();
        assert!(event.mets.is_empty());
    }
}
