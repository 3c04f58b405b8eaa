//! Relational event-data model
//!
//! Output side of the conversion: one flat, index-linked collection per
//! entity type, bundled per event in [`EventData`]. Entities are created
//! fresh for every event, fully populated before hand-off, and never
//! mutated afterward. Relations between entities are plain collection
//! indices carried by association records:
//!
//! | Association                | Pairs                        |
//! |----------------------------|------------------------------|
//! | [`RecToGenAssociation`]    | reconstructed ↔ generated    |
//! | [`JetToGenAssociation`]    | jet ↔ generated              |
//! | [`JetToTagAssociation`]    | jet ↔ b-tag or tau-tag       |

use crate::candidate::{Candidate, Position};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// POINT
// ═══════════════════════════════════════════════════════════════════════════════

/// Spatial point (vertex time lives in the vertex's proper-time field)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// x-coordinate
    pub x: f64,
    /// y-coordinate
    pub y: f64,
    /// z-coordinate
    pub z: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<Position> for Point {
    fn from(position: Position) -> Self {
        Self::new(position.x, position.y, position.z)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STATUS BITS
// ═══════════════════════════════════════════════════════════════════════════════

/// Structural classification of an output particle
///
/// Assigned once at creation, never revised. `Beam`/`Stable`/`Decayed`
/// classify generated particles by their link topology;
/// `Matched`/`Unmatched` classify reconstructed particles by whether a
/// provenance link back to a generated particle was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusBits {
    /// Beam particle (no parent range)
    Beam,
    /// Stable particle (no child range)
    Stable,
    /// Decayed particle (both ranges present)
    Decayed,
    /// Reconstructed particle with a resolved generated-particle link
    Matched,
    /// Reconstructed particle with no resolvable link
    Unmatched,
}

impl StatusBits {
    /// Get a human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            StatusBits::Beam => "beam",
            StatusBits::Stable => "stable",
            StatusBits::Decayed => "decayed",
            StatusBits::Matched => "matched",
            StatusBits::Unmatched => "unmatched",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARTICLE CORE
// ═══════════════════════════════════════════════════════════════════════════════

/// Kinematic core shared by generated and reconstructed particles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleCore {
    /// Particle-type code (PDG id)
    pub pdg_id: i32,
    /// Generator status code
    pub status: i32,
    /// Momentum x-component
    pub px: f64,
    /// Momentum y-component
    pub py: f64,
    /// Momentum z-component
    pub pz: f64,
    /// Invariant mass
    pub mass: f64,
    /// Electric charge
    pub charge: i32,
    /// Production point
    pub vertex: Point,
}

impl ParticleCore {
    /// Copy the kinematic core out of a candidate record
    pub fn from_candidate(cand: &Candidate) -> Self {
        Self {
            pdg_id: cand.pid,
            status: cand.status,
            px: cand.momentum.px,
            py: cand.momentum.py,
            pz: cand.momentum.pz,
            mass: cand.momentum.mass(),
            charge: cand.charge,
            vertex: Point::from(cand.position),
        }
    }

    /// Energy reconstructed from momentum and mass: E = √(|p|² + m²)
    pub fn energy(&self) -> f64 {
        (self.px.powi(2) + self.py.powi(2) + self.pz.powi(2) + self.mass.powi(2)).sqrt()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// GENERATED PARTICLES & VERTICES
// ═══════════════════════════════════════════════════════════════════════════════

/// Ground-truth generated particle
///
/// `start_vertex`/`end_vertex` index [`EventData::gen_vertices`]. A
/// particle with unresolved links simply carries `None` there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenParticle {
    /// Kinematic core
    pub core: ParticleCore,
    /// Structural classification
    pub bits: StatusBits,
    /// Production vertex index
    pub start_vertex: Option<usize>,
    /// Decay vertex index
    pub end_vertex: Option<usize>,
}

/// Shared production/decay vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenVertex {
    /// Spatial point
    pub position: Point,
    /// Proper time, copied from the producing candidate's time coordinate
    pub ctau: f64,
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECONSTRUCTED PARTICLES
// ═══════════════════════════════════════════════════════════════════════════════

/// Reconstructed particle (muon, electron, charged hadron, neutral hadron
/// or photon; the five flavors share the type)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecParticle {
    /// Kinematic core
    pub core: ParticleCore,
    /// `Matched` or `Unmatched`
    pub bits: StatusBits,
}

// ═══════════════════════════════════════════════════════════════════════════════
// JETS & TAGS
// ═══════════════════════════════════════════════════════════════════════════════

/// Reconstructed jet
///
/// The mass is the candidate's scalar mass field, copied verbatim. The
/// area is not computed and carries the -1 sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Jet {
    /// Momentum x-component
    pub px: f64,
    /// Momentum y-component
    pub py: f64,
    /// Momentum z-component
    pub pz: f64,
    /// Scalar mass
    pub mass: f64,
    /// Jet area sentinel, always -1
    pub area: f64,
}

impl Jet {
    /// Energy reconstructed from momentum and mass: E = √(|p|² + m²)
    pub fn energy(&self) -> f64 {
        (self.px.powi(2) + self.py.powi(2) + self.pz.powi(2) + self.mass.powi(2)).sqrt()
    }
}

/// Scalar classification value attached to a jet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag value
    pub value: f64,
}

// ═══════════════════════════════════════════════════════════════════════════════
// MISSING ENERGY
// ═══════════════════════════════════════════════════════════════════════════════

/// Missing transverse energy with optional scalar momentum sum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Met {
    /// Missing transverse energy magnitude
    pub magnitude: f64,
    /// Azimuthal angle of the recoil (negated momentum)
    pub phi: f64,
    /// Scalar momentum sum, -1 when unavailable for the event
    pub scalar_sum: f64,
}

// ═══════════════════════════════════════════════════════════════════════════════
// ASSOCIATIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Reconstructed-particle ↔ generated-particle relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecToGenAssociation {
    /// Index into the reconstructed collection
    pub rec: usize,
    /// Index into [`EventData::gen_particles`]
    pub gen: usize,
}

/// Jet ↔ generated-particle relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JetToGenAssociation {
    /// Index into [`EventData::jets`]
    pub jet: usize,
    /// Index into [`EventData::gen_particles`]
    pub gen: usize,
}

/// Jet ↔ tag relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JetToTagAssociation {
    /// Index into [`EventData::jets`]
    pub jet: usize,
    /// Index into the tag collection
    pub tag: usize,
}

// ═══════════════════════════════════════════════════════════════════════════════
// EVENT DATA (Per-Event Collection Bundle)
// ═══════════════════════════════════════════════════════════════════════════════

/// Every output collection of one converted event
///
/// Collections are in creation order; all cross-references are indices
/// into sibling collections of the same bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    /// Generated particles, index-aligned with the input candidate array
    pub gen_particles: Vec<GenParticle>,
    /// Deduplicated production/decay vertices
    pub gen_vertices: Vec<GenVertex>,
    /// Reconstructed muons
    pub muons: Vec<RecParticle>,
    /// Reconstructed electrons
    pub electrons: Vec<RecParticle>,
    /// Reconstructed charged hadrons
    pub charged: Vec<RecParticle>,
    /// Reconstructed neutral hadrons
    pub neutral: Vec<RecParticle>,
    /// Reconstructed photons
    pub photons: Vec<RecParticle>,
    /// Reconstructed jets
    pub jets: Vec<Jet>,
    /// b-tags, one per jet
    pub btags: Vec<Tag>,
    /// tau-tags, one per jet
    pub tautags: Vec<Tag>,
    /// Missing-energy entries
    pub mets: Vec<Met>,
    /// Muon ↔ generated-particle associations
    pub muons_to_gen: Vec<RecToGenAssociation>,
    /// Electron ↔ generated-particle associations
    pub electrons_to_gen: Vec<RecToGenAssociation>,
    /// Charged-hadron ↔ generated-particle associations
    pub charged_to_gen: Vec<RecToGenAssociation>,
    /// Neutral-hadron ↔ generated-particle associations
    pub neutral_to_gen: Vec<RecToGenAssociation>,
    /// Photon ↔ generated-particle associations
    pub photons_to_gen: Vec<RecToGenAssociation>,
    /// Jet ↔ generated-particle associations
    pub jets_to_gen: Vec<JetToGenAssociation>,
    /// Jet ↔ b-tag associations
    pub jets_to_btags: Vec<JetToTagAssociation>,
    /// Jet ↔ tau-tag associations
    pub jets_to_tautags: Vec<JetToTagAssociation>,
}

impl EventData {
    /// Create an empty bundle
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of reconstructed particles across the five flavors
    pub fn rec_particle_count(&self) -> usize {
        self.muons.len()
            + self.electrons.len()
            + self.charged.len()
            + self.neutral.len()
            + self.photons.len()
    }

    /// Total number of reconstructed-particle ↔ generated associations
    pub fn rec_to_gen_count(&self) -> usize {
        self.muons_to_gen.len()
            + self.electrons_to_gen.len()
            + self.charged_to_gen.len()
            + self.neutral_to_gen.len()
            + self.photons_to_gen.len()
    }

    /// Get summary string
    pub fn summary(&self) -> String {
        format!(
            "Event Data:\n\
             ├─ Gen: {} particles, {} vertices\n\
             ├─ Rec: {} muons, {} electrons, {} charged, {} neutral, {} photons\n\
             ├─ Jets: {} ({} b-tags, {} tau-tags)\n\
             ├─ MET: {}\n\
             └─ Associations: {} rec-gen, {} jet-gen, {} jet-tag",
            self.gen_particles.len(),
            self.gen_vertices.len(),
            self.muons.len(),
            self.electrons.len(),
            self.charged.len(),
            self.neutral.len(),
            self.photons.len(),
            self.jets.len(),
            self.btags.len(),
            self.tautags.len(),
            self.mets.len(),
            self.rec_to_gen_count(),
            self.jets_to_gen.len(),
            self.jets_to_btags.len() + self.jets_to_tautags.len()
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
