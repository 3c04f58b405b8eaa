//! Engine-side candidate graph
//!
//! The simulation engine hands over one event as a flat arena of candidate
//! records. Candidates reference each other with plain integer links:
//!
//! - parent/child links are inclusive index ranges into the same arena
//!   (`mothers`, `daughters`), absent when the particle is a beam particle
//!   or a stable one;
//! - cross-stage provenance links are stable identifiers (`related`), where
//!   identifier `uid` names the candidate stored at arena slot `uid - 1`.
//!
//! Ground-truth generated particles occupy the leading arena slots, so a
//! stable identifier resolves to a generated particle exactly when
//! `uid - 1` falls below the generated-particle count. Reconstruction-stage
//! objects (tracks, clusters, towers, jets) are appended behind them and
//! exposed through named array views.
//!
//! The graph is frozen for the duration of one event: converters only read
//! it, and the engine resets it before the next event.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::RangeInclusive;

// ═══════════════════════════════════════════════════════════════════════════════
// FOUR-MOMENTUM (Relativistic Energy-Momentum)
// ═══════════════════════════════════════════════════════════════════════════════

/// Four-momentum vector in natural units (c = 1)
///
/// p^μ = (E, p_x, p_y, p_z)
///
/// Satisfies the mass-shell condition: E² - |p|² = m²
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FourMomentum {
    /// Energy component (timelike)
    pub e: f64,
    /// Momentum x-component
    pub px: f64,
    /// Momentum y-component
    pub py: f64,
    /// Momentum z-component (beam axis)
    pub pz: f64,
}

impl FourMomentum {
    /// Create a new four-momentum
    pub fn new(e: f64, px: f64, py: f64, pz: f64) -> Self {
        Self { e, px, py, pz }
    }

    /// Compute invariant mass squared: m² = E² - |p|²
    pub fn mass_squared(&self) -> f64 {
        self.e.powi(2) - self.px.powi(2) - self.py.powi(2) - self.pz.powi(2)
    }

    /// Compute invariant mass: m = √(E² - |p|²)
    /// Returns 0 for spacelike momenta
    pub fn mass(&self) -> f64 {
        let m2 = self.mass_squared();
        if m2 >= 0.0 {
            m2.sqrt()
        } else {
            0.0
        }
    }

    /// Compute 3-momentum magnitude: |p| = √(p_x² + p_y² + p_z²)
    pub fn three_momentum_magnitude(&self) -> f64 {
        (self.px.powi(2) + self.py.powi(2) + self.pz.powi(2)).sqrt()
    }

    /// Compute transverse momentum: p_T = √(p_x² + p_y²)
    pub fn transverse_momentum(&self) -> f64 {
        (self.px.powi(2) + self.py.powi(2)).sqrt()
    }

    /// Compute azimuthal angle: φ = atan2(p_y, p_x)
    pub fn azimuthal_angle(&self) -> f64 {
        self.py.atan2(self.px)
    }

    /// Compute pseudorapidity: η = -ln(tan(θ/2)) where θ is polar angle
    pub fn pseudorapidity(&self) -> f64 {
        let p = self.three_momentum_magnitude();
        if p.abs() > 1e-10 {
            0.5 * ((p + self.pz) / (p - self.pz + 1e-10)).ln()
        } else {
            0.0
        }
    }
}

impl std::ops::Add for FourMomentum {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(
            self.e + other.e,
            self.px + other.px,
            self.py + other.py,
            self.pz + other.pz,
        )
    }
}

impl std::ops::Neg for FourMomentum {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.e, -self.px, -self.py, -self.pz)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// POSITION (Spatial + Temporal Vertex Point)
// ═══════════════════════════════════════════════════════════════════════════════

/// Spatial and temporal point where a candidate is produced
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// x-coordinate
    pub x: f64,
    /// y-coordinate
    pub y: f64,
    /// z-coordinate
    pub z: f64,
    /// Time coordinate
    pub t: f64,
}

impl Position {
    /// Create a new position
    pub fn new(x: f64, y: f64, z: f64, t: f64) -> Self {
        Self { x, y, z, t }
    }

    /// Origin at time zero
    pub fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CANDIDATE RANGE (Inclusive Parent/Child Index Range)
// ═══════════════════════════════════════════════════════════════════════════════

/// Inclusive index range into the candidate array
///
/// An absent range (no parents, no children) is represented as
/// `Option::None` on the candidate itself, not as a sentinel value here.
/// The `last` bound is not trustworthy for beam candidates; iteration sites
/// clamp against the array length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRange {
    /// First index (inclusive)
    pub first: usize,
    /// Last index (inclusive)
    pub last: usize,
}

impl CandidateRange {
    /// Create a new range
    pub fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }

    /// Range covering a single index
    pub fn single(index: usize) -> Self {
        Self::new(index, index)
    }

    /// Iterate the covered indices (empty when `first > last`)
    pub fn indices(&self) -> RangeInclusive<usize> {
        self.first..=self.last
    }

    /// Check whether the range covers `index`
    pub fn contains(&self, index: usize) -> bool {
        index >= self.first && index <= self.last
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CANDIDATE (One Record in the Result Graph)
// ═══════════════════════════════════════════════════════════════════════════════

/// One record in the engine's result graph
///
/// Carries the kinematics of a generated or reconstructed object together
/// with its integer links into the rest of the graph. The `uid` field is
/// assigned by [`CandidateGraph::push`]; a fresh candidate starts with
/// `uid == 0` (unassigned).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Stable unique identifier, 1 + arena index
    pub uid: usize,
    /// Particle-type code (PDG id)
    pub pid: i32,
    /// Generator status code
    pub status: i32,
    /// Electric charge
    pub charge: i32,
    /// Four-momentum
    pub momentum: FourMomentum,
    /// Scalar mass (carried separately from the 4-vector; jets copy this
    /// value verbatim)
    pub mass: f64,
    /// Production point
    pub position: Position,
    /// Parent index range, `None` for beam particles
    pub mothers: Option<CandidateRange>,
    /// Child index range, `None` for stable particles
    pub daughters: Option<CandidateRange>,
    /// Stable identifiers of related candidates: "reconstructed-from" for
    /// tracks, "constituent-of" for towers and jets
    pub related: Vec<usize>,
    /// b-tag value (jets only)
    pub btag: f64,
    /// tau-tag value (jets only)
    pub tautag: f64,
}

impl Candidate {
    /// Create a new candidate with no links
    pub fn new(pid: i32, status: i32, momentum: FourMomentum, position: Position) -> Self {
        Self {
            uid: 0,
            pid,
            status,
            charge: 0,
            momentum,
            mass: momentum.mass(),
            position,
            mothers: None,
            daughters: None,
            related: Vec::new(),
            btag: 0.0,
            tautag: 0.0,
        }
    }

    /// Set the electric charge
    pub fn with_charge(mut self, charge: i32) -> Self {
        self.charge = charge;
        self
    }

    /// Set the scalar mass
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Set the parent index range
    pub fn with_mothers(mut self, first: usize, last: usize) -> Self {
        self.mothers = Some(CandidateRange::new(first, last));
        self
    }

    /// Set the child index range
    pub fn with_daughters(mut self, first: usize, last: usize) -> Self {
        self.daughters = Some(CandidateRange::new(first, last));
        self
    }

    /// Set the related-candidate identifiers
    pub fn with_related(mut self, related: Vec<usize>) -> Self {
        self.related = related;
        self
    }

    /// Set the jet tag values
    pub fn with_tags(mut self, btag: f64, tautag: f64) -> Self {
        self.btag = btag;
        self.tautag = tautag;
        self
    }

    /// Check if this is a beam candidate (no parent range)
    pub fn is_beam(&self) -> bool {
        self.mothers.is_none()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CANDIDATE GRAPH (Arena + Named Array Views)
// ═══════════════════════════════════════════════════════════════════════════════

/// The frozen result graph of one event
///
/// Owns every candidate record in a single arena and exposes the engine's
/// output stages as named arrays of arena indices. Converters hold `&self`
/// only; nothing here is mutated during conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateGraph {
    candidates: Vec<Candidate>,
    arrays: HashMap<String, Vec<usize>>,
}

impl CandidateGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a candidate, assigning its stable identifier
    ///
    /// Returns the arena index. Generated particles must be pushed before
    /// any reconstruction-stage object so their identifiers stay inside the
    /// ground-truth range.
    pub fn push(&mut self, mut candidate: Candidate) -> usize {
        let index = self.candidates.len();
        candidate.uid = index + 1;
        self.candidates.push(candidate);
        index
    }

    /// Register a named array view over the arena
    pub fn register_array(&mut self, name: &str, indices: Vec<usize>) {
        self.arrays.insert(name.to_string(), indices);
    }

    /// Look up a named array, `None` when the engine did not produce it
    pub fn array(&self, name: &str) -> Option<&[usize]> {
        self.arrays.get(name).map(|v| v.as_slice())
    }

    /// Candidate at the given arena index
    pub fn candidate(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    /// Resolve a stable identifier back to its candidate
    pub fn resolve_uid(&self, uid: usize) -> Option<&Candidate> {
        if uid == 0 {
            return None;
        }
        self.candidates.get(uid - 1)
    }

    /// Number of candidates in the arena
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
