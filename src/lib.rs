//! # Fast-Simulation Event-Data-Model Converter
//!
//! Translates the result graph of a fast detector-simulation engine (a flat
//! arena of candidate records with integer parent/child and provenance
//! links) into a normalized, relationally-linked event-data model for
//! downstream analysis.
//!
//! ## Architecture
//!
//! ```text
//! Engine (external)                    This crate                  Sink (external)
//! ─────────────────   ┌──────────────────────────────────────┐   ───────────────
//!                     │            EventConverter            │
//! CandidateGraph ────►│  ┌────────────┐  ┌───────────────┐   │──► EventData
//!  (one event,        │  │ Particle/  │  │ Track / Tower │   │     gen particles
//!   frozen)           │  │ Vertex     │  │ converters    │   │     gen vertices
//!                     │  └────────────┘  └───────────────┘   │     rec particles
//!                     │  ┌────────────┐  ┌───────────────┐   │     jets + tags
//!                     │  │ Jet + rec. │  │ MET converter │   │     METs
//!                     │  │ resolver   │  └───────────────┘   │     associations
//!                     │  └────────────┘                      │
//!                     └──────────────────────────────────────┘
//! ```
//!
//! ## Features
//! - One-pass vertex reconstruction with shared production/decay vertices
//!   (first-writer-wins slot merge, order independent)
//! - Beam-daughter correction for generator formats that lose the link
//!   between the colliding particles and their first-generation daughters
//! - Recursive provenance resolution from reconstructed objects through
//!   intermediate stages down to generated particles, with a depth guard
//! - Non-fatal degradation throughout: missing arrays, unresolved links and
//!   length mismatches warn and skip, they never abort the event
//!
//! Everything runs strictly one event at a time; the converter holds no
//! state across events beyond its counters.

// Input and output data models
pub mod candidate;
pub mod edm;
pub mod error;

// Conversion core
pub mod convert;


// Re-exports from the data models
pub use candidate::{Candidate, CandidateGraph, CandidateRange, FourMomentum, Position};
pub use edm::{
    EventData, GenParticle, GenVertex, Jet, JetToGenAssociation, JetToTagAssociation, Met,
    ParticleCore, Point, RecParticle, RecToGenAssociation, StatusBits, Tag,
};
pub use error::ConvertError;

// Re-exports from the conversion core
pub use convert::{ArrayNames, EventConverter};

/// Result type for conversion operations
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::candidate::{Candidate, CandidateGraph, CandidateRange, FourMomentum, Position};
    pub use crate::convert::{ArrayNames, EventConverter};
    pub use crate::edm::{EventData, StatusBits};
    pub use crate::{ConvertError, ConvertResult};
}
