//! Touchslot Multi-Touch Engine
//!
//! Turns raw per-frame touch observations into a stable, slot-indexed
//! contact model with persistent tracking ids:
//!
//! - **Slot store:** per-slot property records, the active (touch) set and
//!   the set of slots updated during the current frame
//! - **Matching:** minimum-weight bipartite assignment used to correlate
//!   anonymous contacts with active slots by squared distance
//! - **Frame buffer:** provisional contact records collected between two
//!   sync points when re-matching is enabled
//! - **Engine:** protocol type A/B normalization, tracking-id assignment,
//!   autorelease and the single-touch compatibility echo
//!
//! The engine is a plain owned value. Every operation takes `&mut self`,
//! completes synchronously and never allocates after construction.

pub mod compat;
pub mod config;
pub mod engine;
pub mod frame;
pub mod matching;
pub mod sink;
pub mod slot_set;
pub mod state;
pub mod store;

pub use config::{AbsRange, MtCaps, MtConfig};
pub use engine::{Disposition, MtEngine};
pub use matching::{CostMatrix, Matcher};
pub use sink::{EventSink, NullSink};
pub use slot_set::SlotSet;
pub use state::MtState;
pub use touchslot_common::MtProtocol;
