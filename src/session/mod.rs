//! Swipe session lifecycle and voting.

pub mod engine;

pub use engine::{SessionPhase, SessionSnapshot, SessionSummary, SwipeSession, Tally};
