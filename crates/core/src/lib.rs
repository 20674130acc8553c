//! Domain logic for the vitrina catalog backend.
//!
//! Pure types and rules, no I/O: product records and their validation,
//! street normalization and duplicate detection, the two-phase submission
//! payload rules, and the leaderboard/bonus merge rules. Persistence lives
//! in `vitrina-store`, transport in `vitrina-bot` and `vitrina-api`.

pub mod catalog;
pub mod error;
pub mod leaderboard;
pub mod submission;
