//! The six pipeline stages, in canonical order:
//! classify, extract, validate, track, notify, finalize.

pub mod classify;
pub mod extract;
pub mod finalize;
pub mod notify;
pub mod track;
pub mod validate;

pub use classify::ClassifyStage;
pub use extract::ExtractStage;
pub use finalize::FinalizeStage;
pub use notify::NotifyStage;
pub use track::TrackStage;
pub use validate::ValidateStage;

/// Canonical stage names in declared execution order.
pub const STAGE_NAMES: [&str; 6] = [
    "classify", "extract", "validate", "track", "notify", "finalize",
];
