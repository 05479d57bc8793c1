//! Cross-venue arbitrage detection engine
//!
//! A scan runs in three stages over one in-memory snapshot:
//! - Validation: rows without two usable prices are skipped
//! - Evaluation: both trade directions, spread and fee-adjusted profit
//! - Scoring: composite 0-100 score and best-first ranking
//!
//! Scans are pure and synchronous. Optional rayon evaluation keeps output
//! order identical to the sequential path.

pub mod validator;
pub mod evaluator;
pub mod scoring;
pub mod diagnostics;
pub mod scanner;

pub use evaluator::{CandidateOutcome, DirectionalEvaluator};
pub use scoring::{opportunity_score, rank, ScoreBreakdown};
pub use diagnostics::{DirectionDiagnostic, RowDiagnostic};
pub use scanner::{OpportunityScanner, ScanReport, ScanStats};
