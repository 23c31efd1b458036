pub mod accumulator;
pub mod engine;
pub mod history;
pub mod matcher;
pub mod scorer;

pub use accumulator::{ErrorTotals, ScoreAccumulator};
pub use engine::{Ingest, LiveOutcome, SessionEngine, SessionState, SessionToken};
pub use history::HistoryBuffer;
pub use matcher::{FrameMatcher, Match};
pub use scorer::{ScoreBand, ScoreCurve, SessionScores};
