pub mod config;
pub mod error;
pub mod frame;
pub mod joint;
pub mod pose;
pub mod session;

pub use config::Config;
pub use error::ConfigError;
pub use frame::{AngleFrame, ComparisonSample};
pub use joint::{JointGroup, JointId};
pub use session::{SessionEngine, SessionScores, SessionToken};
