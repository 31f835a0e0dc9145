pub mod leaderboard;
pub mod spawner;
pub mod submission;

pub use leaderboard::LeaderboardView;
pub use spawner::Spawner;
pub use submission::{SubmissionEffect, SubmissionFlow, SubmissionMsg, SubmissionState};
