pub mod init;
pub mod score;

pub use init::init_config;
pub use score::{run_score, score_bundle, ScoreConfig};
