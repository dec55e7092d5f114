pub mod config;
pub mod core;
pub mod error;
pub mod fusion;
pub mod pipeline;
pub mod recognizer;

pub use config::EnsembleConfig;
pub use core::model::{GuessResult, Prediction, SourceKind, WordScore};
pub use error::GuessError;
pub use pipeline::{GuessConfig, GuessRequest, Guesser};
