pub mod backend;
pub mod error;
pub mod fallback;
pub mod gemini;
pub mod generator;
pub mod outcome;
pub mod parser;
pub mod prompts;

pub use backend::{AdvisoryBackend, GenerationRequest};
pub use error::AdvisorError;
pub use gemini::GeminiBackend;
pub use generator::AdvisoryGenerator;
pub use outcome::AdvisoryOutcome;
