//! Recognized transcript input: token and speaker segment types plus the loader
//! for speech-recognition JSON documents.

pub mod loader;
pub mod model;

pub use loader::{load_transcript, parse_transcript};
pub use model::{Alternative, SpeakerSegment, Token, TokenKind, Transcript};
