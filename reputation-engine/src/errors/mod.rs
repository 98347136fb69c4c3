mod engine;

pub use engine::{EngineError, FieldErrors};
