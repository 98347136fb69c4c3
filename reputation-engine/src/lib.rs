//! # Reputation Engine
//! This crate keeps votes, content counters and user reputation in step.
//! It includes the vote transition planner, the transaction coordinator, the
//! interaction recorder, the reputation-bearing services and the string-typed
//! facade used by the outer layer.
pub mod actions;
pub mod config;
pub mod coordinator;
pub mod errors;
pub mod hooks;
pub mod recorder;
pub mod response;
pub mod services;
pub mod transition;

pub use actions::ForumActions;
pub use config::EngineConfig;
pub use coordinator::TransactionCoordinator;
pub use errors::{EngineError, FieldErrors};
pub use hooks::{IdentityProvider, RevalidateHook, StaticIdentity, TracingRevalidator};
pub use recorder::{InteractionRecorder, InteractionWorker};
pub use response::{ActionResponse, ErrorBody};
pub use services::{
    BookmarkOutcome, BookmarkService, ContentService, EngineContext, VoteOutcome, VoteService,
};
pub use transition::VoteTransition;
