mod bookmark;
mod content;
mod ids;
mod interaction;
mod reputation;
mod target;
mod vote;

pub use bookmark::Bookmark;
pub use content::{ContentRemoval, CounterDrift, VotableContent};
pub use ids::{ContentId, UserId};
pub use interaction::{InteractionRecord, InteractionVerb};
pub use reputation::{PointDelta, ReputationDelta, ReputationEvent};
pub use target::{ParseKindError, Target, TargetKind};
pub use vote::{Vote, VoteKind, VoteStatus};
