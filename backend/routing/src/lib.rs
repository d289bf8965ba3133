//! Conversation routing for the wardrobe bot: the menu state machine and
//! the flows it dispatches to.

pub mod flows;
pub mod replies;
pub mod router;
pub mod scratch;
pub mod transition;

pub use flows::FlowExecutor;
pub use router::ConversationRouter;
pub use transition::{Effect, Next, Transition, transition};
