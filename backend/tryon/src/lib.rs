pub mod gradio;
pub mod mock;

pub use gradio::{GradioTryOn, parse_event_stream};
pub use mock::MockTryOn;
