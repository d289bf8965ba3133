//! Conversation router: loads the sender's session, runs the transition,
//! executes its effect, and writes the session back.

use std::sync::Arc;

use tracing::{info, warn};
use wardrobe_core::{BotError, Flow, InboundMessage, Messenger, SessionState, SessionStore};
use wardrobe_logging::{FlowEvent, FlowEventLogger, mask_sender};

use crate::flows::FlowExecutor;
use crate::replies;
use crate::transition::{Effect, Next, Transition, transition};

#[derive(Clone)]
pub struct ConversationRouter {
    store: Arc<dyn SessionStore>,
    messenger: Arc<dyn Messenger>,
    flows: FlowExecutor,
}

impl ConversationRouter {
    pub fn new(
        store: Arc<dyn SessionStore>,
        messenger: Arc<dyn Messenger>,
        flows: FlowExecutor,
    ) -> Self {
        Self {
            store,
            messenger,
            flows,
        }
    }

    pub async fn active_sessions(&self) -> usize {
        self.store.len().await
    }

    /// Handle one inbound message and return the text reply.
    ///
    /// Never fails: flow errors become reply texts, and any flow that ends
    /// (successfully or not) removes the session.
    pub async fn handle(&self, msg: &InboundMessage) -> String {
        let sender = msg.sender.as_str();
        let current = self.store.get(sender).await;
        let Transition { next, effect } = transition(current.as_ref(), msg);

        match (&current, &next) {
            (None, _) => FlowEventLogger::log(sender, FlowEvent::SessionStarted),
            (Some(SessionState::Menu), Next::Store(state)) => {
                if let Some(flow) = state.selected_flow() {
                    FlowEventLogger::log(
                        sender,
                        FlowEvent::FlowSelected {
                            flow: flow.to_string(),
                        },
                    );
                }
            }
            _ => {}
        }

        let reply = self.execute(sender, effect).await;

        match next {
            Next::Store(state) => self.store.put(sender, state).await,
            Next::Unchanged => {}
            Next::Delete => {
                self.store.delete(sender).await;
            }
        }
        reply
    }

    async fn execute(&self, sender: &str, effect: Effect) -> String {
        match effect {
            Effect::Reply(text) => text.to_string(),

            Effect::InvalidChoice(err) => {
                info!(sender = %mask_sender(sender), error = %err, "Menu input rejected");
                replies::INVALID_CHOICE.to_string()
            }

            Effect::RunTryOn { person, garment } => {
                match self.flows.try_on(&person, &garment).await {
                    Ok(url) => {
                        self.deliver(sender, &url).await;
                        completed(sender, Flow::TryOn);
                        replies::TRY_ON_SUCCESS.to_string()
                    }
                    Err(err) => {
                        failed(sender, Flow::TryOn, &err);
                        replies::TRY_ON_FAILURE.to_string()
                    }
                }
            }

            Effect::RunTextSearch { query } => {
                let outcome = self.flows.text_search(&query).await;
                self.finish_search(sender, Flow::TextSearch, outcome).await
            }

            Effect::RunImageSearch { image } => {
                let outcome = self.flows.image_search(&image).await;
                self.finish_search(sender, Flow::ImageSearch, outcome).await
            }
        }
    }

    async fn finish_search(
        &self,
        sender: &str,
        flow: Flow,
        outcome: Result<Option<String>, BotError>,
    ) -> String {
        match outcome {
            Ok(Some(url)) => {
                self.deliver(sender, &url).await;
                completed(sender, flow);
                replies::RESULT_READY.to_string()
            }
            Ok(None) => {
                completed(sender, flow);
                replies::NO_RESULTS.to_string()
            }
            Err(err @ BotError::MediaFetch(_)) => {
                failed(sender, flow, &err);
                replies::IMAGE_FETCH_FAILURE.to_string()
            }
            Err(err) => {
                failed(sender, flow, &err);
                replies::SEARCH_FAILURE.to_string()
            }
        }
    }

    /// Send the result as a media message. Delivery is not confirmed; a send
    /// failure is logged and does not change the reply.
    async fn deliver(&self, sender: &str, url: &str) {
        if let Err(err) = self.messenger.send_media(sender, replies::MEDIA_CAPTION, url).await {
            warn!(sender = %mask_sender(sender), error = %err, "Outbound media send failed");
        }
    }
}

fn completed(sender: &str, flow: Flow) {
    FlowEventLogger::log(
        sender,
        FlowEvent::FlowCompleted {
            flow: flow.to_string(),
        },
    );
}

fn failed(sender: &str, flow: Flow, err: &BotError) {
    warn!(
        sender = %mask_sender(sender),
        flow = %flow,
        kind = err.kind(),
        error = %err,
        "Flow failed"
    );
    FlowEventLogger::log(
        sender,
        FlowEvent::FlowFailed {
            flow: flow.to_string(),
            kind: err.kind().to_string(),
            error_msg: err.to_string(),
        },
    );
}
