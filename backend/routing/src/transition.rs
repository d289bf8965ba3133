//! The conversation state machine as a pure, total function.
//!
//! `transition` never performs I/O: it decides the next session state and
//! what the router must do. Every (state, message) pair has an outcome.

use wardrobe_core::{BotError, Flow, InboundMessage, MediaRef, SessionState};

use crate::replies;

/// What happens to the sender's session once the effect has run.
#[derive(Debug, Clone, PartialEq)]
pub enum Next {
    Store(SessionState),
    Unchanged,
    Delete,
}

#[derive(Debug)]
pub enum Effect {
    /// Answer with a fixed text.
    Reply(&'static str),
    /// Menu input was not a known option.
    InvalidChoice(BotError),
    RunTryOn { person: MediaRef, garment: MediaRef },
    RunTextSearch { query: String },
    RunImageSearch { image: MediaRef },
}

#[derive(Debug)]
pub struct Transition {
    pub next: Next,
    pub effect: Effect,
}

impl Transition {
    fn new(next: Next, effect: Effect) -> Self {
        Self { next, effect }
    }

    fn reply(next: Next, text: &'static str) -> Self {
        Self::new(next, Effect::Reply(text))
    }
}

/// `current` is `None` when the sender has no session.
pub fn transition(current: Option<&SessionState>, msg: &InboundMessage) -> Transition {
    let Some(state) = current else {
        return Transition::reply(Next::Store(SessionState::Menu), replies::WELCOME);
    };

    match (state, &msg.media) {
        (SessionState::Menu, _) => match Flow::from_menu_choice(&msg.body) {
            Ok(flow) => Transition::reply(
                Next::Store(SessionState::entry(flow)),
                replies::flow_prompt(flow),
            ),
            Err(err) => Transition::new(Next::Unchanged, Effect::InvalidChoice(err)),
        },

        (SessionState::TryOnAwaitingPerson, Some(person)) => Transition::reply(
            Next::Store(SessionState::TryOnAwaitingGarment {
                person: person.clone(),
            }),
            replies::GARMENT_PROMPT,
        ),
        (SessionState::TryOnAwaitingPerson, None) => {
            Transition::reply(Next::Unchanged, replies::PERSON_REPROMPT)
        }

        (SessionState::TryOnAwaitingGarment { person }, Some(garment)) => Transition::new(
            Next::Delete,
            Effect::RunTryOn {
                person: person.clone(),
                garment: garment.clone(),
            },
        ),
        (SessionState::TryOnAwaitingGarment { .. }, None) => {
            Transition::reply(Next::Unchanged, replies::GARMENT_REPROMPT)
        }

        (SessionState::TextSearch, _) => Transition::new(
            Next::Delete,
            Effect::RunTextSearch {
                query: msg.body.clone(),
            },
        ),

        (SessionState::ImageSearch, Some(image)) => Transition::new(
            Next::Delete,
            Effect::RunImageSearch {
                image: image.clone(),
            },
        ),
        (SessionState::ImageSearch, None) => {
            Transition::reply(Next::Delete, replies::NO_IMAGE_RECEIVED)
        }
    }
}
