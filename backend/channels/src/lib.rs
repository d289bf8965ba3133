//! Messaging provider plumbing: Twilio's WhatsApp API.
//!
//! Inbound webhooks arrive form-encoded and are answered with TwiML;
//! media is fetched and outbound media messages are sent over the REST API.

pub mod signature;
pub mod twilio_client;
pub mod wa_media;
pub mod whatsapp;

pub use signature::{compute_signature, verify_signature, SIGNATURE_HEADER};
pub use twilio_client::{TwilioClient, TwilioCredentials};
pub use wa_media::{parse_media_url, MediaLocator};
pub use whatsapp::{MessagingResponse, WebhookForm, TWIML_CONTENT_TYPE};
