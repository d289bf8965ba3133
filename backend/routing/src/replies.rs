//! User-facing reply texts.

use wardrobe_core::Flow;

pub const WELCOME: &str = "Welcome to AI Fashion Assistant!\nTo Get Started Choose From Below Options:\n0. Virtual Try-On\n1. Text Search\n2. Image Search\nTo return back to main menu after results send any meesage.";

pub const INVALID_CHOICE: &str = "Invalid choice. Please choose an option from below: \n\n0. Virtual Try-On\n1. Text Search\n2. Image Search";

pub const TRY_ON_PROMPT: &str = "Send your image on which you want to try clothes for Virtual Try-On! ✨";
pub const TEXT_SEARCH_PROMPT: &str = "Enter your search query to explore our product database! 🔍";
pub const IMAGE_SEARCH_PROMPT: &str = "Send an image to search our product database and find what you’re looking for! 🔎";

pub const GARMENT_PROMPT: &str = "Great! Now Send the garment image which you want to try.";
pub const PERSON_REPROMPT: &str = "Send an image to start.";
pub const GARMENT_REPROMPT: &str = "Send the garment image.";

pub const TRY_ON_SUCCESS: &str = "Here is your virtual try-on result! Returning to menu.";
pub const TRY_ON_FAILURE: &str = "Sorry, something went wrong with the try-on process. Returning to menu.";

pub const RESULT_READY: &str = "*Your result is ready!* 🎉\nCheck it out below: 👇";
pub const NO_RESULTS: &str = "No results found. Returning to menu.";
pub const SEARCH_FAILURE: &str = "Sorry, something went wrong with the search. Returning to menu.";

pub const IMAGE_FETCH_FAILURE: &str = "We couldn't process your image. Please try again.";
pub const NO_IMAGE_RECEIVED: &str = "We didn't receive an image. Please try sending your image again.";

/// Body of the outbound media message carrying a result.
pub const MEDIA_CAPTION: &str = "Your result:";

/// Prompt sent right after a flow is picked from the menu.
pub fn flow_prompt(flow: Flow) -> &'static str {
    match flow {
        Flow::TryOn => TRY_ON_PROMPT,
        Flow::TextSearch => TEXT_SEARCH_PROMPT,
        Flow::ImageSearch => IMAGE_SEARCH_PROMPT,
    }
}
