pub mod carousel;
pub mod config;
pub mod contact;
pub mod feedback;
pub mod form;
pub mod nav;
pub mod rules;

pub use contact::{ContactController, ContactField, ContactForm};
pub use feedback::{FeedbackController, FeedbackField, FeedbackForm, Rating};
