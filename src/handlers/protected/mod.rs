pub mod assistants;
pub mod auth;
pub mod contact_forms;
pub mod conversations;
pub mod documents;
pub mod faqs;
pub mod websites;
