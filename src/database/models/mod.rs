pub mod assistant;
pub mod contact_form;
pub mod conversation;
pub mod document;
pub mod faq;
pub mod recovery_token;
pub mod user;
pub mod website;

pub use assistant::Assistant;
pub use contact_form::ContactForm;
pub use conversation::{Conversation, Message};
pub use document::Document;
pub use faq::Faq;
pub use recovery_token::RecoveryToken;
pub use user::User;
pub use website::{Website, WebsitePage};
