pub mod login;
pub mod recover;
pub mod register;

pub use login::login_post;
pub use recover::{recover_confirm_post, recover_post};
pub use register::register_post;
