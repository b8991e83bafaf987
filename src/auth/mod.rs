pub mod session;
pub mod token;
pub mod token_store;

pub use session::{AuthStatus, SessionService};
pub use token::AuthToken;
pub use token_store::{FileTokenStore, TokenStore};
