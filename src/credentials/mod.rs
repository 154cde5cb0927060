pub mod service_account;
pub mod token;

pub use service_account::ServiceAccount;
pub use token::TokenSource;
