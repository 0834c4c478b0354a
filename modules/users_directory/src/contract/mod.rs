pub mod client;
pub mod error;
pub mod model;

pub use client::UsersDirectoryApi;
pub use error::UsersDirectoryError;
pub use model::{Identity, NewUser, User, UserSummary};
