pub mod users;

pub use users::{PublicUser, User, UserFilter, UserStore};
