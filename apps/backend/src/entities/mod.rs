pub mod users;

pub use users::Entity as Users;
