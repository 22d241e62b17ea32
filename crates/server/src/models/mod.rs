//! Domain models for the directory.

pub mod user;
pub mod view;

pub use user::{NewUser, Profile, ProfileUpdate, User};
pub use view::{AddressView, ProfileView, UserView};
