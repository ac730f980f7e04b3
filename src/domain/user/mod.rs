//! User aggregate

pub mod model;
pub mod repository;

pub use model::{normalize_plate, NewUser, User, UserFilter, UserPatch};
pub use repository::UserRepository;
