//! PostgreSQL implementations of the repository traits.

mod address_repository;
mod predicate;
mod user_repository;

pub use address_repository::PgAddressRepository;
pub use user_repository::PgUserRepository;
