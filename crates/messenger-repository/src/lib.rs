//! # Messenger Repository
//!
//! The entity store for users and addresses.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UserRepository> / Arc<dyn AddressRepository>
//! PgUserRepository / PgAddressRepository   (PostgreSQL / SQLx)
//! InMemoryStore                            (process-local, same contracts)
//! ```

pub mod memory;
pub mod pool;
pub mod postgres;
pub mod traits;

pub use memory::InMemoryStore;
pub use pool::*;
pub use postgres::*;
pub use traits::*;
