//! Seeded synthesis of the fields external sources don't provide.

pub mod commerce;
pub mod identity;
pub mod users;

pub use commerce::CommerceFields;
pub use identity::IdentityGenerator;
pub use users::{synthesize_users, UserRow};
