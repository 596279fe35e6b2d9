//! API service models

pub mod medicine;
pub mod token;
pub mod user;

// Re-export for convenience
pub use medicine::{Medicine, MedicineInput, MedicinePatch};
pub use token::AuthToken;
pub use user::{NewUser, User, UserInfo};
