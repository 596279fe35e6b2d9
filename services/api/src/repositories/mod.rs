//! Repositories for database operations

pub mod medicine;
pub mod token;
pub mod user;

// Re-export for convenience
pub use medicine::MedicineRepository;
pub use token::TokenRepository;
pub use user::UserRepository;
