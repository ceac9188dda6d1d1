pub mod health;
pub mod user_info;

pub use health::*;
pub use user_info::*;

// Handlers OAuth estão em src/auth/handlers.rs (módulo separado)
