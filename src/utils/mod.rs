pub mod band;
pub mod jwt;
pub mod password;

pub use band::*;
pub use jwt::*;
pub use password::*;
