pub mod bird;
pub mod breeder;
pub mod common;
pub mod event;
pub mod pagination;
pub mod payment;
pub mod race;
pub mod registration;

pub use bird::*;
pub use breeder::*;
pub use common::*;
pub use event::*;
pub use pagination::*;
pub use payment::*;
pub use race::*;
pub use registration::*;
