pub mod paypal;

pub use paypal::*;
