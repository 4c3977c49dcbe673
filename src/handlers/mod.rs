pub mod auth;
pub mod bird;
pub mod event;
pub mod payment;
pub mod race;
pub mod registration;

pub use auth::auth_config;
pub use bird::bird_config;
pub use event::event_config;
pub use payment::payment_config;
pub use race::race_config;
pub use registration::registration_config;
