pub mod baskets;
pub mod birds;
pub mod breeders;
pub mod event_inventories;
pub mod event_inventory_items;
pub mod events;
pub mod fee_schemes;
pub mod payments;
pub mod perch_fees;
pub mod prize_schemes;
pub mod race_item_results;
pub mod race_items;
pub mod races;

pub use baskets as basket_entity;
pub use birds as bird_entity;
pub use breeders as breeder_entity;
pub use event_inventories as event_inventory_entity;
pub use event_inventory_items as event_inventory_item_entity;
pub use events as event_entity;
pub use fee_schemes as fee_scheme_entity;
pub use payments as payment_entity;
pub use perch_fees as perch_fee_entity;
pub use prize_schemes as prize_scheme_entity;
pub use race_item_results as race_item_result_entity;
pub use race_items as race_item_entity;
pub use races as race_entity;

pub use payments::PaymentStatus;
pub use races::RaceType;
