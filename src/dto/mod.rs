pub mod cart;
pub mod catalog;
pub mod orders;
pub mod promo;
pub mod sav;
pub mod suggestions;
