pub mod shop;
pub mod user;

pub use shop::{NewShop, Shop, ShopChanges};
pub use user::{NewUser, User, UserChanges, UserProfile};
