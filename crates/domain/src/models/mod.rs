//! Domain models for the storefront.

pub mod collection;
pub mod currency;
pub mod notice;
pub mod order;
pub mod product;
pub mod testimonial;

pub use collection::Collection;
pub use currency::Currency;
pub use notice::Notice;
pub use order::{Order, OrderItem, OrderLineItem, OrderStatus, Purchase};
pub use product::Product;
pub use testimonial::Testimonial;
