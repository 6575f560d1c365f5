//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod collection;
pub mod entitlement;
pub mod notice;
pub mod order;
pub mod product;
pub mod testimonial;

pub use collection::CollectionEntity;
pub use entitlement::EntitlementEntity;
pub use notice::NoticeEntity;
pub use order::{
    OrderEntity, OrderItemEntity, OrderItemWithProductEntity, OrderStatusDb, PurchaseEntity,
};
pub use product::{ProductEntity, ProductInput};
pub use testimonial::TestimonialEntity;
