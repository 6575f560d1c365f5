//! Repository implementations for database operations.

pub mod collection;
pub mod entitlement;
pub mod notice;
pub mod order;
pub mod ordering;
pub mod product;
pub mod testimonial;

pub use collection::{CollectionRepository, NewCollection};
pub use entitlement::EntitlementRepository;
pub use notice::NoticeRepository;
pub use order::{NewOrder, NewOrderItem, OrderRepository, OrderStatsRow};
pub use ordering::{MoveOutcome, SortableTable};
pub use product::ProductRepository;
pub use testimonial::TestimonialRepository;
