//! Domain services for the storefront.
//!
//! Services contain business rules that operate on domain models.

pub mod currency;
pub mod download;
pub mod licence;
pub mod ordering;
pub mod payment;
pub mod pricing;

pub use licence::{resolve_duration, EntitlementWindow, LicenceDuration};
pub use ordering::{next_sort_order, MoveDirection, MoveRequest, MoveResponse, SortSlot, SortSwap};
pub use payment::{
    ChargeAuthorization, ChargeRequest, ChargeVerification, GatewayError, MockPaymentGateway,
    PaymentGateway,
};
pub use pricing::{OrderPricing, PricedLine};
