//! Order domain model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::models::currency::Currency;

/// Order lifecycle. `Paid` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Failed => "failed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }

    /// Only pending orders move, and only forward.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        *self == OrderStatus::Pending && next != OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "failed" => Ok(OrderStatus::Failed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(format!("Invalid order status: {}", s)),
        }
    }
}

/// A customer order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Order {
    pub id: Uuid,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    /// Amount charged, in the settlement currency.
    pub total_amount: Decimal,
    /// Amount shown to the customer, in `currency`.
    pub display_amount: Decimal,
    pub currency: Currency,
    pub status: OrderStatus,
    pub payment_provider: String,
    pub payment_reference: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn is_paid(&self) -> bool {
        self.status == OrderStatus::Paid
    }
}

/// A purchased product with its price snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub price_at_purchase: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Order item joined with its product, as listed to the buyer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct OrderLineItem {
    pub product_id: Uuid,
    pub product_name: String,
    pub file_url: String,
    pub price: Decimal,
    pub duration_days: Option<i32>,
}

/// Everything the download path needs about one purchased product.
#[derive(Debug, Clone)]
pub struct Purchase {
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub customer_email: String,
    pub order_status: OrderStatus,
    pub product_name: String,
    pub file_url: String,
    /// Last day of the entitlement window, if one was issued.
    pub entitlement_end: Option<NaiveDate>,
}

impl Purchase {
    /// True when an entitlement window exists and ended before `today`.
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        self.entitlement_end.is_some_and(|end| end < today)
    }
}

/// One cart line. Extra fields sent by the client are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub id: Uuid,
}

fn default_provider() -> String {
    "paystack".to_string()
}

/// Request payload for `POST /api/v1/pay`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct InitializePaymentRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[serde(alias = "phoneNumber")]
    #[validate(length(max = 32, message = "Phone number must be at most 32 characters"))]
    pub phone_number: Option<String>,

    pub amount: Decimal,

    #[serde(default)]
    pub currency: Currency,

    #[serde(default = "default_provider")]
    pub provider: String,

    #[validate(length(min = 1, max = 50, message = "Cart must contain 1-50 items"))]
    pub items: Vec<CartItem>,
}

impl InitializePaymentRequest {
    /// Validate that the amount is positive.
    pub fn validate_amount(&self) -> Result<(), String> {
        if self.amount <= Decimal::ZERO {
            return Err("Amount must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Distinct product ids in cart order.
    pub fn product_ids(&self) -> Vec<Uuid> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .map(|item| item.id)
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

/// Response payload for `POST /api/v1/pay`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InitializePaymentResponse {
    pub success: bool,
    pub order_id: Uuid,
    pub reference_id: String,
    pub authorization_url: String,
}

/// Query parameters for `GET /api/v1/pay/verify`.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPaymentQuery {
    pub reference: Option<String>,
    /// Alternate name used by some gateway redirects.
    pub trxref: Option<String>,
}

impl VerifyPaymentQuery {
    pub fn reference(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .or(self.trxref.as_deref())
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

/// Response payload for payment verification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub already_processed: bool,
    pub message: String,
}

/// Response payload for `GET /api/v1/orders/:order_id`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OrderItemsResponse {
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub currency: Currency,
    pub display_amount: Decimal,
    pub items: Vec<OrderLineItem>,
}

/// Admin view of an order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub total_amount: Decimal,
    pub display_amount: Decimal,
    pub currency: Currency,
    pub status: OrderStatus,
    pub payment_provider: String,
    pub payment_reference: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            customer_email: o.customer_email,
            customer_phone: o.customer_phone,
            total_amount: o.total_amount,
            display_amount: o.display_amount,
            currency: o.currency,
            status: o.status,
            payment_provider: o.payment_provider,
            payment_reference: o.payment_reference,
            paid_at: o.paid_at,
            created_at: o.created_at,
        }
    }
}

/// Query parameters for the admin order list.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListOrdersQuery {
    pub status: Option<OrderStatus>,

    #[validate(range(min = 1, max = 500, message = "Limit must be 1-500"))]
    pub limit: Option<i64>,
}

impl ListOrdersQuery {
    pub const DEFAULT_LIMIT: i64 = 50;

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }
}

/// Response for the admin order list.
#[derive(Debug, Clone, Serialize)]
pub struct ListOrdersResponse {
    pub orders: Vec<OrderResponse>,
    pub total: i64,
}

/// Dashboard counters for the admin.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct OrderStats {
    pub total_orders: i64,
    pub paid_orders: i64,
    pub pending_orders: i64,
    /// Sum of paid orders in the settlement currency.
    pub total_revenue: Decimal,
    pub active_products: i64,
    pub pending_testimonials: i64,
}
