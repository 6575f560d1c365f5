//! External integrations and the payment confirmation workflow.

pub mod email;
pub mod file_fetch;
pub mod order_confirmation;
pub mod paystack;
pub mod watermark;

pub use email::{DownloadLink, DownloadMailer, EmailError, EmailService};
pub use file_fetch::{FetchedFile, FileFetchError, FileFetcher};
pub use order_confirmation::{ConfirmationError, ConfirmationOutcome, OrderConfirmation};
pub use paystack::{build_gateway, PaystackGateway};
pub use watermark::{watermark_pdf, WatermarkError};
