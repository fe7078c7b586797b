pub mod api;
pub mod models;
pub mod scheduler;
pub mod service;

pub use models::{
    next_delivery_date, Payment, PaymentStatus, Subscription, SubscriptionStatus,
};
pub use scheduler::{process_payments, PaymentOutcome, ProcessedPayment};
pub use service::{PaymentLedger, SubscriptionService, PAYMENTS, SUBSCRIPTIONS};
