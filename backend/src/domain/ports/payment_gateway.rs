//! Port for settling rental charges.
//!
//! Real payment processing is out of scope; the default adapter approves
//! every charge. The port exists so that boundary is explicit and a real
//! gateway can be dropped in without touching the coordinator.

use async_trait::async_trait;

use crate::domain::{PaymentStatus, Rental};

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment gateway adapters.
    pub enum PaymentGatewayError {
        /// The gateway could not be reached.
        Unreachable { message: String } =>
            "payment gateway unreachable: {message}",
    }
}

/// Port for charging a completed rental.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Attempt to settle the rental's charge and report the outcome.
    async fn charge(&self, rental: &Rental) -> Result<PaymentStatus, PaymentGatewayError>;
}

/// Stub gateway that approves every charge.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysApprovePaymentGateway;

#[async_trait]
impl PaymentGateway for AlwaysApprovePaymentGateway {
    async fn charge(&self, _rental: &Rental) -> Result<PaymentStatus, PaymentGatewayError> {
        Ok(PaymentStatus::Paid)
    }
}
