// src/services/orders.rs
use crate::errors::VectorQuoteError;
use crate::models::{CustomerDetails, Order, OrderStep, PaymentInstructions, Quote};
use chrono::Utc;
use uuid::Uuid;

impl Order {
    pub fn new(quote: Quote) -> Self {
        Self {
            id: Uuid::new_v4(),
            step: OrderStep::Details,
            quote,
            customer: None,
            created_at: Utc::now(),
            confirmed_at: None,
        }
    }

    /// Records who the order is for and moves on to payment. Details may be
    /// resubmitted while payment is still pending.
    pub fn submit_details(&mut self, details: CustomerDetails) -> Result<(), VectorQuoteError> {
        if self.step == OrderStep::Confirmed {
            return Err(self.transition_error(OrderStep::Payment));
        }
        self.customer = Some(validate_details(details)?);
        self.step = OrderStep::Payment;
        Ok(())
    }

    pub fn confirm(&mut self) -> Result<(), VectorQuoteError> {
        if self.step != OrderStep::Payment {
            return Err(self.transition_error(OrderStep::Confirmed));
        }
        self.step = OrderStep::Confirmed;
        self.confirmed_at = Some(Utc::now());
        Ok(())
    }

    pub fn payment_instructions(
        &self,
        payment_email: &str,
        support_email: &str,
    ) -> Result<PaymentInstructions, VectorQuoteError> {
        let customer = self
            .customer
            .as_ref()
            .ok_or_else(|| self.transition_error(OrderStep::Payment))?;

        Ok(PaymentInstructions {
            order_id: self.id,
            amount: self.quote.total,
            currency: "USD",
            payment_email: payment_email.to_string(),
            support_email: support_email.to_string(),
            reference: customer.email.clone(),
        })
    }

    fn transition_error(&self, to: OrderStep) -> VectorQuoteError {
        VectorQuoteError::InvalidOrderState {
            from: self.step.as_str().to_string(),
            to: to.as_str().to_string(),
        }
    }
}

fn validate_details(details: CustomerDetails) -> Result<CustomerDetails, VectorQuoteError> {
    let name = details.name.trim();
    if name.is_empty() {
        return Err(VectorQuoteError::Validation("Full name is required".to_string()));
    }

    let email = details.email.trim();
    let valid_email = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid_email {
        return Err(VectorQuoteError::Validation(format!(
            "Invalid email address: {}",
            details.email
        )));
    }

    let notes = details
        .notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    Ok(CustomerDetails {
        name: name.to_string(),
        email: email.to_string(),
        notes,
    })
}
