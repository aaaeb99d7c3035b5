use std::time::Duration;

use bigdecimal::BigDecimal;

use crate::domain::errors::DomainError;
use crate::domain::ports::PaymentAuthorizer;

/// Per-request configuration shared with the handlers.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub timeout: Duration,
}

/// Simulated payment gateway. Authorization is instant; the configured
/// timeout is the budget a real gateway adapter would enforce before
/// treating the call as failed.
pub struct SimulatedAuthorizer {
    timeout: Duration,
}

impl SimulatedAuthorizer {
    /// Token that always declines, for exercising the failure path.
    pub const DECLINE_TOKEN: &'static str = "tok_declined";

    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl PaymentAuthorizer for SimulatedAuthorizer {
    fn authorize(&self, card_token: &str, amount: &BigDecimal) -> Result<(), DomainError> {
        if card_token.trim().is_empty() {
            return Err(DomainError::Validation("payment token is required".into()));
        }
        if amount <= &BigDecimal::from(0) {
            return Err(DomainError::Validation(
                "authorization amount must be positive".into(),
            ));
        }
        if card_token == Self::DECLINE_TOKEN {
            return Err(DomainError::InvalidState("payment was declined".into()));
        }
        log::debug!(
            "authorized {} against simulated gateway (budget {:?})",
            amount,
            self.timeout
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authorizer() -> SimulatedAuthorizer {
        SimulatedAuthorizer::new(Duration::from_secs(5))
    }

    #[test]
    fn authorizes_positive_amount() {
        let result = authorizer().authorize("tok_visa", &BigDecimal::from(35));
        assert!(result.is_ok());
    }

    #[test]
    fn declines_designated_token() {
        let result = authorizer().authorize(SimulatedAuthorizer::DECLINE_TOKEN, &BigDecimal::from(10));
        assert!(matches!(result, Err(DomainError::InvalidState(_))));
    }

    #[test]
    fn rejects_blank_token() {
        let result = authorizer().authorize("  ", &BigDecimal::from(10));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn rejects_non_positive_amount() {
        let result = authorizer().authorize("tok_visa", &BigDecimal::from(0));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
