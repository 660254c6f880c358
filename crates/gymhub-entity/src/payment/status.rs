//! Payment order status enumeration and transition legality.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use gymhub_core::AppError;

/// Lifecycle state of a payment order.
///
/// `pendiente → en_revision → {verificado | rechazado}`, with `expirado`
/// reachable from the two non-terminal states by the expiry sweep.
/// `verificado` and `rechazado` are terminal and reject any further
/// mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentOrderStatus {
    /// Created, waiting for a proof-of-payment upload.
    Pendiente,
    /// Proof attached, waiting for staff verification.
    EnRevision,
    /// Approved; the member's subscription was created or extended.
    Verificado,
    /// Rejected; any tentative subscription was cancelled.
    Rechazado,
    /// Timed out before resolution.
    Expirado,
}

impl PaymentOrderStatus {
    /// Whether the order has reached a terminal outcome.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Verificado | Self::Rechazado)
    }

    /// Whether a proof of payment may still be attached.
    pub fn can_attach_receipt(&self) -> bool {
        matches!(self, Self::Pendiente | Self::EnRevision)
    }

    /// Whether the order may be approved.
    pub fn can_approve(&self) -> bool {
        matches!(self, Self::Pendiente | Self::EnRevision)
    }

    /// Whether the order may be rejected. An expired order may still be
    /// rejected to close it out; a verified or already-rejected one may not.
    pub fn can_reject(&self) -> bool {
        !self.is_terminal()
    }

    /// Whether the expiry sweep may mark this order `expirado`.
    pub fn can_expire(&self) -> bool {
        matches!(self, Self::Pendiente | Self::EnRevision)
    }

    /// Return the status as its stored lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pendiente => "pendiente",
            Self::EnRevision => "en_revision",
            Self::Verificado => "verificado",
            Self::Rechazado => "rechazado",
            Self::Expirado => "expirado",
        }
    }
}

impl fmt::Display for PaymentOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentOrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pendiente" => Ok(Self::Pendiente),
            "en_revision" => Ok(Self::EnRevision),
            "verificado" => Ok(Self::Verificado),
            "rechazado" => Ok(Self::Rechazado),
            "expirado" => Ok(Self::Expirado),
            _ => Err(AppError::validation(format!(
                "Invalid payment order status: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states_reject_everything() {
        for status in [PaymentOrderStatus::Verificado, PaymentOrderStatus::Rechazado] {
            assert!(status.is_terminal());
            assert!(!status.can_attach_receipt());
            assert!(!status.can_approve());
            assert!(!status.can_reject());
            assert!(!status.can_expire());
        }
    }

    #[test]
    fn test_expired_rejects_approval_but_not_rejection() {
        let status = PaymentOrderStatus::Expirado;
        assert!(!status.can_approve());
        assert!(!status.can_attach_receipt());
        assert!(status.can_reject());
    }

    #[test]
    fn test_open_states_allow_review_flow() {
        for status in [PaymentOrderStatus::Pendiente, PaymentOrderStatus::EnRevision] {
            assert!(status.can_attach_receipt());
            assert!(status.can_approve());
            assert!(status.can_reject());
            assert!(status.can_expire());
        }
    }

    #[test]
    fn test_stored_strings() {
        assert_eq!(PaymentOrderStatus::EnRevision.as_str(), "en_revision");
        assert_eq!(
            "verificado".parse::<PaymentOrderStatus>().unwrap(),
            PaymentOrderStatus::Verificado
        );
    }
}
