//! Order status enums (as reported by Shopify).

use serde::{Deserialize, Serialize};

/// Order fulfillment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentStatus {
    Unfulfilled,
    PartiallyFulfilled,
    Fulfilled,
    Restocked,
    PendingFulfillment,
    Open,
    InProgress,
    OnHold,
    Scheduled,
    /// A value added to the platform schema after this enum was written.
    #[serde(other)]
    Unknown,
}

impl FulfillmentStatus {
    /// Human-readable label for order history.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unfulfilled => "Unfulfilled",
            Self::PartiallyFulfilled => "Partially fulfilled",
            Self::Fulfilled => "Fulfilled",
            Self::Restocked => "Restocked",
            Self::PendingFulfillment => "Pending fulfillment",
            Self::Open => "Open",
            Self::InProgress => "In progress",
            Self::OnHold => "On hold",
            Self::Scheduled => "Scheduled",
            Self::Unknown => "Unknown",
        }
    }

    /// Digital kits are delivered on purchase, so fulfilled is the happy path.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Fulfilled)
    }
}

/// Order financial status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinancialStatus {
    Pending,
    Authorized,
    PartiallyPaid,
    Paid,
    PartiallyRefunded,
    Refunded,
    Voided,
    #[serde(other)]
    Unknown,
}

impl FinancialStatus {
    /// Human-readable label for order history.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Authorized => "Authorized",
            Self::PartiallyPaid => "Partially paid",
            Self::Paid => "Paid",
            Self::PartiallyRefunded => "Partially refunded",
            Self::Refunded => "Refunded",
            Self::Voided => "Voided",
            Self::Unknown => "Unknown",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_shopify_values() {
        let status: FulfillmentStatus = serde_json::from_str("\"PARTIALLY_FULFILLED\"").unwrap();
        assert_eq!(status, FulfillmentStatus::PartiallyFulfilled);

        let status: FinancialStatus = serde_json::from_str("\"PAID\"").unwrap();
        assert_eq!(status, FinancialStatus::Paid);
        assert_eq!(status.label(), "Paid");
    }

    #[test]
    fn test_unrecognized_values_fall_back() {
        let status: FulfillmentStatus = serde_json::from_str("\"TELEPORTED\"").unwrap();
        assert_eq!(status, FulfillmentStatus::Unknown);
        assert!(!status.is_complete());
    }
}
