//! Report mode enumeration.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a mode name is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported metric mode: {0}")]
pub struct ModeParseError(pub String);

/// How a mode is evaluated over the requested span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeClass {
    /// Split into fixed-size intervals, each subject to the threshold split.
    IntervalSplittable,
    /// Evaluated once over the entire span.
    FullRangeOnly,
}

/// A report category.
///
/// The set is closed: every mode maps to exactly one counting strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricMode {
    /// Carts with line items, any customer.
    CartTotal,
    /// Carts with line items and no customer attached.
    AnonymousCart,
    /// Carts with line items and a customer attached.
    LoggedInCart,
    /// Customers whose lifetime order count is exactly one.
    FirstTimeBuyers,
    /// Orders placed by a logged-in customer.
    LoggedInOrders,
    /// Orders placed without a customer account.
    AnonymousOrders,
    /// Customers with more than one order in the range.
    RepeatedOrders,
    /// All orders.
    TotalOrders,
    /// Customers created in the range.
    TotalCustomers,
}

impl MetricMode {
    /// Every mode, in display order.
    pub const ALL: [Self; 9] = [
        Self::CartTotal,
        Self::AnonymousCart,
        Self::LoggedInCart,
        Self::FirstTimeBuyers,
        Self::LoggedInOrders,
        Self::AnonymousOrders,
        Self::RepeatedOrders,
        Self::TotalOrders,
        Self::TotalCustomers,
    ];

    /// Canonical name, e.g. `CART_TOTAL`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CartTotal => "CART_TOTAL",
            Self::AnonymousCart => "ANONYMOUS_CART",
            Self::LoggedInCart => "LOGGED_IN_CART",
            Self::FirstTimeBuyers => "FIRST_TIME_BUYERS",
            Self::LoggedInOrders => "LOGGED_IN_ORDERS",
            Self::AnonymousOrders => "ANONYMOUS_ORDERS",
            Self::RepeatedOrders => "REPEATED_ORDERS",
            Self::TotalOrders => "TOTAL_ORDERS",
            Self::TotalCustomers => "TOTAL_CUSTOMERS",
        }
    }

    #[must_use]
    pub const fn class(self) -> ModeClass {
        match self {
            Self::CartTotal | Self::AnonymousCart | Self::LoggedInCart | Self::FirstTimeBuyers => {
                ModeClass::IntervalSplittable
            }
            Self::LoggedInOrders
            | Self::AnonymousOrders
            | Self::RepeatedOrders
            | Self::TotalOrders
            | Self::TotalCustomers => ModeClass::FullRangeOnly,
        }
    }

    #[must_use]
    pub const fn is_interval_splittable(self) -> bool {
        matches!(self.class(), ModeClass::IntervalSplittable)
    }

    /// Interval size in hours for splittable modes, `None` for full-range modes.
    ///
    /// First-time buyers use a wider step than the cart modes because each
    /// interval fans out into one lookup per order.
    #[must_use]
    pub const fn interval_step_hours(self) -> Option<u32> {
        match self {
            Self::CartTotal | Self::AnonymousCart | Self::LoggedInCart => Some(1),
            Self::FirstTimeBuyers => Some(4),
            _ => None,
        }
    }
}

impl fmt::Display for MetricMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MetricMode {
    type Err = ModeParseError;

    /// Accepts `CART_TOTAL`, `cart_total` and `cart-total`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_").to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| ModeParseError(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_names() {
        for mode in MetricMode::ALL {
            assert_eq!(mode.as_str().parse::<MetricMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_parse_kebab_and_lowercase() {
        assert_eq!(
            "first-time-buyers".parse::<MetricMode>().unwrap(),
            MetricMode::FirstTimeBuyers
        );
        assert_eq!(
            "logged_in_cart".parse::<MetricMode>().unwrap(),
            MetricMode::LoggedInCart
        );
    }

    #[test]
    fn test_parse_unknown() {
        let err = "WEEKLY_REVENUE".parse::<MetricMode>().unwrap_err();
        assert_eq!(err.to_string(), "unsupported metric mode: WEEKLY_REVENUE");
    }

    #[test]
    fn test_classes() {
        let splittable: Vec<_> = MetricMode::ALL
            .into_iter()
            .filter(|m| m.is_interval_splittable())
            .collect();
        assert_eq!(
            splittable,
            vec![
                MetricMode::CartTotal,
                MetricMode::AnonymousCart,
                MetricMode::LoggedInCart,
                MetricMode::FirstTimeBuyers,
            ]
        );
    }

    #[test]
    fn test_interval_steps() {
        assert_eq!(MetricMode::CartTotal.interval_step_hours(), Some(1));
        assert_eq!(MetricMode::AnonymousCart.interval_step_hours(), Some(1));
        assert_eq!(MetricMode::FirstTimeBuyers.interval_step_hours(), Some(4));
        assert_eq!(MetricMode::RepeatedOrders.interval_step_hours(), None);
        assert_eq!(MetricMode::TotalCustomers.interval_step_hours(), None);
    }

    #[test]
    fn test_serde_uses_canonical_name() {
        let json = serde_json::to_string(&MetricMode::LoggedInOrders).unwrap();
        assert_eq!(json, "\"LOGGED_IN_ORDERS\"");
    }
}
