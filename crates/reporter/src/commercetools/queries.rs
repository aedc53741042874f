//! GraphQL query builders for the commercetools API.
//!
//! Each builder renders a complete query document. Filters go through the
//! `where` argument as a query-predicate string; time predicates encode the
//! half-open range as `field >= "from" AND field < "to"`.

use ct_metrics_core::{CustomerEmail, TimeRange};

/// Customer-attachment predicate applied to carts and orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerFilter {
    /// No restriction.
    Any,
    /// `customerId is not defined`
    Anonymous,
    /// `customerId is defined`
    LoggedIn,
}

impl CustomerFilter {
    const fn predicate(self) -> Option<&'static str> {
        match self {
            Self::Any => None,
            Self::Anonymous => Some("(customerId is not defined)"),
            Self::LoggedIn => Some("(customerId is defined)"),
        }
    }
}

/// Carts with line items modified in `range`.
#[must_use]
pub fn carts_total(store_key: &str, filter: CustomerFilter, range: TimeRange) -> String {
    let predicate = join_predicates(&[
        filter.predicate().map(str::to_owned),
        Some(time_predicate("lastModifiedAt", range)),
        Some(store_predicate(store_key)),
        Some("lineItems is defined".to_owned()),
    ]);
    format!(
        r"query {{
    carts(where: {}) {{
        total
    }}
}}",
        graphql_string(&predicate)
    )
}

/// Orders created in `range`.
#[must_use]
pub fn orders_total(store_key: &str, filter: CustomerFilter, range: TimeRange) -> String {
    format!(
        r"query {{
    orders(where: {}) {{
        total
    }}
}}",
        graphql_string(&orders_predicate(store_key, filter, range))
    )
}

/// One page of orders created in `range`, oldest first, with customer emails.
#[must_use]
pub fn orders_page(store_key: &str, range: TimeRange, limit: u64, offset: u64) -> String {
    format!(
        r#"query {{
    orders(
        limit: {limit}
        offset: {offset}
        sort: ["createdAt asc"]
        where: {}
    ) {{
        total
        results {{
            customerEmail
        }}
    }}
}}"#,
        graphql_string(&orders_predicate(store_key, CustomerFilter::Any, range))
    )
}

/// Orders created in `range` with customer emails, first page only.
#[must_use]
pub fn orders_with_emails(store_key: &str, range: TimeRange) -> String {
    format!(
        r"query {{
    orders(where: {}) {{
        total
        results {{
            customerEmail
        }}
    }}
}}",
        graphql_string(&orders_predicate(store_key, CustomerFilter::Any, range))
    )
}

/// Lifetime orders placed with `email` in the store, across all time.
#[must_use]
pub fn lifetime_orders_by_email(store_key: &str, email: &CustomerEmail) -> String {
    let predicate = format!(
        "{} AND customerEmail=\"{}\"",
        store_predicate(store_key),
        escape_value(email.as_str())
    );
    format!(
        r"query {{
    orders(where: {}) {{
        total
    }}
}}",
        graphql_string(&predicate)
    )
}

/// Customers created in `range` that belong to the store.
#[must_use]
pub fn customers_created(store_key: &str, range: TimeRange) -> String {
    let predicate = format!(
        "stores(key=\"{}\") AND {}",
        escape_value(store_key),
        time_predicate("createdAt", range)
    );
    format!(
        r"query {{
    customers(where: {}) {{
        total
    }}
}}",
        graphql_string(&predicate)
    )
}

// =============================================================================
// Predicate helpers
// =============================================================================

fn orders_predicate(store_key: &str, filter: CustomerFilter, range: TimeRange) -> String {
    join_predicates(&[
        filter.predicate().map(str::to_owned),
        Some(time_predicate("createdAt", range)),
        Some(store_predicate(store_key)),
    ])
}

fn time_predicate(field: &str, range: TimeRange) -> String {
    format!(
        "{field} >= \"{}\" AND {field} < \"{}\"",
        range.start_iso(),
        range.end_iso()
    )
}

fn store_predicate(store_key: &str) -> String {
    format!("store(key=\"{}\")", escape_value(store_key))
}

fn join_predicates(parts: &[Option<String>]) -> String {
    parts.iter().flatten().cloned().collect::<Vec<_>>().join(" AND ")
}

/// Escape a value embedded in a double-quoted predicate literal.
fn escape_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render `s` as a GraphQL string literal.
///
/// JSON string escaping is a valid subset of GraphQL string escaping.
fn graphql_string(s: &str) -> String {
    serde_json::Value::String(s.to_owned()).to_string()
}
