//! End-to-end runs through the real strategies, split logic and query
//! builders, answered by a fake commercetools API.
//!
//! Run with: cargo test -p ct-metrics-integration-tests

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use chrono::{DateTime, TimeZone, Utc};
use ct_metrics_core::{MetricMode, TimeRange};
use ct_metrics_integration_tests::{FakeCommercetools, lookup_email, window};
use ct_metrics_reporter::{GraphQLError, MetricStrategies, ReportError, run_metric};
use serde_json::{Value, json};

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 2, h, m, 0).unwrap()
}

fn span(from: DateTime<Utc>, to: DateTime<Utc>) -> TimeRange {
    TimeRange::new(from, to).unwrap()
}

fn carts(total: u64) -> Value {
    json!({ "carts": { "total": total } })
}

fn orders(total: u64) -> Value {
    json!({ "orders": { "total": total } })
}

fn orders_with(total: u64, emails: &[&str]) -> Value {
    let results: Vec<Value> = emails
        .iter()
        .map(|email| json!({ "customerEmail": email }))
        .collect();
    json!({ "orders": { "total": total, "results": results } })
}

// ============================================================================
// Interval modes
// ============================================================================

#[tokio::test]
async fn test_cart_total_busy_hour_is_split() {
    let api = FakeCommercetools::new(|query| {
        let total = match window(query) {
            Some(("2026-02-02T01:00:00.000Z", "2026-02-02T02:00:00.000Z")) => 12_000,
            Some(("2026-02-02T01:00:00.000Z", "2026-02-02T01:30:00.000Z")) => 7_000,
            Some(("2026-02-02T01:30:00.000Z", "2026-02-02T02:00:00.000Z")) => 6_000,
            _ => 100,
        };
        Ok(carts(total))
    });
    let strategies = MetricStrategies::new(&api, "kwh");

    let total = run_metric(&strategies, MetricMode::CartTotal, span(at(0, 0), at(2, 30)))
        .await
        .unwrap();

    // [00-01) + halves of [01-02) + [02-03)
    assert_eq!(total, 100 + 7_000 + 6_000 + 100);
    assert_eq!(api.queries().len(), 5);
    assert_eq!(api.count_containing("lineItems is defined"), 5);
}

#[tokio::test]
async fn test_last_interval_overshoots_span_end() {
    let api = FakeCommercetools::new(|_| Ok(carts(1)));
    let strategies = MetricStrategies::new(&api, "kwh");

    run_metric(&strategies, MetricMode::AnonymousCart, span(at(0, 0), at(1, 30)))
        .await
        .unwrap();

    let windows: Vec<(String, String)> = api
        .queries()
        .iter()
        .filter_map(|q| window(q).map(|(a, b)| (a.to_string(), b.to_string())))
        .collect();
    assert_eq!(
        windows.last().unwrap(),
        &(
            "2026-02-02T01:00:00.000Z".to_string(),
            "2026-02-02T02:00:00.000Z".to_string()
        )
    );
    assert_eq!(api.count_containing("customerId is not defined"), 2);
}

#[tokio::test]
async fn test_first_time_buyers_counts_single_lifetime_orders() {
    let api = FakeCommercetools::new(|query| match lookup_email(query) {
        Some("a@example.com") => Ok(orders(3)),
        Some("b@example.com") => Ok(orders(1)),
        Some(_) => Ok(orders(0)),
        None => Ok(orders_with(3, &["a@example.com", "b@example.com", "a@example.com"])),
    });
    let strategies = MetricStrategies::new(&api, "kwh");

    let total = run_metric(&strategies, MetricMode::FirstTimeBuyers, span(at(0, 0), at(4, 0)))
        .await
        .unwrap();

    assert_eq!(total, 1);
    // one listing plus a lookup per order, duplicates included
    assert_eq!(api.queries().len(), 4);
    assert_eq!(api.count_containing("customerEmail=\\\"a@example.com"), 2);
}

// ============================================================================
// Full-range modes
// ============================================================================

#[tokio::test]
async fn test_full_range_mode_is_never_split() {
    let api = FakeCommercetools::new(|_| Ok(orders(50_000)));
    let strategies = MetricStrategies::new(&api, "kwh");

    let total = run_metric(&strategies, MetricMode::AnonymousOrders, span(at(0, 0), at(23, 59)))
        .await
        .unwrap();

    assert_eq!(total, 50_000);
    assert_eq!(api.queries().len(), 1);
    assert_eq!(
        window(&api.queries()[0]),
        Some(("2026-02-02T00:00:00.000Z", "2026-02-02T23:59:00.000Z"))
    );
}

#[tokio::test]
async fn test_repeated_orders_walks_every_page() {
    let emails: Vec<String> = (0..500).map(|i| format!("c{i}@example.com")).collect();

    let api = FakeCommercetools::new(move |query| {
        let page: Vec<&str> = if query.contains("offset: 0") {
            emails.iter().map(String::as_str).collect()
        } else if query.contains("offset: 500") {
            emails.iter().take(100).map(String::as_str).collect()
        } else {
            Vec::new()
        };
        Ok(orders_with(600, &page))
    });
    let strategies = MetricStrategies::new(&api, "kwh");

    let total = run_metric(&strategies, MetricMode::RepeatedOrders, span(at(0, 0), at(23, 0)))
        .await
        .unwrap();

    assert_eq!(total, 100);
    assert_eq!(api.queries().len(), 2);
}

#[tokio::test]
async fn test_total_customers_scoped_to_store() {
    let api = FakeCommercetools::new(|_| Ok(json!({ "customers": { "total": 42 } })));
    let strategies = MetricStrategies::new(&api, "outlet");

    let total = run_metric(&strategies, MetricMode::TotalCustomers, span(at(0, 0), at(12, 0)))
        .await
        .unwrap();

    assert_eq!(total, 42);
    assert_eq!(api.count_containing("stores(key=\\\"outlet\\\")"), 1);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_graphql_error_aborts_run() {
    let api = FakeCommercetools::new(|query| match window(query) {
        Some(("2026-02-02T01:00:00.000Z", _)) => Err(ReportError::GraphQL(vec![GraphQLError {
            message: "Malformed parameter: where".to_string(),
            path: vec![json!("carts")],
        }])),
        _ => Ok(carts(10)),
    });
    let strategies = MetricStrategies::new(&api, "kwh");

    let err = run_metric(&strategies, MetricMode::LoggedInCart, span(at(0, 0), at(4, 0)))
        .await
        .unwrap_err();

    assert!(matches!(err, ReportError::GraphQL(_)));
    assert!(err.to_string().contains("Malformed parameter"));
    // intervals after the failing one are never queried
    assert_eq!(api.queries().len(), 2);
}
