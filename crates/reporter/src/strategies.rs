//! Per-mode counting strategies.
//!
//! Every strategy turns a [`TimeRange`] into one exact count. Count fields
//! the API leaves out are read as zero: commercetools omits them when a
//! range has no matches, so an absent field is not a fault.

use std::future::Future;

use ct_metrics_core::{CustomerEmail, EmailSet, MetricMode, TimeRange};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::ReportError;
use crate::commercetools::QueryExecutor;
use crate::commercetools::queries::{self, CustomerFilter};

/// Page size used when walking every order in a range.
pub const ORDER_PAGE_SIZE: u64 = 500;

/// Produces the count for one mode over one range.
pub trait MetricEvaluator {
    fn evaluate(
        &self,
        mode: MetricMode,
        range: TimeRange,
    ) -> impl Future<Output = Result<u64, ReportError>>;
}

/// Strategies backed by a [`QueryExecutor`], scoped to a single store.
#[derive(Debug)]
pub struct MetricStrategies<'a, E> {
    executor: &'a E,
    store_key: &'a str,
}

/// The `orders` object of a paged or email-listing query.
#[derive(Debug, Default, Deserialize)]
struct OrdersPage {
    total: Option<u64>,
    results: Option<Vec<OrderEmail>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderEmail {
    customer_email: Option<String>,
}

impl OrdersPage {
    fn from_data(data: &Value) -> Result<Self, ReportError> {
        match data.get("orders") {
            Some(orders) if !orders.is_null() => Ok(serde_json::from_value(orders.clone())?),
            _ => Ok(Self::default()),
        }
    }

    /// Emails on this page, skipping orders that carry none.
    fn emails(self) -> impl Iterator<Item = CustomerEmail> {
        self.results
            .unwrap_or_default()
            .into_iter()
            .filter_map(|order| order.customer_email)
            .filter_map(|email| CustomerEmail::parse(&email).ok())
    }
}

impl<'a, E: QueryExecutor> MetricStrategies<'a, E> {
    #[must_use]
    pub const fn new(executor: &'a E, store_key: &'a str) -> Self {
        Self {
            executor,
            store_key,
        }
    }

    /// Carts with line items last modified in `range`.
    ///
    /// # Errors
    ///
    /// Propagates query execution failures.
    #[instrument(skip(self, range), fields(range = %range))]
    pub async fn cart_total(&self, filter: CustomerFilter, range: TimeRange) -> Result<u64, ReportError> {
        let data = self
            .executor
            .execute(&queries::carts_total(self.store_key, filter, range))
            .await?;
        Ok(total_at(&data, "/carts/total"))
    }

    /// Orders created in `range`.
    ///
    /// # Errors
    ///
    /// Propagates query execution failures.
    #[instrument(skip(self, range), fields(range = %range))]
    pub async fn order_total(&self, filter: CustomerFilter, range: TimeRange) -> Result<u64, ReportError> {
        let data = self
            .executor
            .execute(&queries::orders_total(self.store_key, filter, range))
            .await?;
        Ok(total_at(&data, "/orders/total"))
    }

    /// Customers created in `range`.
    ///
    /// # Errors
    ///
    /// Propagates query execution failures.
    #[instrument(skip(self, range), fields(range = %range))]
    pub async fn customers_created(&self, range: TimeRange) -> Result<u64, ReportError> {
        let data = self
            .executor
            .execute(&queries::customers_created(self.store_key, range))
            .await?;
        Ok(total_at(&data, "/customers/total"))
    }

    /// Customers appearing on more than one order in `range`.
    ///
    /// Walks every order oldest first, [`ORDER_PAGE_SIZE`] at a time, until
    /// the fetched count reaches the total the server reports. An empty page
    /// also ends the walk.
    ///
    /// # Errors
    ///
    /// Propagates query execution and response decoding failures.
    #[instrument(skip(self, range), fields(range = %range))]
    pub async fn repeated_customers(&self, range: TimeRange) -> Result<u64, ReportError> {
        let mut seen = EmailSet::new();
        let mut repeated = EmailSet::new();
        let mut offset = 0;
        let mut fetched = 0;

        loop {
            let query = queries::orders_page(self.store_key, range, ORDER_PAGE_SIZE, offset);
            let page = OrdersPage::from_data(&self.executor.execute(&query).await?)?;
            let total = page.total.unwrap_or(0);
            let page_len = page.results.as_ref().map_or(0, Vec::len);

            debug!(fetched = page_len, offset, total, "Fetched orders page");

            for email in page.emails() {
                if seen.insert_checked(email.clone()) && !repeated.insert_checked(email) {
                    debug!(repeated = repeated.len(), "Repeated customer found");
                }
            }

            fetched += as_count(page_len);
            offset += ORDER_PAGE_SIZE;
            if fetched >= total || page_len == 0 {
                break;
            }
        }

        if repeated.is_empty() {
            debug!(customers = seen.len(), "No repeated customers in range");
        } else {
            debug!(repeated = repeated.len(), "Repeated customers found");
        }
        Ok(as_count(repeated.len()))
    }

    /// Customers in `range` whose lifetime order count is exactly one.
    ///
    /// Reads the first page of orders in the range, then runs one lifetime
    /// lookup per order email. Emails are not de-duplicated, so a customer
    /// with two orders in the range is looked up twice.
    ///
    /// # Errors
    ///
    /// Propagates query execution and response decoding failures.
    #[instrument(skip(self, range), fields(range = %range))]
    pub async fn first_time_buyers(&self, range: TimeRange) -> Result<u64, ReportError> {
        let data = self
            .executor
            .execute(&queries::orders_with_emails(self.store_key, range))
            .await?;

        let mut count = 0;
        for email in OrdersPage::from_data(&data)?.emails() {
            let data = self
                .executor
                .execute(&queries::lifetime_orders_by_email(self.store_key, &email))
                .await?;
            let lifetime = total_at(&data, "/orders/total");
            debug!(email = %email, lifetime, "Lifetime orders");
            if lifetime == 1 {
                count += 1;
            }
        }
        Ok(count)
    }
}

impl<E: QueryExecutor> MetricEvaluator for MetricStrategies<'_, E> {
    async fn evaluate(&self, mode: MetricMode, range: TimeRange) -> Result<u64, ReportError> {
        match mode {
            MetricMode::CartTotal => self.cart_total(CustomerFilter::Any, range).await,
            MetricMode::AnonymousCart => self.cart_total(CustomerFilter::Anonymous, range).await,
            MetricMode::LoggedInCart => self.cart_total(CustomerFilter::LoggedIn, range).await,
            MetricMode::FirstTimeBuyers => self.first_time_buyers(range).await,
            MetricMode::LoggedInOrders => self.order_total(CustomerFilter::LoggedIn, range).await,
            MetricMode::AnonymousOrders => self.order_total(CustomerFilter::Anonymous, range).await,
            MetricMode::RepeatedOrders => self.repeated_customers(range).await,
            MetricMode::TotalOrders => self.order_total(CustomerFilter::Any, range).await,
            MetricMode::TotalCustomers => self.customers_created(range).await,
        }
    }
}

/// Read a count at `pointer`, treating an absent or non-numeric field as zero.
fn total_at(data: &Value, pointer: &str) -> u64 {
    data.pointer(pointer).and_then(Value::as_u64).unwrap_or(0)
}

fn as_count(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}
