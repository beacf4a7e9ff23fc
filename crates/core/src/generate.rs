//! Synthetic customer and order generation.
//!
//! Customers get sequential ids from 1. Each customer then receives a
//! normally distributed number of orders (mean `avg_orders`, standard
//! deviation 2, truncated and clamped at zero), numbered globally from 1.
//! All dates fall in the two years up to and including `today`.

use std::collections::HashSet;

use chrono::Duration;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::models::customer::Customer;
use crate::models::order::{Order, OrderStatus};
use crate::types::{Date, RowId};

/// Width of the date window ending at `today`.
pub const DATE_WINDOW_DAYS: i64 = 730;

/// Standard deviation of the orders-per-customer draw.
pub const ORDERS_STD_DEV: f64 = 2.0;

/// Order totals are drawn in cents from this inclusive range (5.00 to 500.00).
pub const MIN_AMOUNT_CENTS: i64 = 500;
pub const MAX_AMOUNT_CENTS: i64 = 50_000;

pub const DEFAULT_CUSTOMERS: usize = 1000;
pub const DEFAULT_AVG_ORDERS: u32 = 5;

/// Knobs for one generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    pub customers: usize,
    pub avg_orders: u32,
    /// Fixed seed for reproducible output; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            customers: DEFAULT_CUSTOMERS,
            avg_orders: DEFAULT_AVG_ORDERS,
            seed: None,
        }
    }
}

impl GenerationOptions {
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// Everything generated by one run, ready to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub customers: Vec<Customer>,
    pub orders: Vec<Order>,
}

impl Dataset {
    /// Generate customers, then their orders, from a single RNG stream.
    pub fn generate(options: &GenerationOptions, today: Date) -> Result<Self, CoreError> {
        let mut rng = options.rng();
        let customers = generate_customers(options.customers, &mut rng, today);
        let orders = generate_orders(&customers, options.avg_orders, &mut rng, today)?;
        Ok(Self { customers, orders })
    }
}

fn random_date<R: Rng + ?Sized>(rng: &mut R, today: Date) -> Date {
    today - Duration::days(rng.random_range(0..=DATE_WINDOW_DAYS))
}

/// Generate exactly `n` customers with ids `1..=n`.
pub fn generate_customers<R: Rng + ?Sized>(n: usize, rng: &mut R, today: Date) -> Vec<Customer> {
    (1..=n as RowId)
        .map(|customer_id| Customer {
            customer_id,
            first_name: FirstName().fake_with_rng(rng),
            last_name: LastName().fake_with_rng(rng),
            email: SafeEmail().fake_with_rng(rng),
            signup_date: random_date(rng, today),
        })
        .collect()
}

/// Generate orders for `customers`, walking them in order.
///
/// Only ids present in `customers` are ever referenced.
pub fn generate_orders<R: Rng + ?Sized>(
    customers: &[Customer],
    avg_orders: u32,
    rng: &mut R,
    today: Date,
) -> Result<Vec<Order>, CoreError> {
    let per_customer = Normal::new(f64::from(avg_orders), ORDERS_STD_DEV)
        .map_err(|e| CoreError::Internal(format!("Invalid order-count distribution: {e}")))?;

    let mut orders = Vec::new();
    let mut next_id: RowId = 1;

    for customer in customers {
        let draw: f64 = per_customer.sample(rng);
        let count = draw.max(0.0) as usize;

        for _ in 0..count {
            let cents = rng.random_range(MIN_AMOUNT_CENTS..=MAX_AMOUNT_CENTS);
            orders.push(Order {
                order_id: next_id,
                customer_id: customer.customer_id,
                order_date: random_date(rng, today),
                order_status: OrderStatus::ALL[rng.random_range(0..OrderStatus::ALL.len())],
                total_amount: Decimal::new(cents, 2),
            });
            next_id += 1;
        }
    }

    Ok(orders)
}

/// Check that every order points at a generated customer.
pub fn check_references(customers: &[Customer], orders: &[Order]) -> Result<(), CoreError> {
    let known: HashSet<RowId> = customers.iter().map(|c| c.customer_id).collect();

    match orders.iter().find(|o| !known.contains(&o.customer_id)) {
        Some(orphan) => Err(CoreError::Validation(format!(
            "Order {} references unknown customer {}",
            orphan.order_id, orphan.customer_id
        ))),
        None => Ok(()),
    }
}
