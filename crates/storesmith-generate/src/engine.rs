use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, StateAbbr, StreetName, ZipCode};
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Word;
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::errors::GenerationError;
use crate::model::{GenerateOptions, GenerationReport, TableReport};
use crate::output::csv::write_table_csv;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const CUSTOMERS_HEADER: &[&str] = &[
    "customer_id",
    "first_name",
    "last_name",
    "email",
    "phone",
    "address",
    "city",
    "state",
    "zip_code",
    "country",
    "created_at",
    "customer_segment",
];

const PRODUCTS_HEADER: &[&str] = &[
    "product_id",
    "product_name",
    "category",
    "price",
    "cost",
    "stock_quantity",
    "supplier",
    "created_at",
    "rating",
];

const ORDERS_HEADER: &[&str] = &[
    "order_id",
    "customer_id",
    "order_date",
    "status",
    "shipping_address",
    "shipped_date",
    "delivery_date",
    "total_amount",
];

const ORDER_ITEMS_HEADER: &[&str] = &[
    "order_item_id",
    "order_id",
    "product_id",
    "quantity",
    "unit_price",
    "discount",
    "total",
];

const PAYMENTS_HEADER: &[&str] = &[
    "payment_id",
    "order_id",
    "payment_date",
    "payment_method",
    "payment_amount",
    "transaction_fee",
    "status",
    "transaction_id",
];

/// Category name, price range, and product-name prefixes.
const CATEGORIES: &[(&str, f64, f64, &[&str])] = &[
    (
        "Electronics",
        50.0,
        2000.0,
        &["Smart", "Pro", "Ultra", "Premium", "Wireless", "Digital"],
    ),
    (
        "Clothing",
        15.0,
        200.0,
        &["Classic", "Modern", "Casual", "Formal", "Comfort", "Style"],
    ),
    (
        "Home & Kitchen",
        10.0,
        500.0,
        &["Essential", "Deluxe", "Professional", "Premium", "Eco"],
    ),
    (
        "Books",
        5.0,
        50.0,
        &["The Art of", "Guide to", "Complete", "Mastering", "Introduction to"],
    ),
    (
        "Sports & Outdoors",
        20.0,
        300.0,
        &["Pro", "Adventure", "Elite", "Performance", "Outdoor"],
    ),
    (
        "Beauty & Personal Care",
        8.0,
        100.0,
        &["Natural", "Organic", "Premium", "Luxury", "Essential"],
    ),
    (
        "Toys & Games",
        10.0,
        150.0,
        &["Fun", "Educational", "Creative", "Action", "Adventure"],
    ),
    (
        "Automotive",
        15.0,
        500.0,
        &["Premium", "Heavy Duty", "Professional", "Universal", "High Performance"],
    ),
    (
        "Food & Grocery",
        5.0,
        100.0,
        &["Organic", "Fresh", "Gourmet", "Natural", "Premium"],
    ),
    (
        "Health & Wellness",
        10.0,
        200.0,
        &["Natural", "Organic", "Premium", "Advanced", "Essential"],
    ),
];

const ORDER_STATUSES: &[(&str, f64)] = &[
    ("Pending", 0.05),
    ("Processing", 0.10),
    ("Shipped", 0.15),
    ("Delivered", 0.65),
    ("Cancelled", 0.05),
];

const CUSTOMER_SEGMENTS: &[(&str, f64)] = &[
    ("Regular", 0.50),
    ("Premium", 0.30),
    ("New", 0.15),
    ("VIP", 0.05),
];

const PAYMENT_METHODS: &[&str] = &[
    "Credit Card",
    "Debit Card",
    "PayPal",
    "Apple Pay",
    "Google Pay",
    "Bank Transfer",
];

const PAYMENT_STATUSES: &[(&str, f64)] = &[
    ("Completed", 0.85),
    ("Pending", 0.05),
    ("Failed", 0.05),
    ("Refunded", 0.05),
];

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub data_dir: PathBuf,
    pub report: GenerationReport,
}

/// Entry point for generating the e-commerce dataset.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    /// Generate all five tables into the data directory.
    ///
    /// Tables are built parents-first so every foreign key references a row
    /// that exists. Order totals are accumulated from the generated items
    /// before the orders file is written.
    pub fn run(&self) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let seed = self.options.seed;
        std::fs::create_dir_all(&self.options.data_dir)?;

        let mut counts_rng = ChaCha8Rng::seed_from_u64(hash_seed(seed, "row_counts"));
        let num_customers = self
            .options
            .customers
            .unwrap_or_else(|| counts_rng.random_range(100..=300));
        let num_products = self
            .options
            .products
            .unwrap_or_else(|| counts_rng.random_range(100..=300));
        let num_orders = self
            .options
            .orders
            .unwrap_or_else(|| counts_rng.random_range(100..=300));
        let num_order_items = self
            .options
            .order_items
            .unwrap_or_else(|| counts_rng.random_range(150..=300));

        if num_orders > 0 && num_customers == 0 {
            return Err(GenerationError::InvalidOptions(
                "orders require at least one customer".to_string(),
            ));
        }
        if num_order_items > 0 && (num_orders == 0 || num_products == 0) {
            return Err(GenerationError::InvalidOptions(
                "order items require at least one order and one product".to_string(),
            ));
        }

        info!(
            seed,
            customers = num_customers,
            products = num_products,
            orders = num_orders,
            order_items = num_order_items,
            data_dir = %self.options.data_dir.display(),
            "generation started"
        );

        let customers = generate_customers(seed, num_customers);
        let products = generate_products(seed, num_products);
        let mut orders = generate_orders(seed, num_orders, num_customers);
        let order_items = generate_order_items(seed, num_order_items, &mut orders, &products);
        let payments = generate_payments(seed, &orders);

        let mut report = GenerationReport::new(seed);
        let tables: [(&str, &[&str], &[Vec<String>]); 5] = [
            ("customers", CUSTOMERS_HEADER, &customers),
            ("products", PRODUCTS_HEADER, &products.rows),
            ("orders", ORDERS_HEADER, &orders.rows),
            ("order_items", ORDER_ITEMS_HEADER, &order_items),
            ("payments", PAYMENTS_HEADER, &payments),
        ];

        for (table, header, rows) in tables {
            let path = self.options.data_dir.join(format!("{table}.csv"));
            let bytes_written = write_table_csv(&path, header, rows)?;
            info!(table, rows = rows.len() as u64, bytes_written, "table written");
            report.record_table(TableReport {
                table: table.to_string(),
                rows_requested: rows.len() as u64,
                rows_written: rows.len() as u64,
                bytes_written,
            });
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        std::fs::write(
            self.options.data_dir.join("generation_report.json"),
            serde_json::to_vec_pretty(&report)?,
        )?;

        info!(
            rows_total = report.rows_total,
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(GenerationResult {
            data_dir: self.options.data_dir.clone(),
            report,
        })
    }
}

struct ProductData {
    rows: Vec<Vec<String>>,
    prices: Vec<f64>,
}

struct OrderData {
    rows: Vec<Vec<String>>,
    dates: Vec<NaiveDateTime>,
    totals: Vec<f64>,
}

fn generate_customers(seed: u64, count: u64) -> Vec<Vec<String>> {
    let mut rng = ChaCha8Rng::seed_from_u64(hash_seed(seed, "customers"));
    let mut seen_emails: HashSet<String> = HashSet::new();
    let mut rows = Vec::with_capacity(count as usize);

    for customer_id in 1..=count {
        let first: String = FirstName().fake_with_rng(&mut rng);
        let last: String = LastName().fake_with_rng(&mut rng);
        let email: String = SafeEmail().fake_with_rng(&mut rng);
        let email = unique_email(&mut seen_emails, email, customer_id);
        let created_at = datetime_back(&mut rng, 0, 730);

        rows.push(vec![
            customer_id.to_string(),
            first,
            last,
            email,
            PhoneNumber().fake_with_rng(&mut rng),
            street_address(&mut rng),
            CityName().fake_with_rng(&mut rng),
            StateAbbr().fake_with_rng(&mut rng),
            ZipCode().fake_with_rng(&mut rng),
            "USA".to_string(),
            created_at.format(DATETIME_FORMAT).to_string(),
            weighted_pick(&mut rng, CUSTOMER_SEGMENTS).to_string(),
        ]);
    }

    rows
}

fn generate_products(seed: u64, count: u64) -> ProductData {
    let mut rng = ChaCha8Rng::seed_from_u64(hash_seed(seed, "products"));
    let mut rows = Vec::with_capacity(count as usize);
    let mut prices = Vec::with_capacity(count as usize);

    for product_id in 1..=count {
        let (category, price_min, price_max, prefixes) =
            CATEGORIES[rng.random_range(0..CATEGORIES.len())];
        let prefix = prefixes[rng.random_range(0..prefixes.len())];
        let word: String = Word().fake_with_rng(&mut rng);
        let head_noun = category.split_whitespace().next().unwrap_or(category);
        let name = format!("{prefix} {} {head_noun}", capitalize(&word));

        let price = round2(rng.random_range(price_min..=price_max));
        let cost = round2(rng.random_range(price * 0.4..=price * 0.7));
        // 5% of products carry no rating yet.
        let rating = if rng.random_bool(0.05) {
            String::new()
        } else {
            format!("{:.1}", rng.random_range(3.0..=5.0_f64))
        };
        let created_at = datetime_back(&mut rng, 365, 1095);

        rows.push(vec![
            product_id.to_string(),
            name,
            category.to_string(),
            format!("{price:.2}"),
            format!("{cost:.2}"),
            rng.random_range(0..=500_u32).to_string(),
            CompanyName().fake_with_rng(&mut rng),
            created_at.format(DATETIME_FORMAT).to_string(),
            rating,
        ]);
        prices.push(price);
    }

    ProductData { rows, prices }
}

fn generate_orders(seed: u64, count: u64, num_customers: u64) -> OrderData {
    let mut rng = ChaCha8Rng::seed_from_u64(hash_seed(seed, "orders"));
    let mut rows = Vec::with_capacity(count as usize);
    let mut dates = Vec::with_capacity(count as usize);

    for order_id in 1..=count {
        let customer_id = rng.random_range(1..=num_customers);
        let order_date = datetime_back(&mut rng, 0, 365);
        let status = weighted_pick(&mut rng, ORDER_STATUSES);

        let shipped = order_date + Duration::days(rng.random_range(1..=7));
        let delivered = shipped + Duration::days(rng.random_range(2..=10));
        let shipped_date = if status == "Shipped" || status == "Delivered" {
            shipped.format(DATETIME_FORMAT).to_string()
        } else {
            String::new()
        };
        let delivery_date = if status == "Delivered" {
            delivered.format(DATETIME_FORMAT).to_string()
        } else {
            String::new()
        };

        let shipping_address = format!(
            "{}, {}, {} {}",
            street_address(&mut rng),
            CityName().fake_with_rng::<String, _>(&mut rng),
            StateAbbr().fake_with_rng::<String, _>(&mut rng),
            ZipCode().fake_with_rng::<String, _>(&mut rng),
        );

        rows.push(vec![
            order_id.to_string(),
            customer_id.to_string(),
            order_date.format(DATETIME_FORMAT).to_string(),
            status.to_string(),
            shipping_address,
            shipped_date,
            delivery_date,
            // Rewritten once items have been generated.
            "0.00".to_string(),
        ]);
        dates.push(order_date);
    }

    OrderData {
        rows,
        dates,
        totals: vec![0.0; count as usize],
    }
}

fn generate_order_items(
    seed: u64,
    count: u64,
    orders: &mut OrderData,
    products: &ProductData,
) -> Vec<Vec<String>> {
    let mut rng = ChaCha8Rng::seed_from_u64(hash_seed(seed, "order_items"));
    let mut rows = Vec::with_capacity(count as usize);

    for order_item_id in 1..=count {
        let order_idx = rng.random_range(0..orders.rows.len());
        let product_idx = rng.random_range(0..products.prices.len());

        let quantity = rng.random_range(1..=10_u32);
        // Price at the time of the order drifts a little from list price.
        let unit_price = round2(products.prices[product_idx] * rng.random_range(0.95..=1.05));
        let subtotal = round2(unit_price * quantity as f64);
        let discount = if rng.random_bool(0.2) {
            round2(subtotal * rng.random_range(0.05..=0.20))
        } else {
            0.0
        };
        let total = round2(subtotal - discount);

        rows.push(vec![
            order_item_id.to_string(),
            (order_idx + 1).to_string(),
            (product_idx + 1).to_string(),
            quantity.to_string(),
            format!("{unit_price:.2}"),
            format!("{discount:.2}"),
            format!("{total:.2}"),
        ]);
        orders.totals[order_idx] += total;
    }

    for (idx, row) in orders.rows.iter_mut().enumerate() {
        orders.totals[idx] = round2(orders.totals[idx]);
        row[7] = format!("{:.2}", orders.totals[idx]);
    }

    rows
}

fn generate_payments(seed: u64, orders: &OrderData) -> Vec<Vec<String>> {
    let mut rng = ChaCha8Rng::seed_from_u64(hash_seed(seed, "payments"));
    let mut seen_transactions: HashSet<String> = HashSet::new();
    let mut rows = Vec::with_capacity(orders.rows.len());

    for (idx, order_date) in orders.dates.iter().enumerate() {
        let payment_id = idx + 1;
        let payment_date = *order_date + Duration::minutes(rng.random_range(0..=30));
        let amount = orders.totals[idx];
        let fee = round2(amount * rng.random_range(0.02..=0.03));
        let method = PAYMENT_METHODS[rng.random_range(0..PAYMENT_METHODS.len())];

        let mut transaction_id = format!("{:016X}", rng.random::<u64>());
        while !seen_transactions.insert(transaction_id.clone()) {
            transaction_id = format!("{:016X}", rng.random::<u64>());
        }

        rows.push(vec![
            payment_id.to_string(),
            (idx + 1).to_string(),
            payment_date.format(DATETIME_FORMAT).to_string(),
            method.to_string(),
            format!("{amount:.2}"),
            format!("{fee:.2}"),
            weighted_pick(&mut rng, PAYMENT_STATUSES).to_string(),
            transaction_id,
        ]);
    }

    rows
}

/// Anchor for all generated timestamps. Fixed so a seed pins the output
/// bytes regardless of when the generator runs.
fn anchor() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap_or_default()
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
}

/// Random timestamp between `min_days` and `max_days` before the anchor.
fn datetime_back(rng: &mut ChaCha8Rng, min_days: i64, max_days: i64) -> NaiveDateTime {
    let seconds = rng.random_range(min_days * 86_400..=max_days * 86_400);
    anchor() - Duration::seconds(seconds)
}

fn weighted_pick<'a>(rng: &mut ChaCha8Rng, choices: &[(&'a str, f64)]) -> &'a str {
    let total: f64 = choices.iter().map(|(_, weight)| weight).sum();
    let mut roll = rng.random::<f64>() * total;
    for (value, weight) in choices {
        if roll < *weight {
            return value;
        }
        roll -= weight;
    }
    choices[choices.len() - 1].0
}

fn street_address(rng: &mut ChaCha8Rng) -> String {
    let number: String = BuildingNumber().fake_with_rng(&mut *rng);
    let street: String = StreetName().fake_with_rng(&mut *rng);
    format!("{number} {street}")
}

/// Deduplicate emails by suffixing the local part with the customer id.
fn unique_email(seen: &mut HashSet<String>, email: String, customer_id: u64) -> String {
    if seen.insert(email.clone()) {
        return email;
    }
    let deduped = match email.split_once('@') {
        Some((local, domain)) => format!("{local}{customer_id}@{domain}"),
        None => format!("{email}{customer_id}"),
    };
    seen.insert(deduped.clone());
    deduped
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_pick_returns_declared_values() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            let segment = weighted_pick(&mut rng, CUSTOMER_SEGMENTS);
            assert!(
                CUSTOMER_SEGMENTS
                    .iter()
                    .any(|(value, _)| *value == segment)
            );
        }
    }

    #[test]
    fn unique_email_suffixes_duplicates() {
        let mut seen = HashSet::new();
        let first = unique_email(&mut seen, "ada@example.com".to_string(), 1);
        let second = unique_email(&mut seen, "ada@example.com".to_string(), 2);
        assert_eq!(first, "ada@example.com");
        assert_eq!(second, "ada2@example.com");
    }

    #[test]
    fn datetime_back_stays_in_window() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let value = datetime_back(&mut rng, 0, 365);
            assert!(value <= anchor());
            assert!(value >= anchor() - Duration::days(365));
        }
    }

    #[test]
    fn round2_truncates_to_cents() {
        assert_eq!(round2(10.005), 10.01);
        assert_eq!(round2(3.14159), 3.14);
    }

    #[test]
    fn hash_seed_separates_tables() {
        assert_ne!(hash_seed(42, "customers"), hash_seed(42, "orders"));
        assert_ne!(hash_seed(42, "customers"), hash_seed(43, "customers"));
    }
}
