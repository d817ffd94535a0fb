use std::fs;
use std::path::PathBuf;

use storesmith_generate::{GenerateOptions, GenerationEngine};

fn temp_data_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "storesmith_generate_{label}_{}",
        uuid::Uuid::new_v4()
    ));
    fs::create_dir_all(&dir).expect("create temp data dir");
    dir
}

fn small_options(data_dir: PathBuf) -> GenerateOptions {
    GenerateOptions {
        data_dir,
        seed: 42,
        customers: Some(20),
        products: Some(15),
        orders: Some(25),
        order_items: Some(40),
    }
}

fn read_rows(path: &PathBuf) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("open csv");
    let header = reader
        .headers()
        .expect("headers")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|record| {
            record
                .expect("record")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect();
    (header, rows)
}

#[test]
fn generate_is_deterministic() {
    let dir_a = temp_data_dir("run_a");
    let dir_b = temp_data_dir("run_b");

    let result_a = GenerationEngine::new(small_options(dir_a.clone()))
        .run()
        .expect("run generation A");
    let result_b = GenerationEngine::new(small_options(dir_b.clone()))
        .run()
        .expect("run generation B");

    for table in ["customers", "products", "orders", "order_items", "payments"] {
        let file = format!("{table}.csv");
        let bytes_a = fs::read(result_a.data_dir.join(&file)).expect("read csv A");
        let bytes_b = fs::read(result_b.data_dir.join(&file)).expect("read csv B");
        assert_eq!(bytes_a, bytes_b, "{file} should be byte-identical");
    }
}

#[test]
fn generate_respects_pinned_row_counts() {
    let dir = temp_data_dir("rows");
    let result = GenerationEngine::new(small_options(dir))
        .run()
        .expect("run generation");

    let report = &result.report;
    assert_eq!(report.table("customers").unwrap().rows_written, 20);
    assert_eq!(report.table("products").unwrap().rows_written, 15);
    assert_eq!(report.table("orders").unwrap().rows_written, 25);
    assert_eq!(report.table("order_items").unwrap().rows_written, 40);
    // One payment per order.
    assert_eq!(report.table("payments").unwrap().rows_written, 25);

    let report_path = result.data_dir.join("generation_report.json");
    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).expect("read report"))
            .expect("parse report");
    assert_eq!(parsed["rows_total"].as_u64(), Some(125));
}

#[test]
fn foreign_keys_reference_generated_parents() {
    let dir = temp_data_dir("fks");
    let result = GenerationEngine::new(small_options(dir))
        .run()
        .expect("run generation");

    let (_, orders) = read_rows(&result.data_dir.join("orders.csv"));
    for row in &orders {
        let customer_id: u64 = row[1].parse().expect("customer_id");
        assert!((1..=20).contains(&customer_id));
    }

    let (_, items) = read_rows(&result.data_dir.join("order_items.csv"));
    for row in &items {
        let order_id: u64 = row[1].parse().expect("order_id");
        let product_id: u64 = row[2].parse().expect("product_id");
        assert!((1..=25).contains(&order_id));
        assert!((1..=15).contains(&product_id));
    }
}

#[test]
fn payment_amounts_match_order_totals() {
    let dir = temp_data_dir("amounts");
    let result = GenerationEngine::new(small_options(dir))
        .run()
        .expect("run generation");

    let (_, orders) = read_rows(&result.data_dir.join("orders.csv"));
    let (_, payments) = read_rows(&result.data_dir.join("payments.csv"));
    assert_eq!(orders.len(), payments.len());

    for payment in &payments {
        let order_id: usize = payment[1].parse().expect("order_id");
        let amount: f64 = payment[4].parse().expect("payment_amount");
        let total: f64 = orders[order_id - 1][7].parse().expect("total_amount");
        assert!((amount - total).abs() < 0.005);
    }
}

#[test]
fn order_totals_sum_item_totals() {
    let dir = temp_data_dir("totals");
    let result = GenerationEngine::new(small_options(dir))
        .run()
        .expect("run generation");

    let (_, orders) = read_rows(&result.data_dir.join("orders.csv"));
    let (_, items) = read_rows(&result.data_dir.join("order_items.csv"));

    let mut sums = vec![0.0_f64; orders.len()];
    for item in &items {
        let order_id: usize = item[1].parse().expect("order_id");
        let total: f64 = item[6].parse().expect("item total");
        sums[order_id - 1] += total;
    }

    for (row, sum) in orders.iter().zip(&sums) {
        let total_amount: f64 = row[7].parse().expect("total_amount");
        assert!((total_amount - sum).abs() < 0.01);
    }
}

#[test]
fn customer_emails_are_unique() {
    let dir = temp_data_dir("emails");
    let options = GenerateOptions {
        customers: Some(200),
        ..small_options(dir)
    };
    let result = GenerationEngine::new(options).run().expect("run generation");

    let (_, customers) = read_rows(&result.data_dir.join("customers.csv"));
    let mut seen = std::collections::HashSet::new();
    for row in &customers {
        assert!(seen.insert(row[3].clone()), "duplicate email {}", row[3]);
    }
}

#[test]
fn options_reject_orphan_tables() {
    let dir = temp_data_dir("invalid");
    let options = GenerateOptions {
        customers: Some(0),
        orders: Some(5),
        ..small_options(dir)
    };
    let error = GenerationEngine::new(options).run().expect_err("invalid options");
    assert!(error.to_string().contains("at least one customer"));
}
