//! Seeding checks against a plain in-memory DuckDB session.
//!
//! These exercise the drop-and-recreate seeding and the read-back path
//! without the DuckLake extension or a live object store; the same
//! statements run unchanged once a catalog is attached and selected.

use duckdb::Connection;
use ducklake_provision::catalog::{fetch_customers, fetch_inventory, seed_sample_tables};
use ducklake_provision::tables::{SAMPLE_CUSTOMERS, SAMPLE_INVENTORY};

#[test]
fn seeding_loads_exact_rows_in_insertion_order() {
    let conn = Connection::open_in_memory().unwrap();

    seed_sample_tables(&conn).unwrap();

    let customers = fetch_customers(&conn).unwrap();
    let expected: Vec<_> = SAMPLE_CUSTOMERS.iter().map(|c| c.as_row()).collect();
    assert_eq!(customers, expected);

    let inventory = fetch_inventory(&conn).unwrap();
    let expected: Vec<_> = SAMPLE_INVENTORY.iter().map(|p| p.as_row()).collect();
    assert_eq!(inventory, expected);
}

#[test]
fn reseeding_leaves_exactly_the_defined_rows() {
    let conn = Connection::open_in_memory().unwrap();

    seed_sample_tables(&conn).unwrap();
    seed_sample_tables(&conn).unwrap();

    let customers = fetch_customers(&conn).unwrap();
    assert_eq!(customers.len(), SAMPLE_CUSTOMERS.len());

    let inventory = fetch_inventory(&conn).unwrap();
    assert_eq!(inventory.len(), SAMPLE_INVENTORY.len());

    let expected: Vec<_> = SAMPLE_INVENTORY.iter().map(|p| p.as_row()).collect();
    assert_eq!(inventory, expected);
}

#[test]
fn decimal_prices_round_trip_with_two_fractional_digits() {
    let conn = Connection::open_in_memory().unwrap();

    seed_sample_tables(&conn).unwrap();

    let inventory = fetch_inventory(&conn).unwrap();
    for (row, sample) in inventory.iter().zip(SAMPLE_INVENTORY.iter()) {
        assert_eq!(format!("{:.2}", row.price), format!("{:.2}", sample.price));
    }
}
