//! Sample table definitions.
//!
//! DDL lives in `const` statements and the literal rows in typed `const`
//! arrays, so the seeder and the tests share a single source of truth.

/// A `customer` sample row.
#[derive(Debug, Clone, Copy)]
pub struct SampleCustomer {
    pub customer_id: i32,
    pub name: &'static str,
    pub email: &'static str,
    pub address: &'static str,
}

impl SampleCustomer {
    /// The row this sample is expected to read back as.
    pub fn as_row(&self) -> CustomerRow {
        CustomerRow {
            customer_id: self.customer_id,
            name: self.name.to_string(),
            email: self.email.to_string(),
            address: self.address.to_string(),
        }
    }
}

/// An `inventory` sample row.
#[derive(Debug, Clone, Copy)]
pub struct SampleProduct {
    pub product_id: i32,
    pub product_name: &'static str,
    pub quantity: i32,
    pub price: f64,
}

impl SampleProduct {
    /// The row this sample is expected to read back as.
    pub fn as_row(&self) -> InventoryRow {
        InventoryRow {
            product_id: self.product_id,
            product_name: self.product_name.to_string(),
            quantity: self.quantity,
            price: self.price,
        }
    }
}

/// A `customer` row as read back from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRow {
    pub customer_id: i32,
    pub name: String,
    pub email: String,
    pub address: String,
}

/// An `inventory` row as read back from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRow {
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub price: f64,
}

/// The three fixed `customer` rows, in insertion order.
pub const SAMPLE_CUSTOMERS: [SampleCustomer; 3] = [
    SampleCustomer {
        customer_id: 1,
        name: "John Doe",
        email: "john@example.com",
        address: "123 Main St",
    },
    SampleCustomer {
        customer_id: 2,
        name: "Jane Smith",
        email: "jane@example.com",
        address: "456 Oak Ave",
    },
    SampleCustomer {
        customer_id: 3,
        name: "Bob Johnson",
        email: "bob@example.com",
        address: "789 Pine Rd",
    },
];

/// The four fixed `inventory` rows, in insertion order.
pub const SAMPLE_INVENTORY: [SampleProduct; 4] = [
    SampleProduct {
        product_id: 101,
        product_name: "Laptop",
        quantity: 50,
        price: 999.99,
    },
    SampleProduct {
        product_id: 102,
        product_name: "Smartphone",
        quantity: 100,
        price: 499.99,
    },
    SampleProduct {
        product_id: 103,
        product_name: "Tablet",
        quantity: 75,
        price: 299.99,
    },
    SampleProduct {
        product_id: 104,
        product_name: "Headphones",
        quantity: 200,
        price: 99.99,
    },
];

pub const DROP_CUSTOMER_TABLE: &str = "DROP TABLE IF EXISTS customer;";

pub const DROP_INVENTORY_TABLE: &str = "DROP TABLE IF EXISTS inventory;";

pub const CREATE_CUSTOMER_TABLE: &str = r#"
    CREATE TABLE customer(
        customer_id INTEGER,
        name VARCHAR,
        email VARCHAR,
        address VARCHAR
    );
"#;

pub const CREATE_INVENTORY_TABLE: &str = r#"
    CREATE TABLE inventory(
        product_id INTEGER,
        product_name VARCHAR,
        quantity INTEGER,
        price DECIMAL(10,2)
    );
"#;

pub const INSERT_CUSTOMER: &str = "INSERT INTO customer VALUES (?, ?, ?, ?)";

// The decimal cast keeps the column type authoritative for the bound value.
pub const INSERT_INVENTORY: &str =
    "INSERT INTO inventory VALUES (?, ?, ?, CAST(? AS DECIMAL(10,2)))";

pub const SELECT_CUSTOMERS: &str = "SELECT customer_id, name, email, address FROM customer";

pub const SELECT_INVENTORY: &str =
    "SELECT product_id, product_name, quantity, CAST(price AS DOUBLE) FROM inventory";
