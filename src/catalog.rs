//! DuckLake catalog bootstrap.
//!
//! Opens an in-memory DuckDB session, loads the DuckLake extension, sets the
//! object-storage credentials as session configuration, attaches a named
//! catalog whose data path points at the provisioned bucket, and seeds the
//! sample tables. Seeding is drop-and-recreate: re-running against the same
//! catalog location leaves each table holding exactly its defined rows.
//!
//! The seeding and read-back functions take a plain [`Connection`] so they
//! can be exercised against an in-memory session without the extension or a
//! live object store.

use duckdb::{Connection, params};
use snafu::prelude::*;

use crate::config::{AwsCredentials, SetupConfig};
use crate::tables::{
    CREATE_CUSTOMER_TABLE, CREATE_INVENTORY_TABLE, CustomerRow, DROP_CUSTOMER_TABLE,
    DROP_INVENTORY_TABLE, INSERT_CUSTOMER, INSERT_INVENTORY, InventoryRow, SAMPLE_CUSTOMERS,
    SAMPLE_INVENTORY, SELECT_CUSTOMERS, SELECT_INVENTORY,
};

/// General result type used by catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while bootstrapping the catalog.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CatalogError {
    /// Opening the in-memory session failed.
    #[snafu(display("Failed to open in-memory session: {source}"))]
    Open { source: duckdb::Error },

    /// Installing or loading the DuckLake extension failed.
    #[snafu(display("Failed to install or load the ducklake extension: {source}"))]
    Extension { source: duckdb::Error },

    /// Setting a session option failed.
    #[snafu(display("Failed to set session option '{option}': {source}"))]
    Configure {
        option: String,
        source: duckdb::Error,
    },

    /// Attaching or selecting the catalog failed.
    #[snafu(display("Failed to attach catalog '{catalog}': {source}"))]
    Attach {
        catalog: String,
        source: duckdb::Error,
    },

    /// A DDL or DML statement against a sample table failed.
    #[snafu(display("Statement failed for table '{table}': {source}"))]
    Statement {
        table: String,
        source: duckdb::Error,
    },

    /// Reading a sample table back failed.
    #[snafu(display("Failed to read back table '{table}': {source}"))]
    Fetch {
        table: String,
        source: duckdb::Error,
    },
}

/// An analytical session with the DuckLake extension loaded and configured.
pub struct CatalogSession {
    conn: Connection,
}

impl CatalogSession {
    /// Open an in-memory DuckDB session, install and load the DuckLake
    /// extension, and set the object-storage credentials as session
    /// configuration.
    pub fn open(credentials: &AwsCredentials) -> CatalogResult<Self> {
        let conn = Connection::open_in_memory().context(OpenSnafu)?;
        conn.execute_batch("INSTALL ducklake; LOAD ducklake;")
            .context(ExtensionSnafu)?;

        let session = Self { conn };
        session.set_option("s3_access_key_id", &credentials.access_key)?;
        session.set_option("s3_secret_access_key", &credentials.secret_key)?;
        session.set_option("s3_region", &credentials.region)?;
        Ok(session)
    }

    // SET does not accept bound parameters; escape the literal instead.
    fn set_option(&self, option: &str, value: &str) -> CatalogResult<()> {
        let sql = format!("SET {option} = {};", quote_literal(value));
        self.conn
            .execute_batch(&sql)
            .context(ConfigureSnafu { option })?;
        Ok(())
    }

    /// Attach the DuckLake catalog backed by the bucket's data prefix and
    /// make it the active catalog.
    pub fn attach(&self, config: &SetupConfig) -> CatalogResult<()> {
        let attach = format!(
            "ATTACH {} AS {} (DATA_PATH {});",
            quote_literal(&format!("ducklake:{}", config.metadata_path)),
            quote_identifier(&config.catalog_name),
            quote_literal(&config.data_path()),
        );
        self.conn.execute_batch(&attach).context(AttachSnafu {
            catalog: config.catalog_name.as_str(),
        })?;

        let select = format!("USE {};", quote_identifier(&config.catalog_name));
        self.conn.execute_batch(&select).context(AttachSnafu {
            catalog: config.catalog_name.as_str(),
        })?;

        Ok(())
    }

    /// The underlying connection, for seeding and read-back.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Drop both sample tables if present, recreate them, and insert the fixed
/// literal rows.
///
/// Destructive by design: the tables are rebuilt from scratch on every call,
/// which is what keeps repeated runs from accumulating duplicate rows.
pub fn seed_sample_tables(conn: &Connection) -> CatalogResult<()> {
    conn.execute_batch(DROP_CUSTOMER_TABLE)
        .context(StatementSnafu { table: "customer" })?;
    conn.execute_batch(DROP_INVENTORY_TABLE)
        .context(StatementSnafu { table: "inventory" })?;

    conn.execute_batch(CREATE_CUSTOMER_TABLE)
        .context(StatementSnafu { table: "customer" })?;
    let mut insert = conn
        .prepare(INSERT_CUSTOMER)
        .context(StatementSnafu { table: "customer" })?;
    for customer in &SAMPLE_CUSTOMERS {
        insert
            .execute(params![
                customer.customer_id,
                customer.name,
                customer.email,
                customer.address,
            ])
            .context(StatementSnafu { table: "customer" })?;
    }

    conn.execute_batch(CREATE_INVENTORY_TABLE)
        .context(StatementSnafu { table: "inventory" })?;
    let mut insert = conn
        .prepare(INSERT_INVENTORY)
        .context(StatementSnafu { table: "inventory" })?;
    for product in &SAMPLE_INVENTORY {
        insert
            .execute(params![
                product.product_id,
                product.product_name,
                product.quantity,
                product.price,
            ])
            .context(StatementSnafu { table: "inventory" })?;
    }

    Ok(())
}

/// Read back every `customer` row.
pub fn fetch_customers(conn: &Connection) -> CatalogResult<Vec<CustomerRow>> {
    let mut stmt = conn
        .prepare(SELECT_CUSTOMERS)
        .context(FetchSnafu { table: "customer" })?;
    let rows = stmt
        .query_map([], |row| {
            Ok(CustomerRow {
                customer_id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                address: row.get(3)?,
            })
        })
        .context(FetchSnafu { table: "customer" })?
        .collect::<Result<Vec<_>, duckdb::Error>>()
        .context(FetchSnafu { table: "customer" })?;
    Ok(rows)
}

/// Read back every `inventory` row. `price` comes back as DOUBLE via an
/// explicit cast.
pub fn fetch_inventory(conn: &Connection) -> CatalogResult<Vec<InventoryRow>> {
    let mut stmt = conn
        .prepare(SELECT_INVENTORY)
        .context(FetchSnafu { table: "inventory" })?;
    let rows = stmt
        .query_map([], |row| {
            Ok(InventoryRow {
                product_id: row.get(0)?,
                product_name: row.get(1)?,
                quantity: row.get(2)?,
                price: row.get(3)?,
            })
        })
        .context(FetchSnafu { table: "inventory" })?
        .collect::<Result<Vec<_>, duckdb::Error>>()
        .context(FetchSnafu { table: "inventory" })?;
    Ok(rows)
}

fn quote_literal(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_are_escaped() {
        assert_eq!(quote_literal("plain"), "'plain'");
        assert_eq!(quote_literal("a'b"), "'a''b'");
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_identifier("my_ducklake"), "\"my_ducklake\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }
}
