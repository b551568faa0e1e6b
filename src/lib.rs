//! Provisioning glue for a DuckLake demo deployment.
//!
//! This crate performs two sequential steps, each delegating to an external
//! service:
//!
//! 1. Ensure the object-storage bucket backing the catalog exists, together
//!    with a `data/` prefix marker inside it (`storage` module).
//! 2. Open an in-memory DuckDB session, load the DuckLake extension, attach
//!    a catalog whose data path points at the bucket, and seed two sample
//!    tables (`catalog` module).
//!
//! The bucket step runs first; when it fails the catalog is never touched.
//! Configuration is passed explicitly (`config` module) rather than looked
//! up ambiently, and every failure surfaces as one of a small closed set of
//! error kinds (`error` module).

pub mod catalog;
pub mod config;
pub mod error;
pub mod storage;
pub mod tables;
