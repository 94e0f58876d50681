//! # Farm Stand
//!
//! `farmstand` is the catalog service for an online farm-goods shop. Operators
//! manage **Farm** and **Product** records through server-rendered HTML forms;
//! every mutation runs through one validation and error-normalization pipeline
//! so the client always receives a curated status code and message.
//!
//! ## Ownership & cascade
//!
//! A farm owns its products by reference (`farms.product_ids`). Deleting a
//! farm issues a single best-effort bulk delete of the referenced products.
//! The two steps share no transaction; a failed cascade is logged and the farm
//! deletion stands.

pub mod cli;
pub mod farmstand;
