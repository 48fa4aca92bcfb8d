//! # knxbell-domain
//!
//! Pure domain model for the knxbell doorbell bridge.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **group addresses** (the KNX datapoints a doorbell listens on)
//! - Define **doorbell accessories** and their binary signals
//! - Define **press kinds** and the live **contact state**
//! - Define **history samples** and the **statistics** derived from them
//! - Declare the custom **characteristic descriptors** as data
//! - Define **accessory events** (press and contact records)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod accessory;
pub mod characteristic;
pub mod contact;
pub mod event;
pub mod group_address;
pub mod history;
pub mod press;
pub mod statistics;
