//! Station alias server.
//!
//! Lets an operator rename OCPP charging stations at the edge: a station is
//! identified by (pool code, station name) and may be given an alias that is
//! reported instead of its original name.

pub mod alias;
pub mod auth;
pub mod config;
pub mod domain;
pub mod store;
pub mod web;
