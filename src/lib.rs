//! Queue Format Converter - binding-to-topic event format conversion
//!
//! This crate receives sensor events from an inbound binding, re-encodes them
//! as JSON, XML or CSV, and republishes the result to a pub/sub topic.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
