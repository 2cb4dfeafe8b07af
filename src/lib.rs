//! Examdesk - Self-Service Exam Session Booking
//!
//! This crate implements slot-based booking of proctored exam sessions
//! across two calendars that share the same physical capacity.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
