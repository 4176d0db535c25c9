//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate router calls into typed product use-cases.
//! - Keep CLI callers decoupled from locators and records.

pub mod inventory_service;
