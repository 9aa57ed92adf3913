/*
 * Domain Layer - Pure business logic
 *
 * HEXAGONAL ARCHITECTURE:
 * - No external dependencies (no filesystem, no clock, no serde wire concerns)
 * - Only domain types and logic
 * - Testable without infrastructure
 */

pub mod models;
pub mod ports;

