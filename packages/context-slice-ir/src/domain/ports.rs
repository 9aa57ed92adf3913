/*
 * Domain Ports - Interfaces for external dependencies
 *
 * HEXAGONAL ARCHITECTURE:
 * - Domain defines interfaces
 * - Infrastructure (or test code) implements them
 * - Dependency Inversion Principle
 */

use chrono::{DateTime, Utc};

/// Port: wall-clock access (driven port).
///
/// The Packager's `metadata.json` output carries both an RFC 3339 string and
/// a Unix-seconds integer derived from "now". Threading that through a port
/// (rather than calling `Utc::now()` directly in `packager.rs`) is what makes
/// the determinism tests in spec §8 possible: a fixed clock lets two pipeline
/// runs produce byte-identical `metadata.json` too, which the real system
/// clock could never guarantee.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed clock for tests that need reproducible timestamps.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
