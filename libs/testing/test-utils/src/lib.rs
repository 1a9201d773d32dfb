//! Test fixtures shared by the domain crates.
//!
//! - [`TestDatabase`] (feature `postgres`): a throwaway PostgreSQL container
//!   with every workspace migration applied
//! - [`TestDataBuilder`]: per-test unique names, so tests sharing a database
//!   never collide on the `users.username` unique key
//! - [`assertions`]: assertion helpers with context in the panic message
//!
//! ```rust,no_run
//! use test_utils::{TestDataBuilder, TestDatabase};
//!
//! #[tokio::test]
//! async fn lists_only_my_tasks() {
//!     let db = TestDatabase::new().await;
//!     let data = TestDataBuilder::from_test_name("lists_only_my_tasks");
//!
//!     let owner = db.create_test_user(&data.username("owner")).await;
//!     let title = data.title("groceries");
//! }
//! ```

use std::hash::{DefaultHasher, Hash, Hasher};

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Deterministic names derived from a seed.
#[derive(Debug, Clone, Copy)]
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the test's own name; the same test always gets the same data.
    pub fn from_test_name(name: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// At most 3 + 16 hex characters past `role`, well under the 64 limit.
    pub fn username(&self, role: &str) -> String {
        format!("{}-{:x}", role, self.seed)
    }

    pub fn title(&self, label: &str) -> String {
        format!("task {} #{:x}", label, self.seed)
    }
}

pub mod assertions {
    use uuid::Uuid;

    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected UUID {}, got {}",
            context, expected, actual
        );
    }

    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}
