//! Shared test utilities for the ToDo crates
//!
//! - `InMemoryTodoStore`: a `TodoStore` kept in process memory (always available)
//! - `TestDatabase`: PostgreSQL container with the embedded migrations applied (feature: "postgres")
//! - `TestDataBuilder`: deterministic test data generation (always available)
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_todo::TodoService;
//! use test_utils::{InMemoryTodoStore, TestDataBuilder};
//!
//! # async fn example() {
//! let store = InMemoryTodoStore::new();
//! let service = TodoService::new(store.clone());
//! let builder = TestDataBuilder::from_test_name("my_test");
//!
//! let todo = builder.todo("main");
//! # }
//! ```

mod memory;

#[cfg(feature = "postgres")]
mod postgres;

pub use memory::{InMemoryConnection, InMemoryTodoStore};

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

use chrono::{DateTime, Utc};
use prost_types::Timestamp;
use rpc::todo::v1::ToDo;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by deriving every value from a seed.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_todo");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a unique title, e.g. `"test-todo-12345-main"`
    pub fn title(&self, suffix: &str) -> String {
        format!("test-todo-{}-{}", self.seed, suffix)
    }

    /// A reminder between 2000 and ~2063, whole microseconds so it survives PostgreSQL
    pub fn reminder(&self) -> DateTime<Utc> {
        let seconds = 946_684_800 + (self.seed % 2_000_000_000) as i64;
        let micros = (self.seed % 1_000_000) as u32;
        DateTime::from_timestamp(seconds, micros * 1_000).unwrap_or_default()
    }

    /// Same instant as `reminder`, in wire form
    pub fn reminder_timestamp(&self) -> Timestamp {
        let reminder = self.reminder();
        Timestamp {
            seconds: reminder.timestamp(),
            nanos: reminder.timestamp_subsec_nanos() as i32,
        }
    }

    /// A task ready to be sent in a Create request (id left at 0)
    pub fn todo(&self, suffix: &str) -> ToDo {
        ToDo {
            id: 0,
            title: self.title(suffix),
            description: format!("description for {suffix}"),
            reminder: Some(self.reminder_timestamp()),
        }
    }
}

/// Test assertion helpers
pub mod assertions {
    use rpc::todo::v1::ToDo;

    /// Assert that two tasks carry the same content, ignoring ids
    pub fn assert_same_content(actual: &ToDo, expected: &ToDo, context: &str) {
        assert_eq!(actual.title, expected.title, "{context}: title differs");
        assert_eq!(
            actual.description, expected.description,
            "{context}: description differs"
        );
        assert_eq!(actual.reminder, expected.reminder, "{context}: reminder differs");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.todo("a"), builder2.todo("a"));
        assert_eq!(builder1.title("test"), builder2.title("test"));
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.title("x"), builder2.title("x"));
    }

    #[test]
    fn test_reminder_has_microsecond_precision() {
        let builder = TestDataBuilder::from_test_name("precision");
        assert_eq!(builder.reminder().timestamp_subsec_nanos() % 1_000, 0);
        assert_eq!(
            builder.reminder_timestamp().seconds,
            builder.reminder().timestamp()
        );
    }
}
