pub mod error;
pub mod fs;
pub mod mem;
pub mod types;

pub use error::{Error, Result};
pub use fs::FileStore;
pub use mem::MemStore;
pub use types::{
    BladeDescriptor, BladeKind, DateFilter, EventSample, FieldValue, RunDescriptor,
};

/// Read-side boundary to a results store produced by the load-test
/// harness. Implementations must return blades and events in a
/// deterministic order.
pub trait EventStore {
    fn list_runs(&self) -> Result<Vec<RunDescriptor>>;

    fn blades(&self, run: &str) -> Result<Vec<BladeDescriptor>>;

    /// Field labels of one event type; the first label is always the
    /// timestamp field.
    fn event_field_labels(&self, run: &str, blade: &str, event: &str) -> Result<Vec<String>>;

    /// Events of one type for one blade, date-filtered, then paged by
    /// `offset`/`limit` (pass `usize::MAX` for an unbounded read).
    fn events(
        &self,
        run: &str,
        blade: &str,
        event: &str,
        filter: &DateFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<EventSample>>;
}
