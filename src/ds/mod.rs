pub mod diag;
pub mod fixed_table;
pub mod iter;
pub mod slot;

pub use fixed_table::FixedHashTable;
pub use iter::{EqualRange, HashIter, ListIter};
pub use slot::SlotIndex;
