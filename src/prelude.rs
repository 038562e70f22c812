pub use crate::ds::{EqualRange, FixedHashTable, HashIter, ListIter, SlotIndex};
pub use crate::error::{InitError, InsertError, InvariantError};
pub use crate::map::ShmMap;
pub use crate::set::ShmSet;
pub use crate::traits::{KeyOf, Pair};
