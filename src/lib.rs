//! shmkit: fixed-capacity, address-independent container primitives.
//!
//! Every container in this crate stores its linkage as integer slot indices
//! rather than memory addresses, so the same byte image is valid when mapped
//! at different virtual addresses in different processes, or after a process
//! restart. Capacity is fixed at compile time; there is no heap allocation in
//! the containers themselves, no rehashing, and no internal locking (callers
//! bring their own segment and their own synchronization).

pub mod ds;
pub mod error;
pub mod map;
pub mod prelude;
pub mod set;
pub mod traits;
