//! Global allocator.
//!
//! Runs allocate a fresh output buffer per transform; mimalloc keeps those
//! large short-lived allocations cheap.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;
