//! Service-worker cache strategy engine
//!
//! API requests go to the network only, navigations are network-first with
//! an offline page, everything else is cache-first.

pub use story_sw::*;
