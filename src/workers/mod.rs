pub mod session_eviction;

pub use session_eviction::session_eviction_worker;
