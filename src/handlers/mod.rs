// handlers - endpoints the gate service answers itself
//
// Pages are not handled here: they come from the frontend bundle mounted as
// the router fallback (see crate::server).

pub mod health;

pub use health::health;
