pub mod gate;
pub mod response;

pub use gate::{request_view, route_gate_middleware};
pub use response::{apply_no_store, redirect_response, NO_STORE_CACHE_CONTROL};
