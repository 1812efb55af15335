//! API Module
//!
//! Local JSON server through which external rendering code reads the page
//! managers' collections and drives lineup and live tracking.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
