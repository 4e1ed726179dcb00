// API module entry
// Declarative route list for the representative endpoints

mod handlers;
mod types;

use crate::routing::{RouteTable, RouteTableError};

pub use handlers::{current_time, echo, health, hello, slug, user};

/// Build the route table
///
/// Called once per process; the table is immutable afterwards.
pub fn route_table() -> Result<RouteTable, RouteTableError> {
    RouteTable::builder()
        .route("GET", "/health", health)
        .route("GET", "/api/hello", hello)
        .route("POST", "/api/echo", echo)
        .route("GET", "/api/time", current_time)
        .route("GET", "/api/users/:id", user)
        .route("GET", "/api/utils/slug", slug)
        .build()
}
