//! Routing module
//!
//! Resolves requests to handlers:
//! - Route key normalization from path parameters
//! - Static, immutable route table with exact-match lookup
//! - Segment-based templates for gateway emulation and the `segment` strategy

pub mod key;
pub mod table;
pub mod template;

pub use key::{normalize, RouteKey};
pub use table::{RouteTable, RouteTableBuilder, RouteTableError};
pub use template::RouteTemplate;
