//! Ordered route table.
//!
//! Routes are matched in registration order; the first one whose method and
//! template both match wins. There is no specificity ranking, so register
//! `/items/special` before `/items/{id}` if both should be reachable.

pub mod route;
pub mod table;
pub mod template;

pub use route::Route;
pub use table::{RouteMatch, RouteTable};
pub use template::PathTemplate;
