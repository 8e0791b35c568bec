mod common;
mod record;

pub use common::{common_routes, common_routes_with_ready};
pub use record::record_routes;
