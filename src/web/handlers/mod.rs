pub mod ai_handlers;
pub mod export_handlers;
pub mod review_handlers;
pub mod stats_handlers;

pub use ai_handlers::*;
pub use export_handlers::*;
pub use review_handlers::*;
pub use stats_handlers::*;
