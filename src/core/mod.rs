// Filter capability trait and the paginating engine built on it

pub mod engine;
pub mod traits;

// Re-export commonly used items
pub use engine::{Page, Paginator};
pub use traits::FilterSpec;
