//! Page arithmetic and the response envelope.
//!
//! [`PageWindow`] turns `(size, number, total)` into offset/limit and the
//! from/to bounds. [`PageLinks`] rebuilds absolute first/last/next/prev URLs
//! from the inbound request, and [`PaginatedResponse`] is the JSON body sent
//! back to the client.

pub mod links;
pub mod response;
pub mod window;

pub use links::PageLinks;
pub use response::{
    MetaResponse, PaginatedResponse, PaginationLinks, PaginationResponse, content_range,
};
pub use window::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, PageWindow, last_page};
