//! Offset pagination and dynamic filtering for Axum + Sea-ORM list endpoints.
//!
//! A list endpoint declares one [`FilterSpec`] type: its typed query
//! parameters, the table's search fields, a default sort and the relations a
//! caller may include. [`PageRequest`] binds a request into that shape,
//! [`Paginator`] counts and fetches the page, and [`PaginatedResponse`] is
//! the JSON envelope sent back:
//!
//! ```json
//! {
//!   "code": 200,
//!   "message": "athletes retrieved successfully",
//!   "data": [ ... ],
//!   "pagination": {
//!     "meta": { "current_page": 2, "per_page": 10, "from": 11, "to": 20, "total": 35, "last_page": 4 },
//!     "links": { "first": "...", "last": "...", "next": "...", "prev": "..." }
//!   }
//! }
//! ```
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/athletes", list_route::<AthleteFilter, _>())
//!     .with_state(PaginationState::new(db, PaginationConfig::default()));
//! ```

pub mod config;
pub mod core;
pub mod errors;
pub mod filtering;
pub mod models;
pub mod pagination;
pub mod routes;

pub use config::PaginationConfig;
pub use core::{FilterSpec, Page, Paginator};
pub use errors::{ApiError, ConfigError, PaginationError};
pub use filtering::{Dialect, FilterSet, IncludeResolver, QueryBuilder, QueryPlan};
pub use models::{ListParams, PageRequest, PaginationRequest};
pub use pagination::{PageLinks, PageWindow, PaginatedResponse, PaginationResponse};
pub use routes::{PaginationState, list_handler, list_route};
