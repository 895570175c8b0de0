use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};
use serde::{Serialize, de::DeserializeOwned};

use crate::filtering::FilterSet;

/// A list endpoint's filter: its typed query parameters plus the metadata the
/// query builder needs.
///
/// The struct itself is deserialized from the request's query string, so
/// every filter field should be an `Option<T>`; `None` means "not specified"
/// and adds no predicate, while `Some(0)` or `Some(false)` are real filters.
///
/// ```rust,ignore
/// #[derive(Deserialize, Default)]
/// pub struct AthleteFilter {
///     pub province_id: Option<i32>,
///     pub sport_id: Option<i32>,
///     pub min_age: Option<i32>,
///     pub max_age: Option<i32>,
/// }
///
/// impl FilterSpec for AthleteFilter {
///     type Entity = athlete::Entity;
///     type Record = athlete::Model;
///     const TABLE_NAME: &'static str = "athletes";
///
///     fn search_fields() -> Vec<&'static str> {
///         vec!["name"]
///     }
///
///     fn apply_filters(&self, filters: FilterSet) -> FilterSet {
///         filters
///             .eq("province_id", self.province_id)
///             .eq("sport_id", self.sport_id)
///             .between("age", self.min_age, self.max_age)
///     }
/// }
/// ```
#[async_trait]
pub trait FilterSpec: DeserializeOwned + Send + Sync + 'static {
    type Entity: EntityTrait<Model: Sync>;
    /// What the endpoint returns for each row.
    type Record: From<<Self::Entity as EntityTrait>::Model> + Serialize + Send + Sync;

    const TABLE_NAME: &'static str;

    /// Columns free-text search runs against, in order. `table.column` is allowed.
    #[must_use]
    fn search_fields() -> Vec<&'static str> {
        Vec::new()
    }

    /// Trusted ORDER BY used when the caller's sort is absent or invalid,
    /// e.g. `"start_date desc, id asc"`.
    #[must_use]
    fn default_sort() -> &'static str {
        "id asc"
    }

    /// Relation paths a caller may ask to eager-load. Nesting is never implied.
    #[must_use]
    fn allowed_includes() -> Vec<&'static str> {
        Vec::new()
    }

    /// Restrict caller sorting to these columns. Empty allows every column of `Entity`.
    #[must_use]
    fn sortable_fields() -> Vec<&'static str> {
        Vec::new()
    }

    /// Add this filter's predicates for the fields that were specified.
    fn apply_filters(&self, filters: FilterSet) -> FilterSet;

    /// Message placed in the response envelope.
    #[must_use]
    fn list_message() -> String {
        format!("{} retrieved successfully", Self::TABLE_NAME)
    }

    /// Turn the fetched page into records, eager-loading `includes`.
    ///
    /// `includes` has already been whitelisted against
    /// [`allowed_includes`](Self::allowed_includes). The default ignores it.
    async fn load_includes(
        db: &DatabaseConnection,
        models: Vec<<Self::Entity as EntityTrait>::Model>,
        includes: &[String],
    ) -> Result<Vec<Self::Record>, DbErr> {
        let _ = (db, includes);
        Ok(models.into_iter().map(Self::Record::from).collect())
    }
}
