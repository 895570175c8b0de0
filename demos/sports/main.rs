//! Sports federation API: paginated, filterable lists of provinces, sports,
//! events and athletes.
//!
//! ```bash
//! cargo run --example sports
//! RUST_LOG=pagecrate=debug cargo run --example sports
//! ```
//!
//! Then try:
//! - <http://localhost:3000/provinces?search=jawa>
//! - <http://localhost:3000/athletes?min_age=25&sort=age&order=desc&page[size]=5>
//! - <http://localhost:3000/athletes?includes=Province,Sport>
//! - <http://localhost:3000/athletes/detailed>
//! - <http://localhost:3000/provinces/1/athletes>
//! - <http://localhost:3000/events?start_year=2024>

use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use pagecrate::{
    ApiError, FilterSet, FilterSpec, PageRequest, PaginatedResponse, PaginationConfig,
    PaginationState, Paginator, list_route,
};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, Schema, Set, entity::prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

mod province {
    use sea_orm::entity::prelude::*;
    use serde::Serialize;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
    #[sea_orm(table_name = "provinces")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub code: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

mod sport {
    use sea_orm::entity::prelude::*;
    use serde::Serialize;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
    #[sea_orm(table_name = "sports")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub category: String,
        pub description: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

mod event {
    use sea_orm::entity::prelude::*;
    use serde::Serialize;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
    #[sea_orm(table_name = "events")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub description: String,
        /// ISO date, `YYYY-MM-DD`
        pub start_date: String,
        pub end_date: String,
        pub location: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

mod athlete {
    use sea_orm::entity::prelude::*;
    use serde::Serialize;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
    #[sea_orm(table_name = "athletes")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub province_id: i32,
        pub sport_id: i32,
        pub event_id: i32,
        pub age: i32,
        pub is_active: bool,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

#[derive(Debug, Default, Deserialize)]
struct ProvinceFilter {
    id: Option<i32>,
    name: Option<String>,
    code: Option<String>,
}

impl FilterSpec for ProvinceFilter {
    type Entity = province::Entity;
    type Record = province::Model;
    const TABLE_NAME: &'static str = "provinces";

    fn search_fields() -> Vec<&'static str> {
        vec!["name", "code"]
    }

    fn apply_filters(&self, filters: FilterSet) -> FilterSet {
        filters
            .eq("id", self.id)
            .contains("name", self.name.as_deref())
            .eq("code", self.code.clone())
    }
}

#[derive(Debug, Default, Deserialize)]
struct SportFilter {
    id: Option<i32>,
    name: Option<String>,
    category: Option<String>,
}

impl FilterSpec for SportFilter {
    type Entity = sport::Entity;
    type Record = sport::Model;
    const TABLE_NAME: &'static str = "sports";

    fn search_fields() -> Vec<&'static str> {
        vec!["name", "category", "description"]
    }

    fn default_sort() -> &'static str {
        "name asc"
    }

    fn apply_filters(&self, filters: FilterSet) -> FilterSet {
        filters
            .eq("id", self.id)
            .contains("name", self.name.as_deref())
            .eq("category", self.category.clone())
    }
}

#[derive(Debug, Default, Deserialize)]
struct EventFilter {
    id: Option<i32>,
    name: Option<String>,
    location: Option<String>,
    start_year: Option<u16>,
    start_date: Option<String>,
    end_date: Option<String>,
}

impl FilterSpec for EventFilter {
    type Entity = event::Entity;
    type Record = event::Model;
    const TABLE_NAME: &'static str = "events";

    fn search_fields() -> Vec<&'static str> {
        vec!["name", "description", "location"]
    }

    fn default_sort() -> &'static str {
        "start_date desc, id asc"
    }

    fn sortable_fields() -> Vec<&'static str> {
        vec!["id", "name", "start_date", "end_date", "location"]
    }

    fn apply_filters(&self, filters: FilterSet) -> FilterSet {
        filters
            .eq("id", self.id)
            .contains("name", self.name.as_deref())
            .contains("location", self.location.as_deref())
            .starts_with("start_date", self.start_year.map(|y| format!("{y:04}-")))
            .gte("start_date", self.start_date.clone())
            .lte("end_date", self.end_date.clone())
    }
}

#[derive(Debug, Default, Deserialize)]
struct AthleteFilter {
    id: Option<i32>,
    province_id: Option<i32>,
    sport_id: Option<i32>,
    event_id: Option<i32>,
    min_age: Option<i32>,
    max_age: Option<i32>,
    is_active: Option<bool>,
}

/// An athlete with whichever relations were asked for.
#[derive(Debug, Serialize)]
struct AthleteView {
    #[serde(flatten)]
    athlete: athlete::Model,
    #[serde(skip_serializing_if = "Option::is_none")]
    province: Option<province::Model>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sport: Option<sport::Model>,
    #[serde(skip_serializing_if = "Option::is_none")]
    event: Option<event::Model>,
}

impl From<athlete::Model> for AthleteView {
    fn from(athlete: athlete::Model) -> Self {
        Self {
            athlete,
            province: None,
            sport: None,
            event: None,
        }
    }
}

#[async_trait]
impl FilterSpec for AthleteFilter {
    type Entity = athlete::Entity;
    type Record = AthleteView;
    const TABLE_NAME: &'static str = "athletes";

    fn search_fields() -> Vec<&'static str> {
        vec!["name"]
    }

    fn allowed_includes() -> Vec<&'static str> {
        vec!["Province", "Sport", "Event"]
    }

    fn apply_filters(&self, filters: FilterSet) -> FilterSet {
        filters
            .eq("id", self.id)
            .eq("province_id", self.province_id)
            .eq("sport_id", self.sport_id)
            .eq("event_id", self.event_id)
            .between("age", self.min_age, self.max_age)
            .eq("is_active", self.is_active)
    }

    async fn load_includes(
        db: &DatabaseConnection,
        models: Vec<athlete::Model>,
        includes: &[String],
    ) -> Result<Vec<AthleteView>, DbErr> {
        let mut views: Vec<AthleteView> = models.into_iter().map(AthleteView::from).collect();
        let wants = |name: &str| includes.iter().any(|i| i == name);

        if wants("Province") {
            let ids: Vec<i32> = views.iter().map(|v| v.athlete.province_id).collect();
            let by_id: HashMap<i32, province::Model> = province::Entity::find()
                .filter(province::Column::Id.is_in(ids))
                .all(db)
                .await?
                .into_iter()
                .map(|p| (p.id, p))
                .collect();
            for view in &mut views {
                view.province = by_id.get(&view.athlete.province_id).cloned();
            }
        }

        if wants("Sport") {
            let ids: Vec<i32> = views.iter().map(|v| v.athlete.sport_id).collect();
            let by_id: HashMap<i32, sport::Model> = sport::Entity::find()
                .filter(sport::Column::Id.is_in(ids))
                .all(db)
                .await?
                .into_iter()
                .map(|s| (s.id, s))
                .collect();
            for view in &mut views {
                view.sport = by_id.get(&view.athlete.sport_id).cloned();
            }
        }

        if wants("Event") {
            let ids: Vec<i32> = views.iter().map(|v| v.athlete.event_id).collect();
            let by_id: HashMap<i32, event::Model> = event::Entity::find()
                .filter(event::Column::Id.is_in(ids))
                .all(db)
                .await?
                .into_iter()
                .map(|e| (e.id, e))
                .collect();
            for view in &mut views {
                view.event = by_id.get(&view.athlete.event_id).cloned();
            }
        }

        Ok(views)
    }
}

/// Athletes with every relation loaded, whatever the caller asked for.
async fn detailed_athletes(
    State(db): State<DatabaseConnection>,
    State(config): State<Arc<PaginationConfig>>,
    mut request: PageRequest<AthleteFilter>,
) -> Result<PaginatedResponse<AthleteView>, ApiError> {
    request.params.push_includes(["Province", "Sport", "Event"]);
    let page = Paginator::<AthleteFilter>::new(config)?
        .paginate(&db, &request)
        .await?;
    Ok(page.into_envelope("Detailed athletes retrieved successfully"))
}

async fn athletes_by_province(
    State(db): State<DatabaseConnection>,
    State(config): State<Arc<PaginationConfig>>,
    Path(province_id): Path<i32>,
    mut request: PageRequest<AthleteFilter>,
) -> Result<PaginatedResponse<AthleteView>, ApiError> {
    request.filter.province_id = Some(province_id);
    let page = Paginator::<AthleteFilter>::new(config)?
        .paginate(&db, &request)
        .await?;
    Ok(page.into_envelope("Athletes from province retrieved successfully"))
}

async fn athletes_by_sport(
    State(db): State<DatabaseConnection>,
    State(config): State<Arc<PaginationConfig>>,
    Path(sport_id): Path<i32>,
    mut request: PageRequest<AthleteFilter>,
) -> Result<PaginatedResponse<AthleteView>, ApiError> {
    request.filter.sport_id = Some(sport_id);
    let page = Paginator::<AthleteFilter>::new(config)?
        .paginate(&db, &request)
        .await?;
    Ok(page.into_envelope("Athletes from sport retrieved successfully"))
}

async fn athletes_by_event(
    State(db): State<DatabaseConnection>,
    State(config): State<Arc<PaginationConfig>>,
    Path(event_id): Path<i32>,
    mut request: PageRequest<AthleteFilter>,
) -> Result<PaginatedResponse<AthleteView>, ApiError> {
    request.filter.event_id = Some(event_id);
    let page = Paginator::<AthleteFilter>::new(config)?
        .paginate(&db, &request)
        .await?;
    Ok(page.into_envelope("Athletes from event retrieved successfully"))
}

fn router(state: PaginationState) -> Router {
    Router::new()
        .route("/provinces", list_route::<ProvinceFilter, _>())
        .route("/sports", list_route::<SportFilter, _>())
        .route("/events", list_route::<EventFilter, _>())
        .route("/athletes", list_route::<AthleteFilter, _>())
        .route("/athletes/detailed", get(detailed_athletes))
        .route("/provinces/{id}/athletes", get(athletes_by_province))
        .route("/sports/{id}/athletes", get(athletes_by_sport))
        .route("/events/{id}/athletes", get(athletes_by_event))
        .with_state(state)
}

async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut statements = [
        schema.create_table_from_entity(province::Entity),
        schema.create_table_from_entity(sport::Entity),
        schema.create_table_from_entity(event::Entity),
        schema.create_table_from_entity(athlete::Entity),
    ];
    for statement in &mut statements {
        statement.if_not_exists();
        db.execute(backend.build(&*statement)).await?;
    }
    Ok(())
}

async fn seed(db: &DatabaseConnection) -> Result<(), DbErr> {
    if province::Entity::find().count(db).await? > 0 {
        return Ok(());
    }
    tracing::info!("Seeding database");

    for (name, code) in [
        ("DKI Jakarta", "JKT"),
        ("Jawa Barat", "JBR"),
        ("Jawa Tengah", "JTG"),
        ("Jawa Timur", "JTM"),
        ("Bali", "BAL"),
        ("Sumatera Utara", "SUT"),
        ("Sumatera Barat", "SBR"),
    ] {
        province::ActiveModel {
            name: Set(name.to_string()),
            code: Set(code.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    for (name, category, description) in [
        ("Sepak Bola", "Team Sport", "Olahraga tim dengan bola"),
        ("Basket", "Team Sport", "Olahraga tim dengan keranjang"),
        ("Voli", "Team Sport", "Olahraga tim dengan net"),
        ("Badminton", "Individual Sport", "Olahraga individu dengan raket"),
        ("Renang", "Individual Sport", "Olahraga air individu"),
        ("Tenis", "Individual Sport", "Olahraga raket individu"),
        ("Atletik", "Individual Sport", "Lari, lempar, lompat"),
    ] {
        sport::ActiveModel {
            name: Set(name.to_string()),
            category: Set(category.to_string()),
            description: Set(description.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    for (name, description, start_date, end_date, location) in [
        ("PON XXI Papua 2024", "Pekan Olahraga Nasional XXI", "2024-10-15", "2024-10-30", "Papua"),
        ("SEA Games 2023", "Southeast Asian Games 2023", "2023-05-12", "2023-05-23", "Cambodia"),
        ("Asian Games 2022", "Asian Games Hangzhou 2022", "2022-09-10", "2022-09-25", "Hangzhou"),
        ("Pekan Olahraga Daerah 2024", "Kompetisi olahraga tingkat daerah", "2024-03-01", "2024-03-10", "Jakarta"),
    ] {
        event::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            start_date: Set(start_date.to_string()),
            end_date: Set(end_date.to_string()),
            location: Set(location.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    for (name, province_id, sport_id, event_id, age) in [
        ("Budi Santoso", 1, 1, 1, 25),
        ("Siti Nurhaliza", 1, 2, 1, 23),
        ("Ahmad Subandrio", 2, 1, 2, 27),
        ("Dewi Sartika", 2, 3, 2, 24),
        ("Rudi Tabuti", 3, 4, 3, 26),
        ("Maya Sari", 3, 5, 3, 22),
        ("Andi Lala", 4, 1, 4, 28),
        ("Rina Marlina", 4, 2, 4, 21),
        ("Agus Salim", 5, 3, 1, 29),
        ("Putri Indah", 5, 4, 2, 20),
        ("Joko Widodo", 6, 5, 3, 30),
        ("Sari Dewi", 6, 6, 4, 19),
        ("Bambang Pamungkas", 7, 1, 1, 32),
        ("Taufik Hidayat", 7, 4, 2, 33),
        ("Liliyana Natsir", 1, 4, 3, 31),
    ] {
        athlete::ActiveModel {
            name: Set(name.to_string()),
            province_id: Set(province_id),
            sport_id: Set(sport_id),
            event_id: Set(event_id),
            age: Set(age),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,pagecrate=debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    let db: DatabaseConnection = Database::connect(&database_url).await?;
    create_tables(&db).await?;
    seed(&db).await?;

    let config = PaginationConfig::default().with_max_page_size(100);
    let app = router(PaginationState::new(db, config));

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("Listening on http://0.0.0.0:3000");
    axum::serve(listener, app).await?;
    Ok(())
}
