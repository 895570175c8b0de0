#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Request, StatusCode},
    routing::get,
};
use pagecrate::{
    ApiError, PageRequest, PaginatedResponse, PaginationConfig, PaginationState, Paginator,
    list_route,
};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, DbErr, Set};
use sea_orm_migration::prelude::*;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub mod athlete_entity;
pub mod province_entity;

use athlete_entity::{AthleteFilter, AthleteView};
use province_entity::ProvinceFilter;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    setup_test_app_with_config(db, PaginationConfig::default())
}

pub fn setup_test_app_with_config(db: DatabaseConnection, config: PaginationConfig) -> Router {
    Router::new()
        .route("/provinces", list_route::<ProvinceFilter, _>())
        .route("/athletes", list_route::<AthleteFilter, _>())
        .route("/provinces/{id}/athletes", get(athletes_by_province))
        .with_state(PaginationState::new(db, config))
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

/// GET `uri` and return status, headers and the parsed JSON body.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, HeaderMap, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header("host", "localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, headers, json)
}

/// Percent-encode `page[size]` / `page[number]` the way clients send them.
pub fn page_query(size: u64, number: u64) -> String {
    format!(
        "{}={size}&{}={number}",
        url_escape::encode_component("page[size]"),
        url_escape::encode_component("page[number]")
    )
}

pub fn ids(json: &Value) -> Vec<i64> {
    json["data"]
        .as_array()
        .expect("data should be an array")
        .iter()
        .map(|row| row["id"].as_i64().expect("row should have an id"))
        .collect()
}

pub async fn seed_provinces(db: &DatabaseConnection, provinces: &[(&str, &str)]) {
    for (name, code) in provinces {
        province_entity::ActiveModel {
            name: Set((*name).to_string()),
            code: Set((*code).to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert province");
    }
}

/// Seed `count` athletes: `Athlete 01`..., province `1 + i % 3`, age `18 + i % 15`,
/// every fourth one inactive.
pub async fn seed_athletes(db: &DatabaseConnection, count: i32) {
    for i in 1..=count {
        athlete_entity::ActiveModel {
            name: Set(format!("Athlete {i:02}")),
            province_id: Set(1 + i % 3),
            age: Set(18 + i % 15),
            is_active: Set(i % 4 != 0),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert athlete");
    }
}

pub async fn seed_athlete(db: &DatabaseConnection, name: &str, province_id: i32, age: i32) {
    athlete_entity::ActiveModel {
        name: Set(name.to_string()),
        province_id: Set(province_id),
        age: Set(age),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert athlete");
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateProvinceTable), Box::new(CreateAthleteTable)]
    }
}

pub struct CreateProvinceTable;

impl MigrationName for CreateProvinceTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_province_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateProvinceTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(Provinces::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Provinces::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Provinces::Name).string().not_null())
            .col(ColumnDef::new(Provinces::Code).string().not_null())
            .to_owned();

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Provinces::Table).to_owned())
            .await
    }
}

pub struct CreateAthleteTable;

impl MigrationName for CreateAthleteTable {
    fn name(&self) -> &'static str {
        "m20240101_000002_create_athlete_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateAthleteTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(Athletes::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Athletes::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Athletes::Name).string().not_null())
            .col(ColumnDef::new(Athletes::ProvinceId).integer().not_null())
            .col(ColumnDef::new(Athletes::Age).integer().not_null())
            .col(
                ColumnDef::new(Athletes::IsActive)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .to_owned();

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Athletes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Provinces {
    Table,
    Id,
    Name,
    Code,
}

#[derive(DeriveIden)]
enum Athletes {
    Table,
    Id,
    Name,
    ProvinceId,
    Age,
    IsActive,
}
