use std::collections::HashMap;

use async_trait::async_trait;
use pagecrate::{FilterSet, FilterSpec};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::province_entity;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "athletes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub province_id: i32,
    pub age: i32,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Default, Deserialize)]
pub struct AthleteFilter {
    pub id: Option<i32>,
    pub province_id: Option<i32>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub is_active: Option<bool>,
}

/// Athlete plus its province when `includes=Province` was asked for.
#[derive(Debug, Serialize, Deserialize)]
pub struct AthleteView {
    #[serde(flatten)]
    pub athlete: Model,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<province_entity::Model>,
}

impl From<Model> for AthleteView {
    fn from(athlete: Model) -> Self {
        Self {
            athlete,
            province: None,
        }
    }
}

#[async_trait]
impl FilterSpec for AthleteFilter {
    type Entity = Entity;
    type Record = AthleteView;
    const TABLE_NAME: &'static str = "athletes";

    fn search_fields() -> Vec<&'static str> {
        vec!["name"]
    }

    fn sortable_fields() -> Vec<&'static str> {
        vec!["id", "name", "age"]
    }

    fn allowed_includes() -> Vec<&'static str> {
        vec!["Province"]
    }

    fn apply_filters(&self, filters: FilterSet) -> FilterSet {
        filters
            .eq("id", self.id)
            .eq("province_id", self.province_id)
            .between("age", self.min_age, self.max_age)
            .eq("is_active", self.is_active)
    }

    async fn load_includes(
        db: &DatabaseConnection,
        models: Vec<Model>,
        includes: &[String],
    ) -> Result<Vec<AthleteView>, DbErr> {
        let mut views: Vec<AthleteView> = models.into_iter().map(AthleteView::from).collect();
        if !includes.iter().any(|i| i == "Province") {
            return Ok(views);
        }

        let ids: Vec<i32> = views.iter().map(|v| v.athlete.province_id).collect();
        let provinces: HashMap<i32, province_entity::Model> = province_entity::Entity::find()
            .filter(province_entity::Column::Id.is_in(ids))
            .all(db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        for view in &mut views {
            view.province = provinces.get(&view.athlete.province_id).cloned();
        }
        Ok(views)
    }
}
