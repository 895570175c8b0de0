use pagecrate::{FilterSet, FilterSpec};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
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

#[derive(Debug, Default, Deserialize)]
pub struct ProvinceFilter {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub code: Option<String>,
}

impl FilterSpec for ProvinceFilter {
    type Entity = Entity;
    type Record = Model;
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
