use sea_orm::entity::prelude::*;

/// Restaurant metadata. Only the first row is ever read.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub name: String,
    pub logo_url: Option<String>,
    pub address: Option<String>,
    pub working_hours: Option<String>,
    pub about_image_url: Option<String>,
    pub about_description: Option<String>,
    pub terms_and_conditions: Option<String>,
    pub facebook_url: Option<String>,
    pub whatsapp_number: Option<String>,
    pub phone_number: Option<String>,
    pub second_phone_number: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
