use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub nom: String,
    pub prenom: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub telephone: Option<String>,
    pub role: String,
    pub actif: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::factures::Entity")]
    Factures,
    #[sea_orm(has_many = "super::paiements::Entity")]
    Paiements,
    #[sea_orm(has_many = "super::reclamations::Entity")]
    Reclamations,
    #[sea_orm(has_many = "super::payment_methods::Entity")]
    PaymentMethods,
    #[sea_orm(has_many = "super::audit_logs::Entity")]
    AuditLogs,
}

impl Related<super::factures::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Factures.def()
    }
}

impl Related<super::paiements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Paiements.def()
    }
}

impl Related<super::reclamations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reclamations.def()
    }
}

impl Related<super::payment_methods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentMethods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
