use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "commandes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub nom: String,
    pub adresse_depart: Option<String>,
    pub adresse_destination: Option<String>,
    pub adresse_actuel: Option<String>,
    pub nom_destinataire: Option<String>,
    pub telephone_destinataire: Option<String>,
    pub email_destinataire: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub valeur_marchandise: f64,
    pub type_transport: Option<String>,
    pub statut: String,
    pub raison_rejet: Option<String>,
    pub client_id: Uuid,
    pub assistant_id: Option<Uuid>,
    pub agent_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ClientId",
        to = "super::users::Column::Id"
    )]
    Client,
    #[sea_orm(has_many = "super::produits::Entity")]
    Produits,
    #[sea_orm(has_many = "super::factures::Entity")]
    Factures,
}

impl Related<super::produits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Produits.def()
    }
}

impl Related<super::factures::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Factures.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
