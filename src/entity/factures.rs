use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "factures")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Filled by `facture_numero_seq`; never set from application code.
    #[sea_orm(unique)]
    pub numero_facture: i64,
    #[sea_orm(column_type = "Double")]
    pub montant: f64,
    pub date_emission: DateTimeWithTimeZone,
    pub date_echeance: Option<DateTimeWithTimeZone>,
    pub status: String,
    pub document: Option<String>,
    pub commande_id: Uuid,
    pub client_id: Uuid,
    pub id_agent: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::commandes::Entity",
        from = "Column::CommandeId",
        to = "super::commandes::Column::Id"
    )]
    Commandes,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ClientId",
        to = "super::users::Column::Id"
    )]
    Client,
    #[sea_orm(has_one = "super::paiements::Entity")]
    Paiement,
}

impl Related<super::commandes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commandes.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::paiements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Paiement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
