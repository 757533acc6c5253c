use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "produits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub commande_id: Uuid,
    pub nom: String,
    pub categorie: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub tarif_unitaire: f64,
    #[sea_orm(column_type = "Double")]
    pub poids: f64,
    #[sea_orm(column_type = "Double")]
    pub largeur: f64,
    #[sea_orm(column_type = "Double")]
    pub longueur: f64,
    #[sea_orm(column_type = "Double")]
    pub hauteur: f64,
    pub quantite: i32,
    pub type_conditionnement: Option<String>,
    pub fragile: bool,
    pub position: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::commandes::Entity",
        from = "Column::CommandeId",
        to = "super::commandes::Column::Id",
        on_delete = "Cascade"
    )]
    Commandes,
}

impl Related<super::commandes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commandes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
