pub mod auth;
pub mod commandes;
pub mod de;
pub mod factures;
pub mod notifications;
pub mod paiements;
pub mod reclamations;
pub mod users;
