pub mod audit_logs;
pub mod commandes;
pub mod factures;
pub mod notifications;
pub mod paiements;
pub mod payment_methods;
pub mod produits;
pub mod reclamations;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use commandes::Entity as Commandes;
pub use factures::Entity as Factures;
pub use notifications::Entity as Notifications;
pub use paiements::Entity as Paiements;
pub use payment_methods::Entity as PaymentMethods;
pub use produits::Entity as Produits;
pub use reclamations::Entity as Reclamations;
pub use users::Entity as Users;
