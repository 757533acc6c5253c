pub mod audit_service;
pub mod auth_service;
pub mod commande_service;
pub mod facture_service;
pub mod notification_service;
pub mod paiement_service;
pub mod payment_method_service;
pub mod reclamation_service;
pub mod user_service;
