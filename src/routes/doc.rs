use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{
            ChangePasswordRequest, LoginRequest, LoginResponse, ProfileUpdateRequest,
            RegisterRequest,
        },
        commandes::{
            AdresseRequest, AssignAgentRequest, CommandeList, CommandeRequest, CommandeWithProduits,
            ProduitInput, RejectRequest, UpdateStatutRequest,
        },
        factures::{CreateFactureRequest, FactureList, FactureWithPaiement},
        notifications::{NotificationList, UnreadCount},
        paiements::{
            CreatePaiementRequest, PaiementList, PaiementWithFacture, PaymentMethodList,
            PaymentMethodRequest, UpdatePaiementRequest,
        },
        reclamations::{ReclamationList, ReclamationRequest, RespondRequest},
        users::{
            AdminStats, AuditLogList, CountByLabel, CreateUserRequest, UpdateUserRequest, UserList,
            UserStatusRequest,
        },
    },
    middleware::auth::AUTH_COOKIE,
    models::{
        AuditLog, Commande, Facture, Notification, Paiement, PaymentMethod, Produit, Reclamation,
        User,
    },
    response::{Affected, Meta},
    routes::{admin, agent, assistant, auth, client, health, notifications},
    workflow::{OrderStatus, PaymentStatus, Role},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "cookie_auth",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(AUTH_COOKIE))),
        );
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness,
        auth::register,
        auth::login,
        auth::logout,
        auth::me,
        auth::profile,
        auth::password,
        client::list_commandes,
        client::create_commande,
        client::get_commande,
        client::update_commande,
        client::cancel_commande,
        client::list_factures,
        client::get_facture,
        client::list_paiements,
        client::create_paiement,
        client::list_payment_methods,
        client::create_payment_method,
        client::delete_payment_method,
        client::list_reclamations,
        client::create_reclamation,
        client::get_reclamation,
        client::update_reclamation,
        client::close_reclamation,
        assistant::list_commandes,
        assistant::get_commande,
        assistant::accept_commande,
        assistant::reject_commande,
        assistant::cancel_commande,
        assistant::update_statut,
        assistant::assign_agent,
        assistant::update_adresse,
        assistant::archive_commande,
        assistant::list_factures,
        assistant::create_facture,
        assistant::get_facture,
        assistant::send_facture,
        assistant::overdue_facture,
        assistant::list_paiements,
        assistant::decide_paiement,
        assistant::list_reclamations,
        assistant::get_reclamation,
        assistant::take_reclamation,
        assistant::respond_reclamation,
        assistant::close_reclamation,
        agent::list_commandes,
        agent::get_commande,
        agent::accept_commande,
        agent::reject_commande,
        agent::cancel_commande,
        agent::update_statut,
        agent::update_adresse,
        agent::list_factures,
        agent::create_facture,
        agent::get_facture,
        agent::send_facture,
        agent::overdue_facture,
        admin::list_users,
        admin::create_user,
        admin::export_users,
        admin::get_user,
        admin::update_user,
        admin::set_user_status,
        admin::delete_user,
        admin::stats,
        admin::list_audit_logs,
        admin::list_commandes,
        admin::get_commande,
        admin::archive_commande,
        notifications::list_notifications,
        notifications::unread_count,
        notifications::mark_read,
        notifications::mark_all_read
    ),
    components(
        schemas(
            Role,
            OrderStatus,
            PaymentStatus,
            User,
            Commande,
            Produit,
            Facture,
            Paiement,
            PaymentMethod,
            Reclamation,
            Notification,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            ProfileUpdateRequest,
            ChangePasswordRequest,
            ProduitInput,
            CommandeRequest,
            RejectRequest,
            UpdateStatutRequest,
            AssignAgentRequest,
            AdresseRequest,
            CommandeWithProduits,
            CommandeList,
            CreateFactureRequest,
            FactureWithPaiement,
            FactureList,
            CreatePaiementRequest,
            UpdatePaiementRequest,
            PaiementWithFacture,
            PaiementList,
            PaymentMethodRequest,
            PaymentMethodList,
            ReclamationRequest,
            RespondRequest,
            ReclamationList,
            NotificationList,
            UnreadCount,
            CreateUserRequest,
            UpdateUserRequest,
            UserStatusRequest,
            UserList,
            CountByLabel,
            AdminStats,
            AuditLog,
            AuditLogList,
            Affected,
            Meta,
            health::HealthData,
            health::ReadinessData
        )
    ),
    security(
        ("cookie_auth" = []),
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness"),
        (name = "Auth", description = "Sessions and own profile"),
        (name = "Client", description = "Client space: orders, invoices, payments, tickets"),
        (name = "Assistant", description = "Back office: order handling, invoicing, payment checks, tickets"),
        (name = "Agent", description = "Field agents: order handling and invoicing"),
        (name = "Admin", description = "Account administration and statistics"),
        (name = "Notifications", description = "Per-account inbox"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
