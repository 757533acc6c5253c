use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
use logistique_api::{
    dto::{
        auth::{RegisterRequest, looks_like_email},
        commandes::{CommandeRequest, RejectRequest},
        reclamations::ReclamationRequest,
    },
    error::{AppError, PAYMENT_EXISTS},
};
use serde_json::{Value, json};

fn field_errors(err: AppError) -> std::collections::BTreeMap<String, String> {
    match err {
        AppError::Validation(errors) => errors,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

fn commande(produits: Value) -> CommandeRequest {
    serde_json::from_value(json!({
        "nom": "Déménagement bureau",
        "adresseDepart": "12 rue des Lilas, Lyon",
        "adresseDestination": "3 quai Perrache, Lyon",
        "valeurMarchandise": "1500",
        "produits": produits,
    }))
    .expect("commande body")
}

#[test]
fn order_without_products_is_rejected() {
    let errors = field_errors(commande(json!([])).validate().unwrap_err());
    assert_eq!(errors["produits"], "Au moins un produit est requis");
}

#[test]
fn numeric_fields_accept_form_strings() {
    let req = commande(json!([{
        "nom": "Carton",
        "tarifUnitaire": "12,50",
        "poids": "3.2",
        "largeur": 40,
        "longueur": "60",
        "hauteur": "40",
        "quantite": "2",
        "fragile": true
    }]));
    req.validate().expect("valid order");
    assert_eq!(req.valeur_marchandise, 1500.0);
    let produit = &req.produits[0];
    assert_eq!(produit.tarif_unitaire, 12.5);
    assert_eq!(produit.quantite, 2);
}

#[test]
fn garbage_numbers_fail_deserialization() {
    let res = serde_json::from_value::<CommandeRequest>(json!({
        "nom": "x",
        "valeurMarchandise": "beaucoup",
        "produits": []
    }));
    assert!(res.is_err());

    let res = serde_json::from_value::<CommandeRequest>(json!({
        "nom": "x",
        "produits": [{ "nom": "Carton", "quantite": "1.5" }]
    }));
    assert!(res.is_err());
}

#[test]
fn non_finite_values_are_refused() {
    for raw in ["NaN", "inf", "-infinity"] {
        let res = serde_json::from_value::<CommandeRequest>(json!({
            "nom": "x",
            "valeurMarchandise": raw,
            "produits": []
        }));
        assert!(res.is_err(), "{raw} accepted");
    }

    let mut req = commande(json!([{ "nom": "Carton", "quantite": 1 }]));
    req.valeur_marchandise = f64::INFINITY;
    let errors = field_errors(req.validate().unwrap_err());
    assert!(errors.contains_key("valeurMarchandise"));
}

#[test]
fn product_lines_are_checked_one_by_one() {
    let req = commande(json!([
        { "nom": "Carton", "quantite": 1 },
        { "nom": "", "quantite": 0, "poids": -1 }
    ]));
    let errors = field_errors(req.validate().unwrap_err());
    assert!(errors.contains_key("produits[1].nom"));
    assert!(errors.contains_key("produits[1].quantite"));
    assert!(errors.contains_key("produits[1].poids"));
    assert!(!errors.keys().any(|k| k.starts_with("produits[0]")));
}

#[test]
fn reject_requires_a_reason() {
    let missing = RejectRequest { raison: None };
    let errors = field_errors(missing.reason().unwrap_err());
    assert_eq!(errors["raison"], "La raison du rejet est requise");

    let blank = RejectRequest {
        raison: Some("   ".into()),
    };
    assert!(blank.reason().is_err());

    let given = RejectRequest {
        raison: Some("  Adresse hors zone ".into()),
    };
    assert_eq!(given.reason().unwrap(), "Adresse hors zone");
}

#[test]
fn register_reports_every_bad_field() {
    let req: RegisterRequest = serde_json::from_value(json!({
        "email": "pas-un-email",
        "password": "court"
    }))
    .unwrap();
    let errors = field_errors(req.validate().unwrap_err());
    for field in ["nom", "prenom", "email", "password"] {
        assert!(errors.contains_key(field), "missing error for {field}");
    }

    assert!(looks_like_email("jeanne@exemple.fr"));
    assert!(!looks_like_email("jeanne@exemple"));
    assert!(!looks_like_email("@exemple.fr"));
}

#[test]
fn reclamation_needs_subject_and_description() {
    let req: ReclamationRequest = serde_json::from_value(json!({ "sujet": "Colis abîmé" })).unwrap();
    let errors = field_errors(req.validate().unwrap_err());
    assert!(errors.contains_key("description"));
    assert!(!errors.contains_key("sujet"));
}

#[tokio::test]
async fn validation_errors_render_as_field_map() -> anyhow::Result<()> {
    let response = AppError::field("raison", "La raison du rejet est requise").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await?)?;
    assert_eq!(body["error"], "Données invalides");
    assert_eq!(body["errors"]["raison"], "La raison du rejet est requise");
    Ok(())
}

#[tokio::test]
async fn plain_errors_carry_only_a_message() -> anyhow::Result<()> {
    let response = AppError::BadRequest(PAYMENT_EXISTS.into()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await?)?;
    assert_eq!(body, json!({ "error": PAYMENT_EXISTS }));

    let response = AppError::forbidden().into_response();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    Ok(())
}
