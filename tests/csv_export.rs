use chrono::{TimeZone, Utc};
use logistique_api::{
    models::User,
    services::user_service::{CSV_HEADER, users_to_csv},
};
use uuid::Uuid;

fn user(role: &str, actif: bool, telephone: Option<&str>) -> User {
    User {
        id: Uuid::new_v4(),
        nom: "Durand".into(),
        prenom: "Camille".into(),
        email: format!("{role}@exemple.fr"),
        telephone: telephone.map(str::to_string),
        role: role.into(),
        actif,
        created_at: Utc.with_ymd_and_hms(2024, 3, 7, 9, 30, 0).unwrap(),
    }
}

#[test]
fn header_comes_first() -> anyhow::Result<()> {
    let out = users_to_csv(&[])?;
    let mut reader = csv::Reader::from_reader(out.as_bytes());
    let headers = reader.headers()?.clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), CSV_HEADER.to_vec());
    assert_eq!(reader.records().count(), 0);
    Ok(())
}

#[test]
fn rows_use_labels_and_french_dates() -> anyhow::Result<()> {
    let admin = user("admin", true, Some("06 12 34 56 78"));
    let client = user("client", false, None);
    let out = users_to_csv(&[admin.clone(), client])?;

    let mut reader = csv::Reader::from_reader(out.as_bytes());
    let rows = reader
        .records()
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(rows.len(), 2);

    assert_eq!(&rows[0][0], admin.id.to_string());
    assert_eq!(&rows[0][1], "Administrateur");
    assert_eq!(&rows[0][2], "Camille");
    assert_eq!(&rows[0][5], "06 12 34 56 78");
    assert_eq!(&rows[0][6], "07/03/2024");
    assert_eq!(&rows[0][7], "Actif");

    assert_eq!(&rows[1][1], "Client");
    assert_eq!(&rows[1][5], "");
    assert_eq!(&rows[1][7], "Inactif");
    Ok(())
}

#[test]
fn fields_with_separators_are_quoted() -> anyhow::Result<()> {
    let mut odd = user("agent", true, None);
    odd.nom = "Dupont, \"le grand\"".into();
    let out = users_to_csv(&[odd])?;
    assert!(out.contains("\"Dupont, \"\"le grand\"\"\""));
    Ok(())
}
