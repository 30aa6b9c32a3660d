//! Repository behaviour against a live PostgreSQL.
//!
//! Each test gets a fresh database with the migrations applied. Run with
//! `DATABASE_URL` pointing at a server the user may create databases on:
//! `cargo test -p storage -- --ignored`.

use rust_decimal::Decimal;
use sqlx::PgPool;
use storage::{
    dto::athlete::{CreateAthleteRequest, ListAthletesQuery, ReferenceName, UpdateAthleteRequest},
    error::{ReferenceKind, StorageError, UniqueKey},
    models::{Athlete, Sex},
    repository::{
        AthleteStore, ReferenceLookup, athlete::AthleteRepository, reference::ReferenceRepository,
    },
    services::athlete::new_athlete,
};
use uuid::Uuid;

async fn seed_references(pool: &PgPool) {
    sqlx::query("INSERT INTO categories (name) VALUES ('Iniciante')")
        .execute(pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO training_centers (name, address, owner) VALUES ('CT Centro', 'Rua A, 1', 'Marcos')",
    )
    .execute(pool)
    .await
    .unwrap();
}

async fn athlete(pool: &PgPool, name: &str, cpf: &str) -> Athlete {
    let references = ReferenceRepository::new(pool.clone());
    let category = references.find_category_by_name("Iniciante").await.unwrap();
    let training_center = references
        .find_training_center_by_name("CT Centro")
        .await
        .unwrap();

    let request = CreateAthleteRequest {
        name: name.to_string(),
        cpf: cpf.to_string(),
        age: 27,
        weight: Decimal::new(615, 1),
        height: Decimal::new(168, 2),
        sex: Sex::F,
        category: ReferenceName::Plain("Iniciante".to_string()),
        training_center: ReferenceName::Plain("CT Centro".to_string()),
    };
    new_athlete(&request, &category, &training_center)
}

async fn athlete_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM athletes")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_insert_joins_reference_names(pool: PgPool) {
    seed_references(&pool).await;
    let repo = AthleteRepository::new(pool.clone());
    let new = athlete(&pool, "Ana Souza", "11122233344").await;

    let record = repo.insert(&new).await.unwrap();

    assert_eq!(record.athlete.athlete_id, new.athlete_id);
    assert_eq!(record.athlete.cpf, new.cpf);
    assert_eq!(record.athlete.weight, new.weight);
    assert_eq!(record.category_name, "Iniciante");
    assert_eq!(record.training_center_name, "CT Centro");
    assert_eq!(repo.find_by_public_id(new.athlete_id).await.unwrap(), record);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_cpf_maps_to_cpf_key_and_keeps_one_row(pool: PgPool) {
    seed_references(&pool).await;
    let repo = AthleteRepository::new(pool.clone());
    repo.insert(&athlete(&pool, "Ana Souza", "11122233344").await)
        .await
        .unwrap();

    let err = repo
        .insert(&athlete(&pool, "Bia Lima", "11122233344").await)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StorageError::DuplicateKey { key: UniqueKey::Cpf, ref value } if value == "11122233344"
    ));
    assert_eq!(athlete_count(&pool).await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_reference_miss_names_entity(pool: PgPool) {
    seed_references(&pool).await;
    let references = ReferenceRepository::new(pool);

    let err = references
        .find_training_center_by_name("CT Norte")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StorageError::ReferenceNotFound { kind: ReferenceKind::TrainingCenter, ref name } if name == "CT Norte"
    ));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_list_filters_escape_wildcards_and_paginate(pool: PgPool) {
    seed_references(&pool).await;
    let repo = AthleteRepository::new(pool.clone());
    for (name, cpf) in [
        ("Ana Souza", "11111111111"),
        ("Mariana Lima", "22222222222"),
        ("Bruno Alves", "33333333333"),
        ("Ana 100%", "44444444444"),
    ] {
        repo.insert(&athlete(&pool, name, cpf).await).await.unwrap();
    }

    let by_name = ListAthletesQuery {
        name: Some("ANA".to_string()),
        ..Default::default()
    };
    let (found, total) = repo.list(&by_name).await.unwrap();
    assert_eq!(total, 3);
    let names: Vec<&str> = found.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Ana 100%", "Ana Souza", "Mariana Lima"]);

    let literal_percent = ListAthletesQuery {
        name: Some("%".to_string()),
        ..Default::default()
    };
    let (found, total) = repo.list(&literal_percent).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(found[0].name, "Ana 100%");

    let both = ListAthletesQuery {
        name: Some("ana".to_string()),
        cpf: Some("22222222222".to_string()),
        ..Default::default()
    };
    let (found, total) = repo.list(&both).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(found[0].category_name, "Iniciante");

    let second_page = ListAthletesQuery {
        page: 2,
        page_size: 3,
        ..Default::default()
    };
    let (found, total) = repo.list(&second_page).await.unwrap();
    assert_eq!(total, 4);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Mariana Lima");

    let far_page = ListAthletesQuery {
        page: 50_000_000,
        page_size: 100,
        ..Default::default()
    };
    let (found, total) = repo.list(&far_page).await.unwrap();
    assert!(found.is_empty());
    assert_eq!(total, 4);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_updates_of_different_fields_both_persist(pool: PgPool) {
    seed_references(&pool).await;
    let repo = AthleteRepository::new(pool.clone());
    let new = athlete(&pool, "Ana Souza", "11122233344").await;
    let inserted = repo.insert(&new).await.unwrap();

    let rename = UpdateAthleteRequest {
        name: Some("Bia".to_string()),
        ..Default::default()
    };
    let birthday = UpdateAthleteRequest {
        age: Some(40),
        ..Default::default()
    };
    repo.update(new.athlete_id, &rename).await.unwrap();
    let record = repo.update(new.athlete_id, &birthday).await.unwrap();

    assert_eq!(record.athlete.name, "Bia");
    assert_eq!(record.athlete.age, 40);
    assert_eq!(record.athlete.cpf, new.cpf);
    assert_eq!(record.athlete.weight, new.weight);
    assert_eq!(record.athlete.sex, new.sex);
    assert_eq!(record.athlete.created_at, inserted.athlete.created_at);
    assert_eq!(record.training_center_name, "CT Centro");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_update_to_taken_cpf_maps_to_cpf_key(pool: PgPool) {
    seed_references(&pool).await;
    let repo = AthleteRepository::new(pool.clone());
    repo.insert(&athlete(&pool, "Ana Souza", "11111111111").await)
        .await
        .unwrap();
    let second = athlete(&pool, "Bruno Alves", "22222222222").await;
    repo.insert(&second).await.unwrap();

    let changes = UpdateAthleteRequest {
        cpf: Some("11111111111".to_string()),
        ..Default::default()
    };
    let err = repo.update(second.athlete_id, &changes).await.unwrap_err();

    assert!(matches!(
        err,
        StorageError::DuplicateKey { key: UniqueKey::Cpf, ref value } if value == "11111111111"
    ));
    let stored = repo.find_by_public_id(second.athlete_id).await.unwrap();
    assert_eq!(stored.athlete.cpf, "22222222222");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_unknown_id_is_not_found(pool: PgPool) {
    seed_references(&pool).await;
    let repo = AthleteRepository::new(pool.clone());
    repo.insert(&athlete(&pool, "Ana Souza", "11122233344").await)
        .await
        .unwrap();
    let missing = Uuid::new_v4();

    assert!(matches!(
        repo.find_by_public_id(missing).await,
        Err(StorageError::NotFound)
    ));
    let changes = UpdateAthleteRequest {
        age: Some(30),
        ..Default::default()
    };
    assert!(matches!(
        repo.update(missing, &changes).await,
        Err(StorageError::NotFound)
    ));
    assert!(matches!(repo.delete(missing).await, Err(StorageError::NotFound)));
    assert_eq!(athlete_count(&pool).await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_delete_removes_row(pool: PgPool) {
    seed_references(&pool).await;
    let repo = AthleteRepository::new(pool.clone());
    let new = athlete(&pool, "Ana Souza", "11122233344").await;
    repo.insert(&new).await.unwrap();

    repo.delete(new.athlete_id).await.unwrap();

    assert_eq!(athlete_count(&pool).await, 0);
    assert!(matches!(
        repo.find_by_public_id(new.athlete_id).await,
        Err(StorageError::NotFound)
    ));
}
