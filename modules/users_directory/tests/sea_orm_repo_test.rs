use std::sync::Arc;

use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use users_directory::contract::model::{Identity, NewUser};
use users_directory::domain::repo::{InsertError, UsersRepository};
use users_directory::domain::service::{Service, ServiceConfig};
use users_directory::infra::storage::migrations::Migrator;
use users_directory::infra::storage::SeaOrmUsersRepository;

async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

const PICTURE: &str = "https://img.example.com/alice.png";

fn new_user(name: &str, token: &str) -> NewUser {
    NewUser {
        name: name.to_owned(),
        token_identifier: token.to_owned(),
        email: format!("{token}@x.com"),
        image_url: None,
    }
}

#[tokio::test]
async fn insert_then_find_by_token() {
    let repo = SeaOrmUsersRepository::new(create_test_db().await);

    let id = repo.insert(new_user("Alice", "t-alice")).await.unwrap();
    let found = repo.find_all_by_token("t-alice").await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, id);
    assert_eq!(found[0].name, "Alice");
    assert_eq!(found[0].email, "t-alice@x.com");
    assert!(repo.find_all_by_token("t-other").await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_token_insert_is_rejected() {
    let repo = SeaOrmUsersRepository::new(create_test_db().await);

    repo.insert(new_user("Alice", "t-alice")).await.unwrap();
    let err = repo.insert(new_user("Alice 2", "t-alice")).await.unwrap_err();

    assert!(matches!(err, InsertError::DuplicateToken));
    assert_eq!(repo.find_all_by_token("t-alice").await.unwrap().len(), 1);
}

#[tokio::test]
async fn patch_name_changes_only_name() {
    let repo = SeaOrmUsersRepository::new(create_test_db().await);

    let id = repo
        .insert(NewUser {
            image_url: Some(PICTURE.to_owned()),
            ..new_user("Alice", "t-alice")
        })
        .await
        .unwrap();
    let before = repo.find_all_by_token("t-alice").await.unwrap().remove(0);
    repo.patch_name(id, "Alice Liddell").await.unwrap();
    let after = repo.find_all_by_token("t-alice").await.unwrap().remove(0);

    assert_eq!(after.name, "Alice Liddell");
    assert_eq!(after.email, before.email);
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(after.image_url.as_deref(), Some(PICTURE));
    assert!(repo.patch_name(uuid::Uuid::new_v4(), "x").await.is_err());
}

#[tokio::test]
async fn search_is_case_insensitive_and_ordered() {
    let repo = SeaOrmUsersRepository::new(create_test_db().await);
    repo.insert(new_user("Bob Stone", "t-bob")).await.unwrap();
    repo.insert(new_user("alice Smith", "t-alice")).await.unwrap();
    repo.insert(new_user("Carol", "t-carol")).await.unwrap();

    let hits = repo.search_by_name("S", 10).await.unwrap();
    let names: Vec<_> = hits.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["Bob Stone", "alice Smith"]);

    let hits = repo.search_by_name("ALICE smi", 10).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].token_identifier, "t-alice");

    assert_eq!(repo.search_by_name("o", 1).await.unwrap().len(), 1);
    assert!(repo.search_by_name("   ", 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn search_folds_non_ascii_case() {
    let repo = SeaOrmUsersRepository::new(create_test_db().await);
    repo.insert(new_user("Élodie Ünal", "t-elodie")).await.unwrap();
    repo.insert(new_user("Eloise", "t-eloise")).await.unwrap();

    for query in ["Élodie", "élodie", "ÉLODIE", "ünal", "lodie"] {
        let hits = repo.search_by_name(query, 10).await.unwrap();
        assert_eq!(hits.len(), 1, "query {query:?}");
        assert_eq!(hits[0].name, "Élodie Ünal");
    }
}

#[tokio::test]
async fn renamed_user_is_found_by_new_name_only() {
    let repo = SeaOrmUsersRepository::new(create_test_db().await);
    let id = repo.insert(new_user("Alice", "t-alice")).await.unwrap();

    repo.patch_name(id, "Ömer").await.unwrap();

    assert!(repo.search_by_name("alice", 10).await.unwrap().is_empty());
    let hits = repo.search_by_name("ÖMER", 10).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, id);
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    let repo = SeaOrmUsersRepository::new(create_test_db().await);
    repo.insert(new_user("100% Real", "t-real")).await.unwrap();
    repo.insert(new_user("1000 Fake", "t-fake")).await.unwrap();

    let hits = repo.search_by_name("100%", 10).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "100% Real");
    assert!(repo.search_by_name("a_e", 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn service_over_sqlite_end_to_end() {
    let repo = SeaOrmUsersRepository::new(create_test_db().await);
    let svc = Service::new(Arc::new(repo), ServiceConfig::default());

    let alice = Identity::new("t-alice")
        .with_name("Alice")
        .with_email("alice@x.com");
    let alicia = Identity::new("t-alicia")
        .with_email("alicia@x.com")
        .with_picture_url(PICTURE);

    let a = svc.store_user(Some(&alice)).await.unwrap();
    assert_eq!(svc.store_user(Some(&alice)).await.unwrap(), a);
    svc.store_user(Some(&alicia)).await.unwrap();

    let me = svc.get_current_user(Some(&alice)).await.unwrap();
    assert_eq!(me.id, a);

    let hits = svc.search_users(Some(&alice), "ali", None).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "alicia");
    assert_eq!(hits[0].image_url.as_deref(), Some(PICTURE));
}
