use planboard::db::repositories::LocalRepository;
use planboard::db::repository::BoardRepository;
use planboard::db::{RepositoryBuilder, RepositoryFactory, RepositoryType};

#[test]
fn test_repository_type_parsing() {
    assert_eq!(
        "local".parse::<RepositoryType>().unwrap(),
        RepositoryType::Local
    );
    assert_eq!(
        "postgres".parse::<RepositoryType>().unwrap(),
        RepositoryType::Postgres
    );
    assert_eq!(
        "pg".parse::<RepositoryType>().unwrap(),
        RepositoryType::Postgres
    );
    assert!("mongodb".parse::<RepositoryType>().is_err());
}

#[tokio::test]
async fn test_create_local_repository() {
    let repo = RepositoryFactory::create_local();
    assert!(repo.health_check().await.unwrap());
}

#[tokio::test]
async fn test_create_by_type() {
    let repo = RepositoryFactory::create(RepositoryType::Local, None)
        .await
        .unwrap();
    assert!(repo.health_check().await.unwrap());
}

#[tokio::test]
async fn test_builder_local_repository() {
    let repo = RepositoryBuilder::new()
        .repository_type(RepositoryType::Local)
        .build()
        .await
        .unwrap();
    assert!(repo.health_check().await.unwrap());
}

#[tokio::test]
async fn test_local_repositories_are_isolated() {
    // Two repositories must not share state.
    let a = LocalRepository::new();
    let b = LocalRepository::new();

    let board = a.create_board("only in a");
    assert!(a.fetch_board(board.id).await.is_ok());
    assert!(b.fetch_board(board.id).await.unwrap_err().is_not_found());
}
