//! File-lifecycle integration tests
//!
//! Exercise the command handlers against a containerized PostgreSQL and a
//! recording blob store, covering the blob compensation and slug behavior
//! that command-level unit tests cannot reach.
//!
//! These tests require Docker. Run with:
//!
//! ```bash
//! cargo test --test lifecycle_tests -- --ignored
//! ```

mod common;

use chrono::NaiveDate;
use common::{init_test_tracing, BlobOp, RecordingStore, TestPostgres};
use sqlx::PgPool;
use uuid::Uuid;

use folio_server::features::authors::commands::{update as author_update, update::UpdateAuthorCommand};
use folio_server::features::books::commands::{
    create as book_create,
    create::{CreateBookCommand, CreateBookError},
    delete as book_delete,
    update as book_update,
    update::{UpdateBookCommand, UpdateBookError},
};
use folio_server::features::shared::upload::UploadedFile;

fn cover() -> UploadedFile {
    UploadedFile {
        file_name: "cover.png".to_string(),
        content_type: Some("image/png".to_string()),
        bytes: vec![0u8; 64],
    }
}

fn manuscript() -> UploadedFile {
    UploadedFile {
        file_name: "dune.epub".to_string(),
        content_type: Some("application/epub+zip".to_string()),
        bytes: vec![0u8; 1024],
    }
}

fn book_command(title: &str) -> CreateBookCommand {
    CreateBookCommand {
        title: title.to_string(),
        description: "Desert planet epic.".to_string(),
        published_at: "1965-08-01".to_string(),
        status: None,
        author_id: None,
        cover_image: cover(),
        book_file: Some(manuscript()),
    }
}

async fn seed_book(
    pool: &PgPool,
    title: &str,
    cover_url: Option<&str>,
    file_url: Option<&str>,
) -> Uuid {
    sqlx::query_scalar(
        r#"
        INSERT INTO books (title, description, published_at, cover_image, book_file, status)
        VALUES ($1, 'seeded', $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(title)
    .bind(NaiveDate::from_ymd_opt(1965, 8, 1).unwrap())
    .bind(cover_url)
    .bind(file_url)
    .bind(if file_url.is_some() { "Incomplete" } else { "Unavailable" })
    .fetch_one(pool)
    .await
    .expect("seed book")
}

async fn seed_author(pool: &PgPool, first_name: &str, last_name: &str, slug: &str) -> Uuid {
    sqlx::query_scalar(
        r#"
        INSERT INTO authors (first_name, last_name, slug, biography, profile_image)
        VALUES ($1, $2, $3, 'seeded', $4)
        RETURNING id
        "#,
    )
    .bind(first_name)
    .bind(last_name)
    .bind(slug)
    .bind(RecordingStore::url_for(&format!("avatar/{}.png", slug)))
    .fetch_one(pool)
    .await
    .expect("seed author")
}

async fn count_books(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM books")
        .fetch_one(pool)
        .await
        .expect("count books")
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_book_delete_attempts_both_blob_deletes_before_row_removal() {
    init_test_tracing();
    let pg = TestPostgres::start().await.expect("postgres");
    let pool = pg.pool();

    let cover_url = RecordingStore::url_for("covers/dune.png");
    let file_url = RecordingStore::url_for("books/dune.epub");
    let id = seed_book(&pool, "Dune", Some(&cover_url), Some(&file_url)).await;

    // Both deletes fail, yet both are attempted and the row still goes.
    let store = RecordingStore::with_failing_deletes();
    let response = book_delete::handle(pool.clone(), &store, id)
        .await
        .expect("delete succeeds despite blob failures");

    assert_eq!(response.id, id);
    let deleted = store.deleted_urls();
    assert!(deleted.contains(&cover_url));
    assert!(deleted.contains(&file_url));
    assert_eq!(count_books(&pool).await, 0);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_duplicate_title_create_uploads_nothing() {
    init_test_tracing();
    let pg = TestPostgres::start().await.expect("postgres");
    let pool = pg.pool();

    seed_book(&pool, "Dune", None, None).await;

    // Case differs; the pre-check still rejects before any upload.
    let store = RecordingStore::new();
    let err = book_create::handle(pool.clone(), &store, book_command("dune"))
        .await
        .unwrap_err();

    assert!(matches!(err, CreateBookError::DuplicateTitle(_)));
    assert!(store.ops().is_empty());
    assert_eq!(count_books(&pool).await, 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_book_file_upload_failure_removes_cover_and_inserts_nothing() {
    init_test_tracing();
    let pg = TestPostgres::start().await.expect("postgres");
    let pool = pg.pool();

    let store = RecordingStore::failing_store_for("books/");
    let err = book_create::handle(pool.clone(), &store, book_command("Dune"))
        .await
        .unwrap_err();

    assert!(matches!(err, CreateBookError::Storage(_)));
    assert_eq!(
        store.ops(),
        vec![
            BlobOp::Stored {
                key: "covers/dune.png".to_string()
            },
            BlobOp::Deleted {
                url: RecordingStore::url_for("covers/dune.png")
            },
        ]
    );
    assert_eq!(count_books(&pool).await, 0);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_author_slug_recomputed_only_when_derived_differs() {
    init_test_tracing();
    let pg = TestPostgres::start().await.expect("postgres");
    let pool = pg.pool();

    let id = seed_author(&pool, "Ursula", "Le Guin", "ursula-le-guin").await;

    // Biography-only patch keeps the slug.
    let patched = author_update::handle(
        pool.clone(),
        UpdateAuthorCommand {
            id,
            first_name: None,
            last_name: None,
            biography: Some("Wrote the Earthsea cycle.".to_string()),
        },
    )
    .await
    .expect("biography update");
    assert_eq!(patched.slug, "ursula-le-guin");

    // Case-only rename derives the same slug, so it stays.
    let patched = author_update::handle(
        pool.clone(),
        UpdateAuthorCommand {
            id,
            first_name: Some("URSULA".to_string()),
            last_name: None,
            biography: None,
        },
    )
    .await
    .expect("case-only rename");
    assert_eq!(patched.first_name, "URSULA");
    assert_eq!(patched.slug, "ursula-le-guin");

    // A real rename derives a different slug and it is recomputed.
    let patched = author_update::handle(
        pool.clone(),
        UpdateAuthorCommand {
            id,
            first_name: Some("Ursula K.".to_string()),
            last_name: None,
            biography: None,
        },
    )
    .await
    .expect("rename");
    assert_eq!(patched.slug, "ursula-k-le-guin");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_title_uniqueness_ignores_case_on_update() {
    init_test_tracing();
    let pg = TestPostgres::start().await.expect("postgres");
    let pool = pg.pool();

    seed_book(&pool, "Dune", None, None).await;
    let other = seed_book(&pool, "Hyperion", None, None).await;

    let err = book_update::handle(
        pool.clone(),
        UpdateBookCommand {
            id: other,
            title: Some("DUNE".to_string()),
            description: None,
            published_at: None,
            status: None,
            author_id: None,
            book_file: None,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, UpdateBookError::DuplicateTitle(_)));
}
