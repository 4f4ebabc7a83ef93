//! Repository tests against a real PostgreSQL database.
//!
//! Run with `DATABASE_URL` pointing at a scratch server:
//! `cargo test -p tubely-db -- --ignored`

use sqlx::PgPool;
use tubely_core::{CreateVideoParams, StorageReference};
use tubely_db::{PgVideoRepository, VideoRepository};
use uuid::Uuid;

fn params(user_id: Uuid, title: &str) -> CreateVideoParams {
    CreateVideoParams {
        user_id,
        title: title.to_string(),
        description: "test video".to_string(),
    }
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_create_then_get(pool: PgPool) {
    let repo = PgVideoRepository::new(pool);
    let user_id = Uuid::new_v4();

    let created = repo.create_video(params(user_id, "Boots")).await.unwrap();
    let fetched = repo.get_video(created.id).await.unwrap().unwrap();

    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.user_id, user_id);
    assert_eq!(fetched.title, "Boots");
    assert!(fetched.video_url.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_get_missing_video_is_none(pool: PgPool) {
    let repo = PgVideoRepository::new(pool);
    assert!(repo.get_video(Uuid::new_v4()).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_update_persists_storage_reference(pool: PgPool) {
    let repo = PgVideoRepository::new(pool);
    let mut video = repo
        .create_video(params(Uuid::new_v4(), "Boots"))
        .await
        .unwrap();

    video.set_storage_reference(&StorageReference::new("tubely-videos", "landscape/abc.mp4"));
    repo.update_video(&video).await.unwrap();

    let stored = repo.get_video(video.id).await.unwrap().unwrap();
    assert_eq!(
        stored.video_url.as_deref(),
        Some("tubely-videos,landscape/abc.mp4")
    );
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_list_is_scoped_to_user(pool: PgPool) {
    let repo = PgVideoRepository::new(pool);
    let owner = Uuid::new_v4();
    repo.create_video(params(owner, "one")).await.unwrap();
    repo.create_video(params(owner, "two")).await.unwrap();
    repo.create_video(params(Uuid::new_v4(), "someone else"))
        .await
        .unwrap();

    let videos = repo.list_videos_for_user(owner).await.unwrap();

    assert_eq!(videos.len(), 2);
    assert!(videos.iter().all(|v| v.user_id == owner));
}
