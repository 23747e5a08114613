//! Post repository for SOOON.

use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite};

use super::types::{NewPost, PageRequest, Post, PostImage, Slice};
use crate::db::DbConn;
use crate::{Result, SooonError};

/// Post columns plus the author nickname and the computed like count.
const POST_SELECT: &str = "SELECT p.id, p.account_id, a.nickname AS author_nickname,
        p.title, p.content, p.is_anonymous,
        (SELECT COUNT(1) FROM post_likes pl WHERE pl.post_id = p.id) AS like_count,
        p.created_at, p.updated_at
     FROM posts p
     JOIN accounts a ON a.id = p.account_id";

/// Repository for post and post image operations.
pub struct PostRepository<'c> {
    conn: &'c mut DbConn,
}

impl<'c> PostRepository<'c> {
    /// Create a repository running on the given connection or transaction.
    pub fn new(conn: &'c mut DbConn) -> Self {
        Self { conn }
    }

    /// Get a post by ID, with its images.
    pub async fn find_by_id(&mut self, id: i64) -> Result<Option<Post>> {
        let sql = format!("{POST_SELECT} WHERE p.id = ?");
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;

        match post {
            Some(mut post) => {
                for image in self.images(post.id).await? {
                    post.add_image(image);
                }
                Ok(Some(post))
            }
            None => Ok(None),
        }
    }

    /// List posts owned by an account, newest first.
    pub async fn find_all_by_account_order_by_created_at_desc(
        &mut self,
        account_id: i64,
    ) -> Result<Vec<Post>> {
        let sql =
            format!("{POST_SELECT} WHERE p.account_id = ? ORDER BY p.created_at DESC, p.id DESC");
        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(account_id)
            .fetch_all(&mut *self.conn)
            .await?;
        self.attach_images(posts).await
    }

    /// List every post in insertion order.
    pub async fn find_all(&mut self) -> Result<Vec<Post>> {
        let sql = format!("{POST_SELECT} ORDER BY p.id");
        let posts = sqlx::query_as::<_, Post>(&sql)
            .fetch_all(&mut *self.conn)
            .await?;
        self.attach_images(posts).await
    }

    /// Fetch one page of posts in the requested order.
    ///
    /// Reads one row past the page to decide `has_next`; no total count is run.
    pub async fn find_slice(&mut self, request: &PageRequest) -> Result<Slice<Post>> {
        let sql = format!(
            "{POST_SELECT} ORDER BY {} LIMIT ? OFFSET ?",
            request.sort.order_by()
        );
        let rows = sqlx::query_as::<_, Post>(&sql)
            .bind(i64::from(request.size) + 1)
            .bind(request.offset())
            .fetch_all(&mut *self.conn)
            .await?;

        let slice = Slice::from_lookahead(rows, request);
        let content = self.attach_images(slice.content).await?;
        Ok(Slice { content, ..slice })
    }

    /// Insert a post together with its image URLs.
    pub async fn save(&mut self, new_post: &NewPost) -> Result<Post> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO posts (account_id, title, content, is_anonymous)
             VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(new_post.account_id)
        .bind(&new_post.title)
        .bind(&new_post.content)
        .bind(new_post.is_anonymous)
        .fetch_one(&mut *self.conn)
        .await?;

        if !new_post.image_urls.is_empty() {
            let mut builder: QueryBuilder<Sqlite> =
                QueryBuilder::new("INSERT INTO post_images (post_id, url) ");
            builder.push_values(&new_post.image_urls, |mut b, url| {
                b.push_bind(id).push_bind(url);
            });
            builder.build().execute(&mut *self.conn).await?;
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| SooonError::NotFound("post".to_string()))
    }

    /// Persist the editable fields of a post and bump `updated_at`.
    ///
    /// Returns false if the post no longer exists.
    pub async fn update(&mut self, post: &Post) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE posts SET title = ?, content = ?, is_anonymous = ?, updated_at = datetime('now')
             WHERE id = ?",
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.is_anonymous)
        .bind(post.id)
        .execute(&mut *self.conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a post. Images, comments and likes go with it.
    pub async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move a post to another owner.
    pub async fn reassign_owner(&mut self, post_id: i64, account_id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE posts SET account_id = ? WHERE id = ?")
            .bind(account_id)
            .bind(post_id)
            .execute(&mut *self.conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List the images of a post in insertion order.
    pub async fn images(&mut self, post_id: i64) -> Result<Vec<PostImage>> {
        let images = sqlx::query_as::<_, PostImage>(
            "SELECT id, post_id, url FROM post_images WHERE post_id = ? ORDER BY id",
        )
        .bind(post_id)
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(images)
    }

    async fn attach_images(&mut self, mut posts: Vec<Post>) -> Result<Vec<Post>> {
        if posts.is_empty() {
            return Ok(posts);
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id, post_id, url FROM post_images WHERE post_id IN (");
        let mut ids = builder.separated(", ");
        for post in &posts {
            ids.push_bind(post.id);
        }
        builder.push(") ORDER BY id");

        let images: Vec<PostImage> = builder
            .build_query_as()
            .fetch_all(&mut *self.conn)
            .await?;

        let mut by_post: HashMap<i64, Vec<PostImage>> = HashMap::new();
        for image in images {
            by_post.entry(image.post_id).or_default().push(image);
        }
        for post in &mut posts {
            for image in by_post.remove(&post.id).unwrap_or_default() {
                post.add_image(image);
            }
        }
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Account, AccountRepository, NewAccount};
    use crate::post::types::{PostDraft, SortKey};
    use crate::Database;

    async fn setup_db() -> (Database, Account, Account) {
        let db = Database::open_in_memory().await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();
        let mut repo = AccountRepository::new(&mut conn);
        let a = repo
            .create(&NewAccount::new("a@sungshin.ac.kr", "alpha", "hash"))
            .await
            .unwrap();
        let b = repo
            .create(&NewAccount::new("b@sungshin.ac.kr", "beta", "hash"))
            .await
            .unwrap();
        drop(conn);
        (db, a, b)
    }

    async fn like(conn: &mut DbConn, account_id: i64, post_id: i64) {
        sqlx::query("INSERT INTO post_likes (account_id, post_id) VALUES (?, ?)")
            .bind(account_id)
            .bind(post_id)
            .execute(conn)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_save_and_find_by_id() {
        let (db, a, _) = setup_db().await;
        let mut conn = db.pool().acquire().await.unwrap();
        let mut repo = PostRepository::new(&mut conn);

        let draft = PostDraft::new("T", "C", false).with_images(vec![
            "https://img/1.png".to_string(),
            "https://img/2.png".to_string(),
        ]);
        let post = repo.save(&draft.to_new_post(&a)).await.unwrap();

        assert_eq!(post.title, "T");
        assert_eq!(post.content, "C");
        assert!(!post.is_anonymous);
        assert_eq!(post.account_id, a.id);
        assert_eq!(post.author_nickname, "alpha");
        assert_eq!(post.like_count, 0);
        assert_eq!(post.images.len(), 2);
        assert!(post.images.iter().all(|i| i.post_id == post.id));

        let found = repo.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(found, post);
        assert!(repo.find_by_id(post.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_by_account_is_newest_first() {
        let (db, a, b) = setup_db().await;
        let mut conn = db.pool().acquire().await.unwrap();
        let mut repo = PostRepository::new(&mut conn);

        let first = repo
            .save(&PostDraft::new("first", "c", true).to_new_post(&a))
            .await
            .unwrap();
        let second = repo
            .save(&PostDraft::new("second", "c", true).to_new_post(&a))
            .await
            .unwrap();
        repo.save(&PostDraft::new("other", "c", true).to_new_post(&b))
            .await
            .unwrap();

        let posts = repo
            .find_all_by_account_order_by_created_at_desc(a.id)
            .await
            .unwrap();
        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);

        assert_eq!(repo.find_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_like_count_is_computed() {
        let (db, a, b) = setup_db().await;
        let mut conn = db.pool().acquire().await.unwrap();

        let post = PostRepository::new(&mut conn)
            .save(&PostDraft::new("T", "C", true).to_new_post(&a))
            .await
            .unwrap();
        like(&mut conn, a.id, post.id).await;
        like(&mut conn, b.id, post.id).await;

        let found = PostRepository::new(&mut conn)
            .find_by_id(post.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.like_count, 2);
    }

    #[tokio::test]
    async fn test_find_slice_by_like_count() {
        let (db, a, b) = setup_db().await;
        let mut conn = db.pool().acquire().await.unwrap();

        let mut ids = Vec::new();
        for i in 0..3 {
            let post = PostRepository::new(&mut conn)
                .save(&PostDraft::new(format!("p{i}"), "c", true).to_new_post(&a))
                .await
                .unwrap();
            ids.push(post.id);
        }
        // p1 has two likes, p2 one, p0 none
        like(&mut conn, a.id, ids[1]).await;
        like(&mut conn, b.id, ids[1]).await;
        like(&mut conn, a.id, ids[2]).await;

        let mut repo = PostRepository::new(&mut conn);
        let req = PageRequest::new(0, 2, SortKey::LikeCount).unwrap();
        let page = repo.find_slice(&req).await.unwrap();
        let got: Vec<i64> = page.content.iter().map(|p| p.id).collect();
        assert_eq!(got, vec![ids[1], ids[2]]);
        assert!(page.has_next);

        let req = PageRequest::new(1, 2, SortKey::LikeCount).unwrap();
        let page = repo.find_slice(&req).await.unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].id, ids[0]);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn test_find_slice_by_created_at() {
        let (db, a, _) = setup_db().await;
        let mut conn = db.pool().acquire().await.unwrap();
        let mut repo = PostRepository::new(&mut conn);

        let mut last = 0;
        for i in 0..2 {
            last = repo
                .save(&PostDraft::new(format!("p{i}"), "c", true).to_new_post(&a))
                .await
                .unwrap()
                .id;
        }

        let req = PageRequest::new(0, 2, SortKey::CreatedAt).unwrap();
        let page = repo.find_slice(&req).await.unwrap();
        assert_eq!(page.content.len(), 2);
        assert_eq!(page.content[0].id, last);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn test_update_delete_and_reassign() {
        let (db, a, b) = setup_db().await;
        let mut conn = db.pool().acquire().await.unwrap();
        let mut repo = PostRepository::new(&mut conn);

        let mut post = repo
            .save(
                &PostDraft::new("T", "C", true)
                    .with_images(vec!["u".to_string()])
                    .to_new_post(&a),
            )
            .await
            .unwrap();

        post.apply(&PostDraft::new("T2", "C2", false));
        assert!(repo.update(&post).await.unwrap());
        let found = repo.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(found.title, "T2");
        assert!(!found.is_anonymous);

        assert!(repo.reassign_owner(post.id, b.id).await.unwrap());
        let found = repo.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(found.account_id, b.id);
        assert_eq!(found.author_nickname, "beta");

        assert!(repo.delete(post.id).await.unwrap());
        assert!(!repo.delete(post.id).await.unwrap());
        assert!(repo.images(post.id).await.unwrap().is_empty());
        assert!(!repo.update(&post).await.unwrap());
    }
}
