//! Database schema and migrations for SOOON.
//!
//! Migrations are applied in order; `schema_version` records which ones ran.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: accounts
    r#"
CREATE TABLE accounts (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    email           TEXT NOT NULL UNIQUE COLLATE NOCASE,
    nickname        TEXT NOT NULL UNIQUE,
    password        TEXT NOT NULL,           -- Argon2 hash
    registered_at   TEXT NOT NULL DEFAULT (datetime('now'))
);
"#,
    // v2: refresh tokens for JWT sessions
    r#"
CREATE TABLE refresh_tokens (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id  INTEGER NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    token       TEXT NOT NULL UNIQUE,
    expires_at  TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    revoked_at  TEXT
);

CREATE INDEX idx_refresh_tokens_account_id ON refresh_tokens(account_id);
"#,
    // v3: posts and their images
    r#"
CREATE TABLE posts (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id      INTEGER NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    title           TEXT NOT NULL,
    content         TEXT NOT NULL,
    is_anonymous    INTEGER NOT NULL DEFAULT 1,
    created_at      TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at      TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_posts_account_id ON posts(account_id);
CREATE INDEX idx_posts_created_at ON posts(created_at);

CREATE TABLE post_images (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id     INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    url         TEXT NOT NULL
);

CREATE INDEX idx_post_images_post_id ON post_images(post_id);
"#,
    // v4: comments
    r#"
CREATE TABLE post_comments (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id         INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    account_id      INTEGER NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    comment         TEXT NOT NULL,
    is_anonymous    INTEGER NOT NULL DEFAULT 1,
    order_num       INTEGER NOT NULL,
    created_at      TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at      TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_post_comments_post_id ON post_comments(post_id);
"#,
    // v5: likes, one per (account, post)
    r#"
CREATE TABLE post_likes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id  INTEGER NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    post_id     INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(account_id, post_id)
);

CREATE INDEX idx_post_likes_post_id ON post_likes(post_id);
"#,
];
