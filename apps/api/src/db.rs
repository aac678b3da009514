use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use tracing::info;

/// Idempotent schema, applied in order at startup.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            SERIAL PRIMARY KEY,
        email         VARCHAR(255) NOT NULL UNIQUE,
        password_hash VARCHAR(255) NOT NULL,
        is_active     BOOLEAN NOT NULL DEFAULT TRUE,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS profiles (
        id             SERIAL PRIMARY KEY,
        user_id        INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
        full_name      VARCHAR(255) NOT NULL,
        email          VARCHAR(255),
        phone          VARCHAR(50),
        linkedin       VARCHAR(500),
        github         VARCHAR(500),
        portfolio      VARCHAR(500),
        location       VARCHAR(255),
        summary        TEXT,
        skills         JSONB NOT NULL DEFAULT '[]',
        education      JSONB NOT NULL DEFAULT '[]',
        experience     JSONB NOT NULL DEFAULT '[]',
        projects       JSONB NOT NULL DEFAULT '[]',
        certifications JSONB NOT NULL DEFAULT '[]',
        created_at     TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at     TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS resumes (
        id                   SERIAL PRIMARY KEY,
        user_id              INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        job_title            VARCHAR(255),
        company_name         VARCHAR(255),
        job_description      TEXT,
        job_url              VARCHAR(500),
        latex_content        TEXT NOT NULL,
        ats_score            INTEGER NOT NULL,
        iterations           INTEGER NOT NULL DEFAULT 1,
        keywords             JSONB NOT NULL DEFAULT '[]',
        optimization_history JSONB NOT NULL DEFAULT '[]',
        created_at           TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_resumes_user_id ON resumes(user_id)",
    r#"
    CREATE TABLE IF NOT EXISTS cover_letters (
        id              SERIAL PRIMARY KEY,
        user_id         INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        job_title       VARCHAR(255),
        company_name    VARCHAR(255),
        job_description TEXT,
        job_url         VARCHAR(500),
        content         TEXT NOT NULL,
        created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_cover_letters_user_id ON cover_letters(user_id)",
    r#"
    CREATE TABLE IF NOT EXISTS job_analyses (
        id                       SERIAL PRIMARY KEY,
        user_id                  INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        job_title                VARCHAR(255),
        job_description          TEXT,
        job_url                  VARCHAR(500),
        matching_skills          JSONB NOT NULL DEFAULT '[]',
        missing_skills           JSONB NOT NULL DEFAULT '[]',
        priority_gaps            JSONB NOT NULL DEFAULT '[]',
        strengths                JSONB NOT NULL DEFAULT '[]',
        recommendations          JSONB NOT NULL DEFAULT '[]',
        certifications_suggested JSONB NOT NULL DEFAULT '[]',
        training_courses         JSONB NOT NULL DEFAULT '[]',
        learning_roadmap         TEXT NOT NULL DEFAULT '',
        match_percentage         INTEGER NOT NULL,
        created_at               TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_job_analyses_user_id ON job_analyses(user_id)",
];

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Applies the schema. Safe to run on every startup.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        pool.execute(*statement)
            .await
            .with_context(|| format!("Failed to apply schema statement: {}", statement.trim()))?;
    }
    info!("Database schema ready ({} statements)", SCHEMA.len());
    Ok(())
}
