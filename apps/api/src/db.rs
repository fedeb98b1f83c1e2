use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

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

/// Creates the helpdesk tables if they do not exist yet.
/// Run once at startup, before the server starts accepting requests.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id          BIGSERIAL PRIMARY KEY,
            external_id VARCHAR(64) NOT NULL,
            name        VARCHAR(120),
            email       VARCHAR(255),
            created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_students_external_id ON students (external_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ai_recommendations (
            id           BIGSERIAL PRIMARY KEY,
            student_id   BIGINT NOT NULL REFERENCES students(id),
            input_text   TEXT NOT NULL,
            category     VARCHAR(64),
            is_technical BOOLEAN NOT NULL DEFAULT TRUE,
            ui_json      TEXT NOT NULL,
            raw_json     TEXT NOT NULL,
            created_at   TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tickets (
            id           BIGSERIAL PRIMARY KEY,
            student_id   BIGINT NOT NULL REFERENCES students(id),
            type         VARCHAR(32) NOT NULL,
            status       VARCHAR(32) NOT NULL DEFAULT 'open',
            priority     VARCHAR(16) NOT NULL DEFAULT 'normal',
            subject      VARCHAR(200) NOT NULL,
            description  TEXT NOT NULL,
            source_ai_id BIGINT REFERENCES ai_recommendations(id),
            assigned_to  VARCHAR(120),
            created_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at   TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema ready");
    Ok(())
}
