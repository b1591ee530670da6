use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::domain::{is_valid_rating, AppearanceId, EpisodeId, GuestId};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEpisode {
    pub id: EpisodeId,
    pub number: i64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredGuest {
    pub id: GuestId,
    pub name: String,
    pub occupation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAppearance {
    pub id: AppearanceId,
    pub rating: i64,
    pub episode_id: EpisodeId,
    pub guest_id: GuestId,
}

/// An episode with every appearance on it, each joined with its guest.
#[derive(Debug, Clone)]
pub struct StoredEpisodeDetail {
    pub episode: StoredEpisode,
    pub appearances: Vec<(StoredAppearance, StoredGuest)>,
}

#[derive(Debug, Clone)]
pub struct StoredAppearanceRecord {
    pub appearance: StoredAppearance,
    pub episode: StoredEpisode,
    pub guest: StoredGuest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppearanceRejection {
    RatingOutOfRange(i64),
    MissingEpisode,
    MissingGuest,
    UnknownEpisode(EpisodeId),
    UnknownGuest(GuestId),
    /// A referenced row vanished between the lookup and the insert.
    ReferenceRemoved,
}

#[derive(Debug, Clone)]
pub enum AppearanceInsert {
    Created(StoredAppearanceRecord),
    Rejected(AppearanceRejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub episodes: usize,
    pub guests: usize,
    pub appearances: usize,
}

const SAMPLE_EPISODES: [(&str, i64); 5] = [
    ("1/11/99", 1),
    ("1/12/99", 2),
    ("1/13/99", 3),
    ("1/14/99", 4),
    ("1/15/99", 5),
];

const SAMPLE_GUESTS: [(&str, &str); 5] = [
    ("Michael J. Fox", "actor"),
    ("Sandra Bernhard", "Comedian"),
    ("Tracey Ullman", "television actress"),
    ("Gillian Anderson", "film actress"),
    ("David Duchovny", "television actor"),
];

// (rating, episode index, guest index) into the sample tables above.
const SAMPLE_APPEARANCES: [(i64, usize, usize); 6] = [
    (4, 0, 0),
    (5, 0, 1),
    (3, 1, 1),
    (4, 1, 2),
    (5, 2, 0),
    (4, 2, 2),
];

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn create_episode(&self, number: i64, date: &str) -> Result<EpisodeId> {
        let rec = sqlx::query("INSERT INTO episodes (date, number) VALUES (?, ?) RETURNING id")
            .bind(date)
            .bind(number)
            .fetch_one(&self.pool)
            .await
            .context("failed to insert episode")?;
        Ok(EpisodeId(rec.get::<i64, _>(0)))
    }

    pub async fn create_guest(&self, name: &str, occupation: &str) -> Result<GuestId> {
        let rec = sqlx::query("INSERT INTO guests (name, occupation) VALUES (?, ?) RETURNING id")
            .bind(name)
            .bind(occupation)
            .fetch_one(&self.pool)
            .await
            .context("failed to insert guest")?;
        Ok(GuestId(rec.get::<i64, _>(0)))
    }

    pub async fn list_episodes(&self) -> Result<Vec<StoredEpisode>> {
        let rows = sqlx::query("SELECT id, number, date FROM episodes ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| episode_from_row(&r, 0)).collect())
    }

    pub async fn list_guests(&self) -> Result<Vec<StoredGuest>> {
        let rows = sqlx::query("SELECT id, name, occupation FROM guests ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| guest_from_row(&r, 0)).collect())
    }

    pub async fn load_episode(&self, episode_id: EpisodeId) -> Result<Option<StoredEpisode>> {
        let row = sqlx::query("SELECT id, number, date FROM episodes WHERE id = ?")
            .bind(episode_id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| episode_from_row(&r, 0)))
    }

    pub async fn load_guest(&self, guest_id: GuestId) -> Result<Option<StoredGuest>> {
        let row = sqlx::query("SELECT id, name, occupation FROM guests WHERE id = ?")
            .bind(guest_id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| guest_from_row(&r, 0)))
    }

    pub async fn load_episode_detail(
        &self,
        episode_id: EpisodeId,
    ) -> Result<Option<StoredEpisodeDetail>> {
        let Some(episode) = self.load_episode(episode_id).await? else {
            return Ok(None);
        };

        let rows = sqlx::query(
            "SELECT a.id, a.rating, a.episode_id, a.guest_id, g.id, g.name, g.occupation
             FROM appearances a
             INNER JOIN guests g ON g.id = a.guest_id
             WHERE a.episode_id = ?
             ORDER BY a.id ASC",
        )
        .bind(episode_id.0)
        .fetch_all(&self.pool)
        .await?;

        let appearances = rows
            .into_iter()
            .map(|r| (appearance_from_row(&r, 0), guest_from_row(&r, 4)))
            .collect();

        Ok(Some(StoredEpisodeDetail {
            episode,
            appearances,
        }))
    }

    /// Deletes the episode and, through the foreign key cascade, its
    /// appearances. Returns `false` when no such episode exists.
    pub async fn delete_episode(&self, episode_id: EpisodeId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM episodes WHERE id = ?")
            .bind(episode_id.0)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete episode {}", episode_id.0))?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn create_appearance(
        &self,
        rating: i64,
        episode_id: Option<EpisodeId>,
        guest_id: Option<GuestId>,
    ) -> Result<AppearanceInsert> {
        if !is_valid_rating(rating) {
            return Ok(AppearanceInsert::Rejected(
                AppearanceRejection::RatingOutOfRange(rating),
            ));
        }
        let Some(episode_id) = episode_id else {
            return Ok(AppearanceInsert::Rejected(AppearanceRejection::MissingEpisode));
        };
        let Some(guest_id) = guest_id else {
            return Ok(AppearanceInsert::Rejected(AppearanceRejection::MissingGuest));
        };
        let Some(episode) = self.load_episode(episode_id).await? else {
            return Ok(AppearanceInsert::Rejected(
                AppearanceRejection::UnknownEpisode(episode_id),
            ));
        };
        let Some(guest) = self.load_guest(guest_id).await? else {
            return Ok(AppearanceInsert::Rejected(AppearanceRejection::UnknownGuest(
                guest_id,
            )));
        };

        let Some(appearance_id) = self
            .insert_appearance_row(rating, episode_id, guest_id)
            .await?
        else {
            return Ok(AppearanceInsert::Rejected(
                AppearanceRejection::ReferenceRemoved,
            ));
        };

        Ok(AppearanceInsert::Created(StoredAppearanceRecord {
            appearance: StoredAppearance {
                id: appearance_id,
                rating,
                episode_id,
                guest_id,
            },
            episode,
            guest,
        }))
    }

    /// Returns `None` when the row fails a foreign key, e.g. the episode was
    /// deleted after `create_appearance` looked it up.
    async fn insert_appearance_row(
        &self,
        rating: i64,
        episode_id: EpisodeId,
        guest_id: GuestId,
    ) -> Result<Option<AppearanceId>> {
        let inserted = sqlx::query(
            "INSERT INTO appearances (rating, episode_id, guest_id) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(rating)
        .bind(episode_id.0)
        .bind(guest_id.0)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(rec) => Ok(Some(AppearanceId(rec.get::<i64, _>(0)))),
            Err(err)
                if err
                    .as_database_error()
                    .is_some_and(|db_err| db_err.is_foreign_key_violation()) =>
            {
                tracing::warn!(
                    episode_id = episode_id.0,
                    guest_id = guest_id.0,
                    "appearance insert hit a missing reference"
                );
                Ok(None)
            }
            Err(err) => Err(err).context("failed to insert appearance"),
        }
    }

    pub async fn is_empty(&self) -> Result<bool> {
        let episodes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM episodes")
            .fetch_one(&self.pool)
            .await?;
        let guests: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM guests")
            .fetch_one(&self.pool)
            .await?;
        Ok(episodes == 0 && guests == 0)
    }

    pub async fn clear_all(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for table in ["appearances", "episodes", "guests"] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await
                .with_context(|| format!("failed to clear {table}"))?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Replaces all rows with the built-in sample data set.
    pub async fn seed_sample_data(&self) -> Result<SeedSummary> {
        self.clear_all().await?;

        let mut episodes = Vec::with_capacity(SAMPLE_EPISODES.len());
        for (date, number) in SAMPLE_EPISODES {
            episodes.push(self.create_episode(number, date).await?);
        }

        let mut guests = Vec::with_capacity(SAMPLE_GUESTS.len());
        for (name, occupation) in SAMPLE_GUESTS {
            guests.push(self.create_guest(name, occupation).await?);
        }

        let mut appearances = 0;
        for (rating, episode_idx, guest_idx) in SAMPLE_APPEARANCES {
            match self
                .create_appearance(
                    rating,
                    Some(episodes[episode_idx]),
                    Some(guests[guest_idx]),
                )
                .await?
            {
                AppearanceInsert::Created(_) => appearances += 1,
                AppearanceInsert::Rejected(reason) => {
                    anyhow::bail!("sample appearance rejected: {reason:?}")
                }
            }
        }

        tracing::info!(
            episodes = episodes.len(),
            guests = guests.len(),
            appearances,
            "seeded sample data"
        );

        Ok(SeedSummary {
            episodes: episodes.len(),
            guests: guests.len(),
            appearances,
        })
    }
}

fn episode_from_row(row: &sqlx::sqlite::SqliteRow, offset: usize) -> StoredEpisode {
    StoredEpisode {
        id: EpisodeId(row.get::<i64, _>(offset)),
        number: row.get::<i64, _>(offset + 1),
        date: row.get::<String, _>(offset + 2),
    }
}

fn guest_from_row(row: &sqlx::sqlite::SqliteRow, offset: usize) -> StoredGuest {
    StoredGuest {
        id: GuestId(row.get::<i64, _>(offset)),
        name: row.get::<String, _>(offset + 1),
        occupation: row.get::<String, _>(offset + 2),
    }
}

fn appearance_from_row(row: &sqlx::sqlite::SqliteRow, offset: usize) -> StoredAppearance {
    StoredAppearance {
        id: AppearanceId(row.get::<i64, _>(offset)),
        rating: row.get::<i64, _>(offset + 1),
        episode_id: EpisodeId(row.get::<i64, _>(offset + 2)),
        guest_id: GuestId(row.get::<i64, _>(offset + 3)),
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
