//! `music_band` table queries

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use crate::error::{ApiError, ApiResult};
use crate::filter::{BandFilter, SortOrder};
use crate::model::{Coordinates, Label, MusicBand, NewBand};
use crate::pagination::{Page, PageRequest};

const COLUMNS: &str = "id, name, coordinate_x, coordinate_y, creation_date, \
    number_of_participants, singles_count, albums_count, genre, label_sales";

#[derive(Debug, FromRow)]
struct BandRow {
    id: i64,
    name: String,
    coordinate_x: i64,
    coordinate_y: i64,
    creation_date: String,
    number_of_participants: i64,
    singles_count: Option<i64>,
    albums_count: Option<i64>,
    genre: String,
    label_sales: Option<i64>,
}

impl TryFrom<BandRow> for MusicBand {
    type Error = ApiError;

    fn try_from(row: BandRow) -> Result<Self, Self::Error> {
        let creation_date = DateTime::parse_from_rfc3339(&row.creation_date)
            .map_err(|e| {
                ApiError::Internal(format!(
                    "Band {} has unreadable creation_date {:?}: {}",
                    row.id, row.creation_date, e
                ))
            })?
            .with_timezone(&Utc);

        let genre = row
            .genre
            .parse()
            .map_err(|e| ApiError::Internal(format!("Band {}: {}", row.id, e)))?;

        Ok(MusicBand {
            id: row.id,
            name: row.name,
            coordinates: Coordinates {
                x: row.coordinate_x,
                y: row.coordinate_y,
            },
            creation_date,
            number_of_participants: row.number_of_participants,
            singles_count: row.singles_count,
            albums_count: row.albums_count,
            genre,
            label: row.label_sales.map(|sales| Label { sales }),
        })
    }
}

fn into_bands(rows: Vec<BandRow>) -> ApiResult<Vec<MusicBand>> {
    rows.into_iter().map(MusicBand::try_from).collect()
}

/// Stored creation timestamps carry millisecond precision
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Insert a band stamped with the current time, returning it as stored
pub async fn insert_band(pool: &SqlitePool, band: &NewBand) -> ApiResult<MusicBand> {
    let created = Utc::now().trunc_subsecs(3);

    let result = sqlx::query(
        "INSERT INTO music_band
            (name, coordinate_x, coordinate_y, creation_date, number_of_participants,
             singles_count, albums_count, genre, label_sales)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&band.name)
    .bind(band.coordinates.x)
    .bind(band.coordinates.y)
    .bind(format_timestamp(created))
    .bind(band.number_of_participants)
    .bind(band.singles_count)
    .bind(band.albums_count)
    .bind(band.genre.as_str())
    .bind(band.label.map(|l| l.sales))
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    find_band(pool, id)
        .await?
        .ok_or_else(|| ApiError::Internal(format!("Band {} vanished after insert", id)))
}

pub async fn find_band(pool: &SqlitePool, id: i64) -> ApiResult<Option<MusicBand>> {
    let row: Option<BandRow> =
        sqlx::query_as(&format!("SELECT {} FROM music_band WHERE id = ?", COLUMNS))
            .bind(id)
            .fetch_optional(pool)
            .await?;

    row.map(MusicBand::try_from).transpose()
}

pub async fn band_exists(pool: &SqlitePool, id: i64) -> ApiResult<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM music_band WHERE id = ?)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

/// Replace every mutable column; `id` and `creation_date` are kept
///
/// Returns false when no band has this id.
pub async fn update_band(pool: &SqlitePool, id: i64, band: &NewBand) -> ApiResult<bool> {
    let result = sqlx::query(
        "UPDATE music_band SET
            name = ?, coordinate_x = ?, coordinate_y = ?, number_of_participants = ?,
            singles_count = ?, albums_count = ?, genre = ?, label_sales = ?
         WHERE id = ?",
    )
    .bind(&band.name)
    .bind(band.coordinates.x)
    .bind(band.coordinates.y)
    .bind(band.number_of_participants)
    .bind(band.singles_count)
    .bind(band.albums_count)
    .bind(band.genre.as_str())
    .bind(band.label.map(|l| l.sales))
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Returns false when no band has this id
pub async fn delete_band(pool: &SqlitePool, id: i64) -> ApiResult<bool> {
    let result = sqlx::query("DELETE FROM music_band WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_by_singles_count(pool: &SqlitePool, singles_count: i64) -> ApiResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM music_band WHERE singles_count = ?")
        .bind(singles_count)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Bands without a singles count never match
pub async fn count_by_singles_count_greater_than(
    pool: &SqlitePool,
    singles_count: i64,
) -> ApiResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM music_band WHERE singles_count > ?")
        .bind(singles_count)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Case-sensitive substring match on the name, ordered by id
pub async fn find_by_name_containing(
    pool: &SqlitePool,
    needle: &str,
    request: PageRequest,
) -> ApiResult<Page<MusicBand>> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM music_band WHERE instr(name, ?) > 0")
        .bind(needle)
        .fetch_one(pool)
        .await?;

    let rows: Vec<BandRow> = sqlx::query_as(&format!(
        "SELECT {} FROM music_band WHERE instr(name, ?) > 0 ORDER BY id ASC LIMIT ? OFFSET ?",
        COLUMNS
    ))
    .bind(needle)
    .bind(request.size)
    .bind(request.offset())
    .fetch_all(pool)
    .await?;

    Ok(Page::new(into_bands(rows)?, request, total))
}

/// Criteria search
pub async fn find_by_filter(
    pool: &SqlitePool,
    filter: &BandFilter,
    sort: SortOrder,
    request: PageRequest,
) -> ApiResult<Page<MusicBand>> {
    let mut count_query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM music_band");
    filter.push_where(&mut count_query);
    let total: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    let mut query: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {} FROM music_band", COLUMNS));
    filter.push_where(&mut query);
    sort.push_order_by(&mut query);
    query
        .push(" LIMIT ")
        .push_bind(request.size)
        .push(" OFFSET ")
        .push_bind(request.offset());

    let rows: Vec<BandRow> = query.build_query_as().fetch_all(pool).await?;

    Ok(Page::new(into_bands(rows)?, request, total))
}

/// Add one single, treating a missing count as zero
///
/// Returns false when no band has this id or the count is already at
/// `i64::MAX`; SQLite would otherwise store the overflowed sum as REAL.
pub async fn increment_singles(pool: &SqlitePool, id: i64) -> ApiResult<bool> {
    let result = sqlx::query(
        "UPDATE music_band SET singles_count = COALESCE(singles_count, 0) + 1
         WHERE id = ? AND COALESCE(singles_count, 0) < ?",
    )
    .bind(id)
    .bind(i64::MAX)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Remove one participant if more than one remains
///
/// Returns false when the band is missing or already at one participant;
/// the check and the write happen in one statement.
pub async fn decrement_participants(pool: &SqlitePool, id: i64) -> ApiResult<bool> {
    let result = sqlx::query(
        "UPDATE music_band SET number_of_participants = number_of_participants - 1
         WHERE id = ? AND number_of_participants > 1",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
