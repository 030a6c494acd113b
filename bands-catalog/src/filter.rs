//! Criteria search: predicate builder and sort parsing
//!
//! A [`BandFilter`] is a conjunction of predicates, one per filter field
//! present in the search request. Absent fields add nothing, so an empty
//! request matches every band. Values are always bound as parameters; only
//! allow-listed column names are ever written into the SQL text.

use sqlx::{QueryBuilder, Sqlite};

use crate::error::ApiError;
use crate::model::{BandSearchRequest, MusicGenre, MAX_PARTICIPANTS};

/// Fields a search may be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    CreationDate,
    NumberOfParticipants,
    SinglesCount,
    AlbumsCount,
}

impl SortField {
    pub const ALLOWED: [SortField; 6] = [
        SortField::Id,
        SortField::Name,
        SortField::CreationDate,
        SortField::NumberOfParticipants,
        SortField::SinglesCount,
        SortField::AlbumsCount,
    ];

    /// Name used in the `sort` parameter
    pub fn api_name(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::CreationDate => "creationDate",
            SortField::NumberOfParticipants => "numberOfParticipants",
            SortField::SinglesCount => "singlesCount",
            SortField::AlbumsCount => "albumsCount",
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::CreationDate => "creation_date",
            SortField::NumberOfParticipants => "number_of_participants",
            SortField::SinglesCount => "singles_count",
            SortField::AlbumsCount => "albums_count",
        }
    }

    pub fn from_api_name(name: &str) -> Option<Self> {
        Self::ALLOWED.into_iter().find(|f| f.api_name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// Parsed `sort` expression; `None` means unsorted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortOrder(pub Option<(SortField, Direction)>);

impl SortOrder {
    /// Parse `field[,direction][;ignored...]`
    ///
    /// Only the first `;` separated clause is used. The direction is
    /// descending when it reads `desc` in any case, ascending otherwise.
    pub fn parse(expr: Option<&str>) -> Result<Self, ApiError> {
        let Some(expr) = expr.map(str::trim).filter(|e| !e.is_empty()) else {
            return Ok(SortOrder(None));
        };

        let clause = expr.split(';').next().unwrap_or_default();
        let mut parts = clause.split(',').map(str::trim);
        let field_name = parts.next().unwrap_or_default();

        let field = SortField::from_api_name(field_name).ok_or_else(|| {
            ApiError::BadRequest(format!("Sort field '{}' is not allowed", field_name))
        })?;

        let direction = match parts.next() {
            Some(dir) if dir.eq_ignore_ascii_case("desc") => Direction::Desc,
            _ => Direction::Asc,
        };

        Ok(SortOrder(Some((field, direction))))
    }

    /// Append `ORDER BY`, always ending with `id` so pages are stable
    pub fn push_order_by(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self.0 {
            Some((SortField::Id, direction)) => {
                qb.push(" ORDER BY id ").push(direction.sql());
            }
            Some((field, direction)) => {
                qb.push(" ORDER BY ")
                    .push(field.column())
                    .push(" ")
                    .push(direction.sql())
                    .push(", id ASC");
            }
            None => {
                qb.push(" ORDER BY id ASC");
            }
        }
    }
}

/// Single filter condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive substring of the name
    NameContains(String),
    Genre(MusicGenre),
    NumberOfParticipants(i64),
    SinglesCount(i64),
    AlbumsCount(i64),
}

/// Escape LIKE wildcards so the needle matches literally
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl Predicate {
    fn push_sql(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            Predicate::NameContains(needle) => {
                qb.push("lower(name) LIKE ")
                    .push_bind(like_pattern(&needle.to_lowercase()))
                    .push(" ESCAPE '\\'");
            }
            Predicate::Genre(genre) => {
                qb.push("genre = ").push_bind(genre.as_str());
            }
            Predicate::NumberOfParticipants(n) => {
                qb.push("number_of_participants = ").push_bind(*n);
            }
            Predicate::SinglesCount(n) => {
                qb.push("singles_count = ").push_bind(*n);
            }
            Predicate::AlbumsCount(n) => {
                qb.push("albums_count = ").push_bind(*n);
            }
        }
    }
}

/// Conjunction of predicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BandFilter {
    pub predicates: Vec<Predicate>,
}

impl BandFilter {
    /// Build from a search request, skipping absent and blank fields
    ///
    /// A participant count above the allowed maximum can never match and
    /// is rejected as unprocessable.
    pub fn from_request(request: &BandSearchRequest) -> Result<Self, ApiError> {
        let mut predicates = Vec::new();

        if let Some(name) = request.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            predicates.push(Predicate::NameContains(name.to_string()));
        }

        if let Some(genre) = request.genre.as_deref().map(str::trim).filter(|g| !g.is_empty()) {
            let genre = genre
                .parse::<MusicGenre>()
                .map_err(|_| ApiError::invalid_parameter("genre", genre))?;
            predicates.push(Predicate::Genre(genre));
        }

        if let Some(n) = request.number_of_participants {
            if n > MAX_PARTICIPANTS {
                return Err(ApiError::Unprocessable(format!(
                    "Cannot filter by {} participants: the maximum is {}",
                    n, MAX_PARTICIPANTS
                )));
            }
            predicates.push(Predicate::NumberOfParticipants(n));
        }

        if let Some(n) = request.singles_count {
            predicates.push(Predicate::SinglesCount(n));
        }

        if let Some(n) = request.albums_count {
            predicates.push(Predicate::AlbumsCount(n));
        }

        Ok(Self { predicates })
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Append ` WHERE p1 AND p2 ...`; nothing for an empty filter
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        let mut separator = " WHERE ";
        for predicate in &self.predicates {
            qb.push(separator);
            predicate.push_sql(qb);
            separator = " AND ";
        }
    }
}
