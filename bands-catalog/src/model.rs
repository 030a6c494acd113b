//! Music band entity and its XML request/response shapes

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use validator::{Validate, ValidationError};

use crate::pagination::Page;

/// Upper bound on participants accepted by create and update
pub const MAX_PARTICIPANTS: i64 = 100;

/// Music genre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MusicGenre {
    ProgressiveRock,
    HipHop,
    PunkRock,
}

impl MusicGenre {
    pub const ALL: [MusicGenre; 3] = [
        MusicGenre::ProgressiveRock,
        MusicGenre::HipHop,
        MusicGenre::PunkRock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MusicGenre::ProgressiveRock => "PROGRESSIVE_ROCK",
            MusicGenre::HipHop => "HIP_HOP",
            MusicGenre::PunkRock => "PUNK_ROCK",
        }
    }
}

impl fmt::Display for MusicGenre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MusicGenre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        MusicGenre::ALL
            .into_iter()
            .find(|genre| genre.as_str() == s)
            .ok_or_else(|| format!("Unknown music genre: {}", s))
    }
}

impl Serialize for MusicGenre {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MusicGenre {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub sales: i64,
}

/// Stored band
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "musicBand", rename_all = "camelCase")]
pub struct MusicBand {
    pub id: i64,
    pub name: String,
    pub coordinates: Coordinates,
    pub creation_date: DateTime<Utc>,
    pub number_of_participants: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub singles_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub albums_count: Option<i64>,
    pub genre: MusicGenre,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
}

/// Validated band fields, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBand {
    pub name: String,
    pub coordinates: Coordinates,
    pub number_of_participants: i64,
    pub singles_count: Option<i64>,
    pub albums_count: Option<i64>,
    pub genre: MusicGenre,
    pub label: Option<Label>,
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn name_not_blank(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(validation_error("blank", "name must not be blank"));
    }
    Ok(())
}

fn value_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(validation_error("blank", "search substring must not be blank"));
    }
    Ok(())
}

fn known_genre(genre: &str) -> Result<(), ValidationError> {
    genre
        .parse::<MusicGenre>()
        .map(|_| ())
        .map_err(|_| {
            validation_error(
                "genre",
                "musicGenre must be one of PROGRESSIVE_ROCK, HIP_HOP, PUNK_ROCK",
            )
        })
}

/// Optional integer element; empty text such as `<y></y>` reads as absent
fn optional_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(text) if text.trim().is_empty() => Ok(None),
        Some(text) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid integer: {:?}", text))),
    }
}

fn coordinates_present(coordinates: &CoordinatesRequest) -> Result<(), ValidationError> {
    if coordinates.x.is_none() {
        return Err(validation_error("required", "coordinates.x must not be null"));
    }
    Ok(())
}

fn label_sales_positive(label: &LabelRequest) -> Result<(), ValidationError> {
    match label.sales {
        Some(sales) if sales < 1 => Err(validation_error("range", "label.sales must be at least 1")),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatesRequest {
    #[serde(default, deserialize_with = "optional_number")]
    pub x: Option<i64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub y: Option<i64>,
}

/// `<label>`; other children such as `<name>` are ignored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelRequest {
    #[serde(default, deserialize_with = "optional_number")]
    pub sales: Option<i64>,
}

/// `<bandRequest>` body of create and update
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename = "bandRequest", rename_all = "camelCase")]
pub struct BandRequest {
    #[validate(required(message = "name must not be blank"), custom = "name_not_blank")]
    pub name: Option<String>,

    #[serde(default)]
    #[validate(custom = "coordinates_present")]
    pub coordinates: CoordinatesRequest,

    #[validate(
        required(message = "numberOfParticipants must not be null"),
        range(min = 1, message = "numberOfParticipants must be at least 1")
    )]
    #[serde(default, deserialize_with = "optional_number")]
    pub number_of_participants: Option<i64>,

    #[validate(range(min = 1, message = "singlesCount must be at least 1"))]
    #[serde(default, deserialize_with = "optional_number")]
    pub singles_count: Option<i64>,

    #[validate(range(min = 1, message = "albumsCount must be at least 1"))]
    #[serde(default, deserialize_with = "optional_number")]
    pub albums_count: Option<i64>,

    #[validate(required(message = "musicGenre must not be null"), custom = "known_genre")]
    pub music_genre: Option<String>,

    #[validate(custom = "label_sales_positive")]
    pub label: Option<LabelRequest>,
}

impl BandRequest {
    /// Convert a request that already passed `validate()`
    ///
    /// Returns the first missing field name if called on an unvalidated
    /// request.
    pub fn into_new_band(self) -> Result<NewBand, &'static str> {
        let name = self.name.ok_or("name")?;
        let x = self.coordinates.x.ok_or("coordinates.x")?;
        let number_of_participants = self.number_of_participants.ok_or("numberOfParticipants")?;
        let genre = self
            .music_genre
            .as_deref()
            .and_then(|g| g.parse().ok())
            .ok_or("musicGenre")?;

        Ok(NewBand {
            name: name.trim().to_string(),
            coordinates: Coordinates {
                x,
                y: self.coordinates.y.unwrap_or(0),
            },
            number_of_participants,
            singles_count: self.singles_count,
            albums_count: self.albums_count,
            genre,
            // <label/> without sales means no label
            label: self.label.and_then(|l| l.sales).map(|sales| Label { sales }),
        })
    }
}

/// `<bandSearchRequest>` body of the criteria search
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename = "bandSearchRequest", rename_all = "camelCase", default)]
pub struct BandSearchRequest {
    pub sort: Option<String>,
    pub name: Option<String>,
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "optional_number")]
    pub number_of_participants: Option<i64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub singles_count: Option<i64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub albums_count: Option<i64>,
}

/// `<substring>` body of the name search
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename = "substring")]
pub struct SubstringRequest {
    #[validate(required(message = "search substring must not be blank"), custom = "value_not_blank")]
    pub value: Option<String>,
}

/// `<count>` response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "count")]
pub struct CountResponse {
    pub value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub page: i64,
    pub total_pages: i64,
    pub total_count: i64,
    pub size: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandList {
    #[serde(default)]
    pub band: Vec<MusicBand>,
}

/// `<response>` of both paginated searches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "response")]
pub struct BandPageResponse {
    pub pagination: PaginationInfo,
    #[serde(default)]
    pub bands: BandList,
}

impl From<Page<MusicBand>> for BandPageResponse {
    fn from(page: Page<MusicBand>) -> Self {
        Self {
            pagination: PaginationInfo {
                page: page.page,
                total_pages: page.total_pages,
                total_count: page.total_count,
                size: page.size,
            },
            bands: BandList { band: page.items },
        }
    }
}
