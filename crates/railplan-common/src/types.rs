use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};

/// Number of physical tracks in the yard.
pub const RAIL_COUNT: u8 = 3;

/// Prefix of generated train identifiers (`TRN-001`).
pub const TRAIN_CODE_PREFIX: &str = "TRN-";

/// Default alert delay threshold in minutes.
pub const DEFAULT_DELAY_MIN: i32 = 60;

/// Default alert-type filter.
pub const DEFAULT_ALERT_TYPES: &str = "all";

/// One of the three yard tracks, numbered from 1.
///
/// # Examples
///
/// ```
/// use railplan_common::types::Rail;
///
/// let rail = Rail::try_from(2).unwrap();
/// assert_eq!(rail.number(), 2);
/// assert!(Rail::try_from(0).is_err());
/// assert!(Rail::try_from(4).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, utoipa::ToSchema)]
#[serde(into = "i64")]
#[schema(value_type = u8)]
pub struct Rail(u8);

impl Rail {
    pub fn number(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rail {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(n) if (1..=RAIL_COUNT).contains(&n) => Ok(Rail(n)),
            _ => Err(format!("rail must be between 1 and {RAIL_COUNT}, got {value}")),
        }
    }
}

impl From<Rail> for i64 {
    fn from(rail: Rail) -> Self {
        i64::from(rail.0)
    }
}

impl std::fmt::Display for Rail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Rail {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: i64 = s
            .trim()
            .parse()
            .map_err(|_| format!("invalid rail: {s}"))?;
        Rail::try_from(n)
    }
}

impl<'de> Deserialize<'de> for Rail {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let n = deserialize_int_input(deserializer)?;
        Rail::try_from(n).map_err(DeError::custom)
    }
}

/// Lifecycle label of a train record.
///
/// # Examples
///
/// ```
/// use railplan_common::types::TrainStatus;
///
/// let status: TrainStatus = "en-route".parse().unwrap();
/// assert_eq!(status, TrainStatus::EnRoute);
/// assert_eq!(status.to_string(), "en-route");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum TrainStatus {
    #[default]
    Scheduled,
    EnRoute,
    Arrived,
    Alert,
}

impl TrainStatus {
    pub const ALL: [TrainStatus; 4] = [
        TrainStatus::Scheduled,
        TrainStatus::EnRoute,
        TrainStatus::Arrived,
        TrainStatus::Alert,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TrainStatus::Scheduled => "scheduled",
            TrainStatus::EnRoute => "en-route",
            TrainStatus::Arrived => "arrived",
            TrainStatus::Alert => "alert",
        }
    }
}

impl std::fmt::Display for TrainStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TrainStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" => Ok(TrainStatus::Scheduled),
            "en-route" | "en_route" => Ok(TrainStatus::EnRoute),
            "arrived" => Ok(TrainStatus::Arrived),
            "alert" => Ok(TrainStatus::Alert),
            _ => Err(format!("unknown train status: {s}")),
        }
    }
}

/// Format a sequence number as a train identifier.
///
/// # Examples
///
/// ```
/// use railplan_common::types::format_train_code;
///
/// assert_eq!(format_train_code(7), "TRN-007");
/// assert_eq!(format_train_code(1234), "TRN-1234");
/// ```
pub fn format_train_code(seq: u64) -> String {
    format!("{TRAIN_CODE_PREFIX}{seq:03}")
}

/// A train movement as exposed by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Train {
    /// Database row id
    pub id: i64,
    /// Sequential identifier (`TRN-NNN`)
    pub train_id: String,
    pub rail: Rail,
    pub cargo: String,
    /// Tonnage in metric tons
    pub tonnage: i64,
    pub client: String,
    /// Departure (local time)
    #[serde(with = "crate::datetime")]
    #[schema(value_type = String, example = "2025-02-18T06:00:00")]
    pub depart: NaiveDateTime,
    /// Arrival (local time)
    #[serde(with = "crate::datetime")]
    #[schema(value_type = String, example = "2025-02-18T14:30:00")]
    pub arrivee: NaiveDateTime,
    pub status: TrainStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateTrainRequest {
    pub rail: Rail,
    pub cargo: String,
    #[serde(deserialize_with = "deserialize_i64_input")]
    #[schema(value_type = i64)]
    pub tonnage: i64,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(with = "crate::datetime")]
    #[schema(value_type = String, example = "2025-02-18T06:00")]
    pub depart: NaiveDateTime,
    #[serde(with = "crate::datetime")]
    #[schema(value_type = String, example = "2025-02-18T14:30")]
    pub arrivee: NaiveDateTime,
    #[serde(default)]
    pub status: Option<TrainStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateTrainRequest {
    #[serde(default)]
    pub rail: Option<Rail>,
    #[serde(default)]
    pub cargo: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64_input")]
    #[schema(value_type = Option<i64>)]
    pub tonnage: Option<i64>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default, with = "crate::datetime::option")]
    #[schema(value_type = Option<String>)]
    pub depart: Option<NaiveDateTime>,
    #[serde(default, with = "crate::datetime::option")]
    #[schema(value_type = Option<String>)]
    pub arrivee: Option<NaiveDateTime>,
    #[serde(default)]
    pub status: Option<TrainStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl UpdateTrainRequest {
    pub fn is_empty(&self) -> bool {
        self.rail.is_none()
            && self.cargo.is_none()
            && self.tonnage.is_none()
            && self.client.is_none()
            && self.depart.is_none()
            && self.arrivee.is_none()
            && self.status.is_none()
            && self.notes.is_none()
    }
}

/// Singleton notification settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AlertConfig {
    /// Row id, `None` until the configuration is first saved
    pub id: Option<i64>,
    pub email: String,
    pub delay_min: i32,
    pub alert_types: String,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            id: None,
            email: String::new(),
            delay_min: DEFAULT_DELAY_MIN,
            alert_types: DEFAULT_ALERT_TYPES.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SaveAlertConfigRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_delay_min", deserialize_with = "deserialize_i64_input")]
    #[schema(value_type = i32, default = 60)]
    pub delay_min: i64,
    #[serde(default = "default_alert_types")]
    pub alert_types: String,
}

fn default_delay_min() -> i64 {
    i64::from(DEFAULT_DELAY_MIN)
}

fn default_alert_types() -> String {
    DEFAULT_ALERT_TYPES.to_string()
}

/// Check field-level consistency of a train record.
///
/// # Examples
///
/// ```
/// use railplan_common::datetime::parse_local;
/// use railplan_common::types::validate_train;
///
/// let dep = parse_local("2025-02-18T06:00").unwrap();
/// let arr = parse_local("2025-02-18T14:30").unwrap();
/// assert!(validate_train(1800, &dep, &arr).is_ok());
/// assert!(validate_train(0, &dep, &arr).is_err());
/// assert!(validate_train(1800, &arr, &dep).is_err());
/// ```
pub fn validate_train(
    tonnage: i64,
    depart: &NaiveDateTime,
    arrivee: &NaiveDateTime,
) -> Result<(), String> {
    if tonnage <= 0 {
        return Err(format!("tonnage must be positive, got {tonnage}"));
    }
    if arrivee < depart {
        return Err("arrival must not precede departure".to_string());
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntInput {
    Number(i64),
    Text(String),
}

fn deserialize_int_input<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match IntInput::deserialize(deserializer)? {
        IntInput::Number(n) => Ok(n),
        IntInput::Text(text) => text.trim().parse::<i64>().map_err(DeError::custom),
    }
}

/// Accepts `1800` as well as `"1800"`, since HTML forms post strings.
pub fn deserialize_i64_input<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_int_input(deserializer)
}

pub fn deserialize_optional_i64_input<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IntInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntInput::Number(n)) => Ok(Some(n)),
        Some(IntInput::Text(text)) => text.trim().parse::<i64>().map(Some).map_err(DeError::custom),
    }
}
