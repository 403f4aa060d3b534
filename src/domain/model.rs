use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::GymError;

/// On-disk layout of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Header row followed by one record per line.
    Csv,
    /// Pretty-printed JSON list of objects.
    Json,
}

/// A record type persisted as a whole collection in a single flat file.
///
/// `FIELDS` is the fixed schema: the CSV header, in serialization order.
pub trait Entity: Serialize + DeserializeOwned {
    const KIND: &'static str;
    const FORMAT: FileFormat;
    const FIELDS: &'static [&'static str];
}

/// Entities that carry their own assigned identifier.
pub trait Identified: Entity {
    fn id(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriptionType {
    #[serde(rename = "Mensual")]
    Monthly,
    #[serde(rename = "Anual")]
    Annual,
}

impl SubscriptionType {
    pub const ALL: [SubscriptionType; 2] = [SubscriptionType::Monthly, SubscriptionType::Annual];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionType::Monthly => "Mensual",
            SubscriptionType::Annual => "Anual",
        }
    }
}

impl fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionType {
    type Err = GymError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubscriptionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                GymError::validation(
                    "subscription_type",
                    s,
                    format!(
                        "Subscription type must be one of: {}",
                        SubscriptionType::ALL.map(|t| t.as_str()).join(", ")
                    ),
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "member_id")]
    pub id: String,
    pub name: String,
    pub subscription_type: SubscriptionType,
}

impl Entity for Member {
    const KIND: &'static str = "member";
    const FORMAT: FileFormat = FileFormat::Csv;
    const FIELDS: &'static [&'static str] = &["member_id", "name", "subscription_type"];
}

impl Identified for Member {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    #[serde(rename = "class_id")]
    pub id: String,
    pub name: String,
    pub instructor: String,
    pub capacity: u32,
}

impl Entity for Class {
    const KIND: &'static str = "class";
    const FORMAT: FileFormat = FileFormat::Csv;
    const FIELDS: &'static [&'static str] = &["class_id", "name", "instructor", "capacity"];
}

impl Identified for Class {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enrollment {
    pub member_id: String,
    pub class_id: String,
}

impl Enrollment {
    pub fn new(member_id: impl Into<String>, class_id: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
            class_id: class_id.into(),
        }
    }

    pub fn matches(&self, member_id: &str, class_id: &str) -> bool {
        self.member_id == member_id && self.class_id == class_id
    }
}

impl Entity for Enrollment {
    const KIND: &'static str = "enrollment";
    const FORMAT: FileFormat = FileFormat::Json;
    const FIELDS: &'static [&'static str] = &["member_id", "class_id"];
}

/// Partial update of a member. `None` leaves the field untouched.
///
/// The subscription type is kept as raw text so that validation happens
/// inside the registry, together with the lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub subscription_type: Option<String>,
}

impl MemberUpdate {
    /// Builds an update from loose key/value pairs, keeping only schema keys.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut update = MemberUpdate::default();
        for (key, value) in fields {
            match key.as_ref() {
                "name" => update.name = Some(value.into()),
                "subscription_type" => update.subscription_type = Some(value.into()),
                other => tracing::debug!("Ignoring unknown member field '{}'", other),
            }
        }
        update
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.subscription_type.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassUpdate {
    pub name: Option<String>,
    pub instructor: Option<String>,
    pub capacity: Option<i64>,
}

impl ClassUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.instructor.is_none() && self.capacity.is_none()
    }
}

/// Result of an enrollment attempt that did not fail at the storage level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentOutcome {
    Enrolled { member_id: String, class_name: String },
    ClassNotFound { class_id: String },
    MemberNotFound { member_id: String },
    AlreadyEnrolled { member_id: String, class_name: String },
    CapacityReached { class_name: String, capacity: u32 },
}

impl EnrollmentOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, EnrollmentOutcome::Enrolled { .. })
    }
}

impl fmt::Display for EnrollmentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnrollmentOutcome::Enrolled {
                member_id,
                class_name,
            } => write!(f, "Member {} enrolled in class '{}'.", member_id, class_name),
            EnrollmentOutcome::ClassNotFound { class_id } => {
                write!(f, "Class with ID '{}' not found.", class_id)
            }
            EnrollmentOutcome::MemberNotFound { member_id } => {
                write!(f, "Member with ID '{}' not found.", member_id)
            }
            EnrollmentOutcome::AlreadyEnrolled {
                member_id,
                class_name,
            } => write!(
                f,
                "Member '{}' is already enrolled in class '{}'.",
                member_id, class_name
            ),
            EnrollmentOutcome::CapacityReached {
                class_name,
                capacity,
            } => write!(
                f,
                "Class '{}' has reached its maximum capacity ({}).",
                class_name, capacity
            ),
        }
    }
}

/// One line of the available-capacity view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityRow {
    pub class: Class,
    pub enrolled: usize,
    pub available: u32,
}
