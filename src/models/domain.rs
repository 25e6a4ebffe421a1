use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A numeric attribute as it is stored and transmitted
///
/// Coordinates, radii and amounts arrive either as JSON numbers or as exact
/// decimal strings. The original text is kept as-is; parsing to `f64` only
/// happens at the point of use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(serde_json::Number),
    Text(String),
    Other(Value),
}

impl Numeric {
    /// Parse as a real number; text such as `"Infinity"` or `"NaN"` is kept as-is
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Numeric::Number(n) => n.as_f64(),
            Numeric::Text(s) => s.trim().parse::<f64>().ok(),
            Numeric::Other(_) => None,
        }
    }

    /// Parse as a finite real number, `None` for anything else
    pub fn as_finite_f64(&self) -> Option<f64> {
        self.as_f64().filter(|v| v.is_finite())
    }

    /// Decimal text of the value, used for exact (non-float) arithmetic
    pub fn as_decimal_text(&self) -> Option<String> {
        match self {
            Numeric::Number(n) => Some(n.to_string()),
            Numeric::Text(s) => Some(s.trim().to_string()),
            Numeric::Other(_) => None,
        }
    }

    /// Build a JSON number from decimal text, falling back to the text itself
    pub fn from_decimal_text(text: &str) -> Self {
        match text.parse::<serde_json::Number>() {
            Ok(n) => Numeric::Number(n),
            Err(_) => Numeric::Text(text.to_string()),
        }
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(Numeric::Number)
            .unwrap_or_else(|| Numeric::Text(value.to_string()))
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Numeric::Number(value.into())
    }
}

/// Geotagged social feed post (`SocialFeedPosts`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "PostID")]
    pub post_id: String,
    #[serde(rename = "UserID", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "UserName", default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(rename = "Author", default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(rename = "Content", default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "Tags", default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    #[serde(rename = "Latitude", default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Numeric>,
    #[serde(rename = "Longitude", default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Numeric>,
    #[serde(rename = "GeofenceRadius", default, skip_serializing_if = "Option::is_none")]
    pub geofence_radius: Option<Numeric>,
    #[serde(rename = "GeofenceID", default, skip_serializing_if = "Option::is_none")]
    pub geofence_id: Option<String>,
    #[serde(rename = "CreatedAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "Likes", default, deserialize_with = "lenient_count")]
    pub likes: i64,
}

// Stored posts are written by several clients. Only the coordinates decide
// whether a post is shown, so other attributes fall back to defaults instead
// of failing the whole record.

fn lenient_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(tag) => Some(tag),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Numeric::deserialize(deserializer)?;
    Ok(match &value {
        Numeric::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        _ => value.as_finite_f64().map(|f| f as i64),
    }
    .unwrap_or(0))
}

impl Post {
    /// Post location as `(latitude, longitude)`, `None` if either is missing or not finite
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.latitude.as_ref()?.as_finite_f64()?;
        let lon = self.longitude.as_ref()?.as_finite_f64()?;
        Some((lat, lon))
    }

    /// Visibility radius in meters, 0 when absent or unparsable
    ///
    /// An infinite radius is kept, so the post is visible everywhere. `NaN`
    /// compares false against every distance and is never visible.
    pub fn geofence_radius_m(&self) -> f64 {
        self.geofence_radius
            .as_ref()
            .and_then(Numeric::as_f64)
            .unwrap_or(0.0)
    }
}

/// Comment on a post (`SocialFeedComments`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "CommentID")]
    pub comment_id: String,
    #[serde(rename = "PostID")]
    pub post_id: String,
    #[serde(rename = "UserID")]
    pub user_id: String,
    #[serde(rename = "Content")]
    pub content: String,
    #[serde(rename = "CreatedAt")]
    pub created_at: String,
}

/// User record (`UserDetails`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "UserID")]
    pub user_id: String,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Email", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "AreaOfStudy", default, skip_serializing_if = "Option::is_none")]
    pub area_of_study: Option<String>,
    #[serde(rename = "College", default, skip_serializing_if = "Option::is_none")]
    pub college: Option<String>,
    #[serde(rename = "CreatedAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "DoNotDisturb", default)]
    pub do_not_disturb: bool,
    #[serde(rename = "HouseholdID", default)]
    pub household_id: Option<String>,
    #[serde(rename = "Latitude", default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Numeric>,
    #[serde(rename = "Longitude", default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Numeric>,
    #[serde(rename = "PhoneNumber", default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(rename = "Bio", default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Household record (`Households`), tasks are embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Household {
    #[serde(rename = "HouseholdID")]
    pub household_id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "JoinCode", default)]
    pub join_code: String,
    #[serde(rename = "CreatedAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "Admins", default)]
    pub admins: Vec<String>,
    #[serde(rename = "Members", default)]
    pub members: Vec<String>,
    #[serde(rename = "Tasks", default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
}

/// Cleaning rota task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "TaskID")]
    pub task_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "AssignedTo", default)]
    pub assigned_to: Option<String>,
    #[serde(rename = "Frequency", default)]
    pub frequency: Option<String>,
    #[serde(rename = "DueDate", default)]
    pub due_date: Option<String>,
    #[serde(rename = "Completed", default)]
    pub completed: bool,
}

/// Shopping list (`ShoppingLists`, keyed by household then list)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    #[serde(rename = "ListID", default)]
    pub list_id: String,
    #[serde(rename = "HouseholdID", default)]
    pub household_id: String,
    #[serde(rename = "Title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "Products", default)]
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "ProductID", default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Purchased", default)]
    pub purchased: bool,
}

/// Shared bill (`Bills`, keyed by household then bill)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    #[serde(rename = "BillID", default)]
    pub bill_id: String,
    #[serde(rename = "HouseholdID", default)]
    pub household_id: String,
    #[serde(rename = "Title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "TotalAmount", default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Numeric>,
    #[serde(rename = "DueBy", default, skip_serializing_if = "Option::is_none")]
    pub due_by: Option<String>,
    #[serde(rename = "Members", default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
    #[serde(rename = "PaidMembers", default, skip_serializing_if = "Option::is_none")]
    pub paid_members: Option<Vec<String>>,
    #[serde(rename = "Splits", default, skip_serializing_if = "Option::is_none")]
    pub splits: Option<Vec<Split>>,
    #[serde(rename = "ImageURL", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// One member's share of a bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    #[serde(rename = "UserID")]
    pub user_id: String,
    #[serde(rename = "Share")]
    pub share: Numeric,
    #[serde(rename = "Paid", default)]
    pub paid: bool,
}

/// Noticeboard entry (`HouseholdNotices`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    #[serde(rename = "NoticeID", default)]
    pub notice_id: String,
    #[serde(rename = "HouseholdID", default)]
    pub household_id: String,
    #[serde(rename = "Title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "Content", default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "CreatedBy", default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(rename = "CreatedAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Shared space reservation (`ReservedSpaces`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(rename = "ReservationID", default)]
    pub reservation_id: String,
    #[serde(rename = "HouseholdID", default)]
    pub household_id: String,
    #[serde(rename = "SpaceName", default, skip_serializing_if = "Option::is_none")]
    pub space_name: Option<String>,
    #[serde(rename = "ReservedBy", default, skip_serializing_if = "Option::is_none")]
    pub reserved_by: Option<String>,
    #[serde(rename = "Purpose", default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(rename = "StartTime", default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(rename = "EndTime", default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(rename = "ApprovalStatus", default, skip_serializing_if = "Option::is_none")]
    pub approval_status: Option<ApprovalStatus>,
    #[serde(rename = "Approvers", default, skip_serializing_if = "Option::is_none")]
    pub approvers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// Current UTC time as an ISO-8601 string, sortable lexicographically
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
