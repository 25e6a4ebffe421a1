use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{Numeric, Reservation, User};

/// Query string of the proximity feed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedQuery {
    #[serde(rename = "Latitude")]
    pub latitude: Option<String>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<String>,
}

/// `?HouseholdID=` selector shared by the household-scoped collections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HouseholdQuery {
    #[serde(rename = "HouseholdID")]
    pub household_id: Option<String>,
    #[serde(rename = "UserID")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "UserID", default)]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(rename = "Content", default)]
    pub content: String,
    #[serde(rename = "Latitude")]
    pub latitude: Option<Numeric>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<Numeric>,
    #[serde(rename = "Tags", default)]
    pub tags: Vec<String>,
    #[serde(rename = "GeofenceRadius")]
    pub geofence_radius: Option<Numeric>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeletePostRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "PostID", default)]
    pub post_id: String,
    #[validate(length(min = 1))]
    #[serde(rename = "UserID", default)]
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LikePostRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "PostID", default)]
    pub post_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "PostID", default)]
    pub post_id: String,
    #[validate(length(min = 1))]
    #[serde(rename = "UserID", default)]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(rename = "Content", default)]
    pub content: String,
}

/// New user, accepting both sign-up attribute names and record field names
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "UserID", alias = "sub", default)]
    pub user_id: String,
    #[serde(rename = "Name", alias = "name")]
    pub name: Option<String>,
    #[serde(rename = "Email", alias = "email")]
    pub email: Option<String>,
    #[serde(rename = "AreaOfStudy", alias = "custom:AreaOfStudy")]
    pub area_of_study: Option<String>,
    #[serde(rename = "College", alias = "custom:College")]
    pub college: Option<String>,
    #[serde(rename = "Latitude", alias = "custom:Latitude")]
    pub latitude: Option<Numeric>,
    #[serde(rename = "Longitude", alias = "custom:Longitude")]
    pub longitude: Option<Numeric>,
}

/// Partial update of a user record
///
/// Only the fields named here can be changed; anything else in the body is
/// rejected instead of being written through.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "UserID")]
    pub user_id: String,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[validate(email)]
    #[serde(rename = "Email")]
    pub email: Option<String>,
    #[serde(rename = "AreaOfStudy")]
    pub area_of_study: Option<String>,
    #[serde(rename = "College")]
    pub college: Option<String>,
    #[serde(rename = "DoNotDisturb")]
    pub do_not_disturb: Option<bool>,
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
    #[serde(rename = "PhoneNumber")]
    pub phone_number: Option<String>,
    #[serde(rename = "Bio")]
    pub bio: Option<String>,
}

impl UpdateUserRequest {
    /// Whether the request carries at least one field to change
    pub fn has_changes(&self) -> bool {
        self.name.is_some()
            || self.email.is_some()
            || self.area_of_study.is_some()
            || self.college.is_some()
            || self.do_not_disturb.is_some()
            || self.latitude.is_some()
            || self.longitude.is_some()
            || self.phone_number.is_some()
            || self.bio.is_some()
    }

    /// Apply the present fields to a stored user
    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = Some(name.clone());
        }
        if let Some(email) = &self.email {
            user.email = Some(email.clone());
        }
        if let Some(area) = &self.area_of_study {
            user.area_of_study = Some(area.clone());
        }
        if let Some(college) = &self.college {
            user.college = Some(college.clone());
        }
        if let Some(dnd) = self.do_not_disturb {
            user.do_not_disturb = dnd;
        }
        if let Some(lat) = self.latitude {
            user.latitude = Some(Numeric::from(lat));
        }
        if let Some(lon) = self.longitude {
            user.longitude = Some(Numeric::from(lon));
        }
        if let Some(phone) = &self.phone_number {
            user.phone_number = Some(phone.clone());
        }
        if let Some(bio) = &self.bio {
            user.bio = Some(bio.clone());
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateHouseholdRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "HouseholdName", default)]
    pub household_name: String,
    #[serde(rename = "UserID")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "HouseholdID", default)]
    pub household_id: String,
    #[validate(length(min = 1))]
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "AssignedTo")]
    pub assigned_to: Option<String>,
    #[serde(rename = "Frequency")]
    pub frequency: Option<String>,
    #[serde(rename = "DueDate")]
    pub due_date: Option<String>,
}

/// Full replacement of a task's editable fields
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "HouseholdID", default)]
    pub household_id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "AssignedTo")]
    pub assigned_to: Option<String>,
    #[serde(rename = "Frequency")]
    pub frequency: Option<String>,
    #[serde(rename = "DueDate")]
    pub due_date: Option<String>,
    #[serde(rename = "Completed", default)]
    pub completed: bool,
}

/// Reservation edit, carrying the id of the user making it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReservationRequest {
    #[serde(rename = "RequestUserID")]
    pub request_user_id: Option<String>,
    #[serde(flatten)]
    pub reservation: Reservation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewReservationRequest {
    #[serde(rename = "Action")]
    pub action: Option<String>,
    #[serde(rename = "UserID")]
    pub user_id: Option<String>,
    #[serde(rename = "HouseholdID")]
    pub household_id: Option<String>,
}
