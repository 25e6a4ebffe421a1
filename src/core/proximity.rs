use crate::core::distance::great_circle_distance;
use crate::models::Post;

/// Where a feed request is being made from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Build a location from finite coordinates
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        (latitude.is_finite() && longitude.is_finite()).then_some(Self { latitude, longitude })
    }

    /// Parse the raw `Latitude`/`Longitude` query values
    ///
    /// Returns `None` when either is absent, empty or not a finite number.
    pub fn parse(latitude: Option<&str>, longitude: Option<&str>) -> Option<Self> {
        let lat = latitude?.trim().parse::<f64>().ok()?;
        let lon = longitude?.trim().parse::<f64>().ok()?;
        Self::new(lat, lon)
    }
}

/// Whether `post` can be seen from `location`
///
/// A post is visible iff the distance to its coordinates is within its
/// geofence radius (inclusive). Posts with unusable coordinates are never visible.
#[inline]
pub fn is_visible_from(post: &Post, location: &Location) -> bool {
    let Some((lat, lon)) = post.coordinates() else {
        tracing::debug!("Skipping post {} due to invalid coordinates", post.post_id);
        return false;
    };

    let distance = great_circle_distance(location.latitude, location.longitude, lat, lon);
    let allowed_radius = post.geofence_radius_m();

    tracing::trace!(
        "Post {}: distance = {:.2} m, allowed radius = {} m",
        post.post_id,
        distance,
        allowed_radius
    );

    distance <= allowed_radius
}

/// Filter posts to those visible from the given raw coordinates
///
/// Missing or unparsable coordinates yield an empty result rather than an error.
pub fn filter_visible(
    posts: Vec<Post>,
    user_lat: Option<&str>,
    user_long: Option<&str>,
) -> Vec<Post> {
    match Location::parse(user_lat, user_long) {
        Some(location) => filter_visible_at(posts, location),
        None => Vec::new(),
    }
}

/// Filter posts to those visible from `location`, newest first
pub fn filter_visible_at(posts: Vec<Post>, location: Location) -> Vec<Post> {
    let mut visible: Vec<Post> = posts
        .into_iter()
        .filter(|post| is_visible_from(post, &location))
        .collect();

    // ISO-8601 UTC timestamps order lexicographically; missing sorts last
    visible.sort_by(|a, b| {
        let a_created = a.created_at.as_deref().unwrap_or("");
        let b_created = b.created_at.as_deref().unwrap_or("");
        b_created.cmp(a_created)
    });

    visible
}
