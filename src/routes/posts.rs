use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::core::proximity::{filter_visible_at, Location};
use crate::error::ApiError;
use crate::models::{
    timestamp_now, Comment, CreateCommentRequest, CreatePostRequest, DeletePostRequest,
    FeedQuery, FeedResponse, LikePostRequest, MessageResponse, Numeric, Post, User,
};
use crate::routes::{validate_request, AppState};
use crate::services::{CacheError, CacheKey, RecordKey, Table};

/// Configure social feed routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/posts")
            .route(web::get().to(list_nearby_posts))
            .route(web::post().to(create_post))
            .route(web::delete().to(delete_post)),
    )
    .service(web::resource("/posts/like").route(web::post().to(like_post)))
    .service(web::resource("/posts/{post_id}").route(web::get().to(get_post)))
    .service(web::resource("/posts/{post_id}/comments").route(web::get().to(list_comments)))
    .service(web::resource("/comments").route(web::post().to(create_comment)));
}

/// Proximity feed
///
/// GET /api/v1/posts?Latitude={lat}&Longitude={lon}
///
/// Returns the posts whose geofence contains the caller's location, newest
/// first. Without a usable location the feed is empty.
async fn list_nearby_posts(
    state: web::Data<AppState>,
    query: web::Query<FeedQuery>,
) -> Result<HttpResponse, ApiError> {
    let Some(location) = Location::parse(query.latitude.as_deref(), query.longitude.as_deref()) else {
        tracing::info!("No usable user location provided; returning empty posts");
        return Ok(HttpResponse::Ok().json(FeedResponse::fetched(Vec::new())));
    };

    tracing::debug!("User location: {}, {}", location.latitude, location.longitude);

    // Full scan; the geofence check needs every post's own radius
    let posts: Vec<Post> = state
        .records
        .scan(Table::Posts)
        .await
        .map_err(ApiError::internal("Error fetching posts"))?;
    let total = posts.len();

    let mut visible = filter_visible_at(posts, location);

    for post in visible.iter_mut().filter(|p| p.author.is_none()) {
        if let Some(user_id) = post.user_id.as_deref() {
            post.author = Some(resolve_author(&state, user_id).await);
        }
    }

    tracing::info!("Returning {} of {} posts for feed request", visible.len(), total);

    Ok(HttpResponse::Ok().json(FeedResponse::fetched(visible)))
}

/// Display name for a post author, going through the display-name cache
///
/// Never fails: any miss or lookup error yields the configured placeholder.
async fn resolve_author(state: &AppState, user_id: &str) -> String {
    let cache_key = CacheKey::display_name(user_id);

    match state.cache.get::<String>(&cache_key).await {
        Ok(name) => return name,
        Err(CacheError::CacheMiss(_)) => {}
        Err(e) => tracing::warn!("Display name cache read failed for {}: {}", user_id, e),
    }

    match state.records.get::<User>(Table::Users, &RecordKey::new(user_id)).await {
        Ok(Some(User { name: Some(name), .. })) => {
            if let Err(e) = state.cache.set(&cache_key, &name).await {
                tracing::warn!("Failed to cache display name for {}: {}", user_id, e);
            }
            name
        }
        Ok(_) => state.feed.unknown_author.clone(),
        Err(e) => {
            tracing::warn!("Author lookup failed for {}: {}", user_id, e);
            state.feed.unknown_author.clone()
        }
    }
}

/// Create a post
///
/// POST /api/v1/posts
///
/// Request body:
/// ```json
/// {
///   "UserID": "string",
///   "Content": "string",
///   "Latitude": 53.3498,
///   "Longitude": -6.2603,
///   "Tags": ["string"],
///   "GeofenceRadius": 500
/// }
/// ```
async fn create_post(
    state: web::Data<AppState>,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, ApiError> {
    validate_request(&*req, "Missing required fields")?;
    let req = req.into_inner();

    let (Some(latitude), Some(longitude)) = (req.latitude, req.longitude) else {
        return Err(ApiError::bad_request("Missing required fields"));
    };
    if latitude.as_finite_f64().is_none() || longitude.as_finite_f64().is_none() {
        return Err(ApiError::bad_request("Invalid coordinates"));
    }

    let geofence_radius = match req.geofence_radius {
        Some(radius) if radius.as_finite_f64().is_some() => radius,
        Some(_) => return Err(ApiError::bad_request("Invalid GeofenceRadius")),
        None => Numeric::from(i64::from(state.feed.default_geofence_radius_m)),
    };

    let user: User = state
        .records
        .get(Table::Users, &RecordKey::new(req.user_id.as_str()))
        .await
        .map_err(ApiError::internal("Error creating post"))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let post_id = Uuid::new_v4().to_string();
    let post = Post {
        post_id: post_id.clone(),
        user_id: Some(req.user_id),
        user_name: Some(user.name.unwrap_or_else(|| state.feed.unknown_author.clone())),
        author: None,
        content: Some(req.content),
        tags: req.tags,
        latitude: Some(latitude),
        longitude: Some(longitude),
        geofence_radius: Some(geofence_radius),
        geofence_id: Some(format!("post-{}", post_id)),
        created_at: Some(timestamp_now()),
        likes: 0,
    };

    state
        .records
        .put(Table::Posts, &RecordKey::new(post_id.as_str()), &post)
        .await
        .map_err(ApiError::internal("Error creating post"))?;

    tracing::info!("Created post {} for user {:?}", post_id, post.user_id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Post created successfully",
        "PostID": post_id,
    })))
}

/// Fetch a single post
///
/// GET /api/v1/posts/{postID}
async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let post_id = path.into_inner();

    let post: Post = state
        .records
        .get(Table::Posts, &RecordKey::new(post_id.as_str()))
        .await
        .map_err(ApiError::internal("Error fetching post"))?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post; only its author may do so
///
/// DELETE /api/v1/posts with body `{"PostID": "...", "UserID": "..."}`
async fn delete_post(
    state: web::Data<AppState>,
    req: web::Json<DeletePostRequest>,
) -> Result<HttpResponse, ApiError> {
    validate_request(&*req, "Missing required parameters: PostID and UserID")?;

    let key = RecordKey::new(req.post_id.as_str());
    let post: Post = state
        .records
        .get(Table::Posts, &key)
        .await
        .map_err(ApiError::internal("Error deleting post"))?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    if post.user_id.as_deref() != Some(req.user_id.as_str()) {
        tracing::info!("User {} tried to delete post {} owned by {:?}", req.user_id, req.post_id, post.user_id);
        return Err(ApiError::forbidden("Unauthorized to delete this post"));
    }

    state
        .records
        .delete::<Post>(Table::Posts, &key)
        .await
        .map_err(ApiError::internal("Error deleting post"))?;

    tracing::info!("Deleted post {}", req.post_id);

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}

/// Add one like to a post
///
/// POST /api/v1/posts/like with body `{"PostID": "..."}`
async fn like_post(
    state: web::Data<AppState>,
    req: web::Json<LikePostRequest>,
) -> Result<HttpResponse, ApiError> {
    validate_request(&*req, "PostID is required")?;

    let key = RecordKey::new(req.post_id.as_str());
    let mut post: Post = state
        .records
        .get(Table::Posts, &key)
        .await
        .map_err(ApiError::internal("Error liking post"))?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    post.likes += 1;

    state
        .records
        .put(Table::Posts, &key, &post)
        .await
        .map_err(ApiError::internal("Error liking post"))?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Post liked successfully",
        "UpdatedLikes": post.likes,
    })))
}

/// Comment on a post
///
/// POST /api/v1/comments with body `{"PostID", "UserID", "Content"}`
async fn create_comment(
    state: web::Data<AppState>,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, ApiError> {
    validate_request(&*req, "Missing required fields")?;
    let req = req.into_inner();

    let comment = Comment {
        comment_id: Uuid::new_v4().to_string(),
        post_id: req.post_id,
        user_id: req.user_id,
        content: req.content,
        created_at: timestamp_now(),
    };

    // Comments are partitioned by post so a post's thread is one query
    let key = RecordKey::with_sort(comment.post_id.as_str(), comment.comment_id.as_str());
    state
        .records
        .put(Table::Comments, &key, &comment)
        .await
        .map_err(ApiError::internal("Error adding comment"))?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Comment added successfully",
        "CommentID": comment.comment_id,
    })))
}

/// Comments on a post, oldest first
///
/// GET /api/v1/posts/{postID}/comments
async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let post_id = path.into_inner();

    let mut comments: Vec<Comment> = state
        .records
        .query(Table::Comments, &post_id)
        .await
        .map_err(ApiError::internal("Error fetching comments"))?;
    comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    Ok(HttpResponse::Ok().json(json!({ "comments": comments })))
}
