// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    timestamp_now, ApprovalStatus, Bill, Comment, Household, Notice, Numeric, Post, Product,
    Reservation, ShoppingList, Split, Task, User,
};
pub use requests::{
    CreateCommentRequest, CreateHouseholdRequest, CreatePostRequest, CreateTaskRequest,
    CreateUserRequest, DeletePostRequest, FeedQuery, HouseholdQuery, LikePostRequest,
    ReviewReservationRequest, UpdateReservationRequest, UpdateTaskRequest, UpdateUserRequest,
};
pub use responses::{ErrorResponse, FeedResponse, HealthResponse, MessageResponse};
