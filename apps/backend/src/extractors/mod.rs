pub mod current_user;
pub mod owned_user_id;
pub mod user_id;
pub mod validated_json;

pub use current_user::CurrentUser;
pub use owned_user_id::OwnedUserId;
pub use user_id::UserId;
pub use validated_json::ValidatedJson;
