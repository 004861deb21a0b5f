use shared::UserProfile;

use crate::domain::models::User;

pub struct UserMapper;

impl UserMapper {
    /// Public view of a user; the credential never leaves the backend
    pub fn to_profile(user: User) -> UserProfile {
        UserProfile {
            email: user.email,
            username: user.username,
        }
    }
}
