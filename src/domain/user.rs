use serde::{Deserialize, Serialize};
use validator::Validate;

use super::id::DocumentId;
use super::todo::validate_not_blank;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: DocumentId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
}

impl User {
    pub fn new(input: CreateUser) -> Self {
        Self { id: DocumentId::new(), name: input.name, email: input.email }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self { id: user.id.to_string(), name: user.name, email: user.email }
    }
}
