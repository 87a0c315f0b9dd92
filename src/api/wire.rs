use serde::{Deserialize, Serialize};

use crate::model::Car;

/// Body of `POST /login`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// HAL envelope of `GET /api/cars`
#[derive(Debug, Deserialize)]
pub struct CarsEnvelope {
    #[serde(rename = "_embedded")]
    pub embedded: EmbeddedCars,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddedCars {
    pub cars: Vec<Car>,
}
