//! Modelo de User
//!
//! La autenticación queda fuera del core; los usuarios existen porque las
//! reservas los referencian (user_id en bookings).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User - mapea a la tabla users
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Roles soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Customer,
    Admin,
}

impl UserRole {
    pub const CUSTOMER: &'static str = "CUSTOMER";
    pub const ADMIN: &'static str = "ADMIN";

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => Self::CUSTOMER,
            UserRole::Admin => Self::ADMIN,
        }
    }
}
