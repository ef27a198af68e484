use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sea_orm::{entity::prelude::*, sea_query::Expr, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Closed set of profile roles. Nothing else is accepted in or out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(ModelError::Validation(format!("invalid role: {other}"))),
        }
    }
}

/// Profile of an authenticated user, identity coerced to a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<Model> for Profile {
    type Error = ModelError;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        Ok(Profile {
            id: m.id.to_string(),
            full_name: m.full_name,
            avatar_url: m.avatar_url,
            phone: m.phone,
            role: m.role.parse()?,
            updated_at: m.updated_at.map(|t| t.with_timezone(&Utc)),
        })
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.avatar_url.is_none()
            && self.phone.is_none()
            && self.role.is_none()
    }

    /// Merge into an in-memory profile.
    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(v) = &self.full_name {
            profile.full_name = Some(v.clone());
        }
        if let Some(v) = &self.avatar_url {
            profile.avatar_url = Some(v.clone());
        }
        if let Some(v) = &self.phone {
            profile.phone = Some(v.clone());
        }
        if let Some(r) = self.role {
            profile.role = r;
        }
    }
}

pub fn parse_id(id: &str) -> Result<Uuid, ModelError> {
    Uuid::parse_str(id).map_err(|_| ModelError::Validation(format!("invalid profile id: {id}")))
}

pub async fn find(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    Entity::find_by_id(id).one(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

/// Apply a partial update in a single `UPDATE ... RETURNING` statement.
/// `Ok(None)` when no row has this id.
pub async fn update(db: &DatabaseConnection, id: Uuid, patch: &ProfileUpdate) -> Result<Option<Model>, ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let mut query = Entity::update_many().col_expr(Column::UpdatedAt, Expr::value(now));
    if let Some(v) = &patch.full_name {
        query = query.col_expr(Column::FullName, Expr::value(v.clone()));
    }
    if let Some(v) = &patch.avatar_url {
        query = query.col_expr(Column::AvatarUrl, Expr::value(v.clone()));
    }
    if let Some(v) = &patch.phone {
        query = query.col_expr(Column::Phone, Expr::value(v.clone()));
    }
    if let Some(r) = patch.role {
        query = query.col_expr(Column::Role, Expr::value(r.as_str()));
    }
    let rows = query
        .filter(Column::Id.eq(id))
        .exec_with_returning(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(rows.into_iter().next())
}

/// Insert a bare profile for a freshly authenticated user.
pub async fn create(db: &DatabaseConnection, id: Uuid, full_name: Option<&str>) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(id),
        full_name: Set(full_name.map(str::to_string)),
        avatar_url: Set(None),
        phone: Set(None),
        role: Set(Role::User.as_str().to_string()),
        updated_at: Set(Some(Utc::now().into())),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}
