use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserCredential {
    pub id: String,
    pub access_token: String,
}

impl UserCredential {
    pub fn new(id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            access_token: access_token.into(),
        }
    }
}
