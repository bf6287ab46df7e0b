use crate::model::AccountId;

/// A registered end-user identity.
///
/// Created once at registration and read on every login. The password is
/// stored only as a salted slow hash; the plaintext never reaches the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    display_name: String,
    email: String,
    password_hash: String,
}

impl Account {
    /// Rehydrate an account from persisted storage.
    #[must_use]
    pub fn from_persisted(
        id: AccountId,
        display_name: String,
        email: String,
        password_hash: String,
    ) -> Self {
        Self {
            id,
            display_name,
            email,
            password_hash,
        }
    }

    #[must_use]
    pub fn id(&self) -> AccountId {
        self.id
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// The client-safe view of this account (no hash).
    #[must_use]
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id,
            name: self.display_name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Public view of an account, safe to return to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub id: AccountId,
    pub name: String,
    pub email: String,
}

/// How a caller identifies an account at login: by display name or by email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    Name(String),
    Email(String),
}
