use coach_core::model::{Account, AccountId, LoginIdentifier};

use super::SqliteRepository;
use super::mapping::{account_id_from_i64, map_account_row, write_err};
use crate::repository::{AccountRepository, NewAccountRecord, StorageError};

#[async_trait::async_trait]
impl AccountRepository for SqliteRepository {
    async fn insert_account(&self, account: NewAccountRecord) -> Result<AccountId, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO accounts (display_name, email, password_hash, created_at)
                VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(account.display_name)
        .bind(account.email)
        .bind(account.password_hash)
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        account_id_from_i64(res.last_insert_rowid())
    }

    async fn find_account(
        &self,
        identifier: &LoginIdentifier,
    ) -> Result<Option<Account>, StorageError> {
        let (sql, value): (&str, &str) = match identifier {
            LoginIdentifier::Name(name) => (
                r"
                    SELECT id, display_name, email, password_hash
                    FROM accounts
                    WHERE display_name = ?1
                ",
                name,
            ),
            LoginIdentifier::Email(email) => (
                r"
                    SELECT id, display_name, email, password_hash
                    FROM accounts
                    WHERE email = ?1
                ",
                email,
            ),
        };

        let row = sqlx::query(sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_account_row(&row).map(Some),
            None => Ok(None),
        }
    }
}
