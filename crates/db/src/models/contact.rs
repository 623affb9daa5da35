//! Phone and email contact rows, children of a company, plus the typed
//! command list the aggregate update workflow consumes.

use crm_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A phone row from the `phones` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Phone {
    pub id: DbId,
    pub company_id: DbId,
    pub phone: String,
}

/// An email row from the `emails` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Email {
    pub id: DbId,
    pub company_id: DbId,
    pub email: String,
}

/// Submitted phone value for insert or in-place update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PhoneInput {
    #[validate(length(min = 1, max = 30, message = "Phone must be 1 to 30 characters"))]
    pub phone: String,
}

/// Submitted email value for insert or in-place update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmailInput {
    #[validate(email(message = "Enter a valid email address"))]
    #[validate(length(max = 30, message = "Email must be at most 30 characters"))]
    pub email: String,
}

impl PhoneInput {
    /// An all-blank row on the create form, silently skipped.
    pub fn is_blank(&self) -> bool {
        self.phone.trim().is_empty()
    }
}

impl EmailInput {
    pub fn is_blank(&self) -> bool {
        self.email.trim().is_empty()
    }
}

/// One child-row mutation inside an aggregate update.
///
/// The whole command list is validated as a batch before any write runs;
/// `update`/`delete` ids must belong to the company being edited.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ContactCommand<T> {
    Insert { value: T },
    Update { id: DbId, value: T },
    Delete { id: DbId },
}

impl<T> ContactCommand<T> {
    /// The submitted value, if this command carries one.
    pub fn value(&self) -> Option<&T> {
        match self {
            ContactCommand::Insert { value } | ContactCommand::Update { value, .. } => Some(value),
            ContactCommand::Delete { .. } => None,
        }
    }
}
