//! Repository structs, one per entity.
//!
//! Repositories are stateless unit structs with associated async functions
//! taking the pool explicitly. Handlers own transaction boundaries only
//! indirectly: the aggregate write paths in [`CompanyRepo`] open their own
//! transaction so parent and child rows commit or roll back together.

mod company_repo;
mod interaction_repo;
mod project_repo;
mod user_repo;

pub use company_repo::CompanyRepo;
pub use interaction_repo::InteractionRepo;
pub use project_repo::ProjectRepo;
pub use user_repo::{PasswordResetRepo, UserRepo};

/// Substring-match pattern for `ILIKE`, with `%`/`_`/`\` in the user's
/// text escaped so they match literally rather than as wildcards.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    format!("%{escaped}%")
}
