use super::domain::{ServiceId, ServiceRecord, UserId, UserRecord, UserRole};

/// Storage abstraction over the service catalog and user accounts.
pub trait DirectoryRepository: Send + Sync {
    fn service(&self, id: &ServiceId) -> Result<Option<ServiceRecord>, DirectoryError>;
    fn services(&self) -> Result<Vec<ServiceRecord>, DirectoryError>;
    fn user(&self, id: &UserId) -> Result<Option<UserRecord>, DirectoryError>;
    /// Accounts holding the Consultant capability, in insertion order.
    fn consultants(&self) -> Result<Vec<UserRecord>, DirectoryError>;
}

/// Error enumeration for directory lookups.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Fetch a user and check it holds the Consultant role.
pub fn consultant(
    directory: &dyn DirectoryRepository,
    id: &UserId,
) -> Result<Option<UserRecord>, DirectoryError> {
    Ok(directory
        .user(id)?
        .filter(|record| record.role == UserRole::Consultant))
}
