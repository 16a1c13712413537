use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for catalog services.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceId(pub String);

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for platform users (customers, staff, consultants).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Roles a platform account can hold. Consultant is the capability checked
/// by the assignment resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Customer,
    Staff,
    Manager,
    Consultant,
    Admin,
}

impl UserRole {
    pub const fn label(self) -> &'static str {
        match self {
            UserRole::Customer => "Customer",
            UserRole::Staff => "Staff",
            UserRole::Manager => "Manager",
            UserRole::Consultant => "Consultant",
            UserRole::Admin => "Admin",
        }
    }
}

/// A bookable skincare service. Price is in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: ServiceId,
    pub name: String,
    pub price: u32,
}

/// Platform account as the directory stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub verified: bool,
}

impl UserRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Catalog projection exposed on the public services listing.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceView {
    pub id: ServiceId,
    pub name: String,
    pub price: u32,
}

impl From<ServiceRecord> for ServiceView {
    fn from(record: ServiceRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            price: record.price,
        }
    }
}

/// Consultant projection exposed on the public consultants listing.
#[derive(Debug, Clone, Serialize)]
pub struct ConsultantView {
    pub id: UserId,
    pub name: String,
    pub verified: bool,
}

impl From<UserRecord> for ConsultantView {
    fn from(record: UserRecord) -> Self {
        let name = record.full_name();
        Self {
            id: record.id,
            name,
            verified: record.verified,
        }
    }
}
