//! Contact details payload.

use serde::{Deserialize, Serialize};

/// Management contact details shown beside the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactContent {
    pub email: String,
    pub phone: String,
    pub location: String,
}

/// Partial update for [`ContactContent`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactPatch {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

impl ContactContent {
    /// Shallow-merge a patch into this payload.
    pub fn apply(&mut self, patch: ContactPatch) {
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
    }
}
