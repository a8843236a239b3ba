use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub wallet_address: String,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub profile_pic_url: Option<String>,
}

impl User {
    /// Profile returned for a wallet that has never saved one.
    pub fn default_for(wallet_address: impl Into<String>) -> Self {
        Self::from_fields(wallet_address, ProfileFields::default())
    }

    pub fn from_fields(wallet_address: impl Into<String>, fields: ProfileFields) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            username: fields.username,
            bio: fields.bio,
            profile_pic_url: fields.profile_pic_url,
        }
    }
}

/// Editable part of a profile. Omitted fields are `None`, never carried over
/// from a previous record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileFields {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_pic_url: Option<String>,
}
