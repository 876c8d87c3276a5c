use serde::{Deserialize, Deserializer, Serialize};
use validator::ValidateEmail;

#[derive(Debug, Clone, Serialize)]
pub struct EmailObject(String);

impl EmailObject {
    pub fn parse(s: String) -> Result<EmailObject, String> {
        if s.validate_email() {
            Ok(Self(s))
        } else {
            Err(format!("{} is not a valid email.", s))
        }
    }

    pub fn get(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailObject {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmailObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

pub fn deserialize_email_object<'de, D>(deserializer: D) -> Result<EmailObject, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    EmailObject::parse(raw).map_err(serde::de::Error::custom)
}
