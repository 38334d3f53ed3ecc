//! Optional listing filters. Every present, non-empty field is matched as a
//! case-insensitive substring of the stored value.

use serde::Deserialize;

use super::domain::{Customer, ServiceProviderSummary};
use crate::errors::ServiceError;

fn clean(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

/// Case-insensitive substring test used by in-memory matching.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn field_matches(value: &str, wanted: &Option<String>) -> bool {
    wanted.as_deref().map_or(true, |w| contains_ci(value, w))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CustomerFilter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl CustomerFilter {
    pub fn new(name: Option<String>, email: Option<String>) -> Self {
        Self { name: clean(name), email: clean(email) }
    }

    pub fn normalized(self) -> Self { Self::new(self.name, self.email) }

    pub fn is_empty(&self) -> bool { self.name.is_none() && self.email.is_none() }

    pub fn matches(&self, c: &Customer) -> bool {
        field_matches(&c.name, &self.name) && field_matches(&c.email, &self.email)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProviderFilter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub service_type: Option<String>,
}

impl ServiceProviderFilter {
    pub fn new(name: Option<String>, email: Option<String>, service_type: Option<String>) -> Self {
        Self { name: clean(name), email: clean(email), service_type: clean(service_type) }
    }

    pub fn normalized(self) -> Self { Self::new(self.name, self.email, self.service_type) }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.service_type.is_none()
    }

    pub fn matches(&self, sp: &ServiceProviderSummary) -> bool {
        field_matches(&sp.name, &self.name)
            && field_matches(&sp.email, &self.email)
            && field_matches(&sp.service_type, &self.service_type)
    }
}

/// Chat filter, sent as a JSON document in the `filter` query parameter:
/// `{"customer":{"email":"a"},"serviceProvider":{"serviceType":"plumb"}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatFilter {
    #[serde(default)]
    pub customer: CustomerFilter,
    #[serde(default)]
    pub service_provider: ServiceProviderFilter,
}

impl ChatFilter {
    /// Parse the raw query value. Absent or blank means no filter.
    pub fn from_param(raw: Option<&str>) -> Result<Self, ServiceError> {
        let raw = match raw.map(str::trim) {
            None | Some("") => return Ok(Self::default()),
            Some(r) => r,
        };
        let parsed: Option<ChatFilter> = serde_json::from_str(raw)
            .map_err(|_| ServiceError::Validation("Invalid filter".into()))?;
        Ok(parsed.unwrap_or_default().normalized())
    }

    pub fn normalized(self) -> Self {
        Self {
            customer: self.customer.normalized(),
            service_provider: self.service_provider.normalized(),
        }
    }

    pub fn matches(&self, customer: &Customer, provider: &ServiceProviderSummary) -> bool {
        self.customer.matches(customer) && self.service_provider.matches(provider)
    }
}
