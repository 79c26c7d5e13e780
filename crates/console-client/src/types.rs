//! Request and response records for the console backend
//!
//! Records keep the fields the console works with typed, and carry anything
//! else the backend sends in `extra` so a read-modify-write cycle hands the
//! record back exactly as received.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields the typed records don't model
pub type ExtraFields = Map<String, Value>;

// =============================================================================
// Contact Types
// =============================================================================

/// A registrar contact
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrar_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fax_number: Option<String>,
    /// Contact roles, e.g. `ADMIN`, `BILLING`, `TECH`, `ABUSE`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_in_whois_as_admin: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_in_whois_as_tech: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_in_domain_whois_as_abuse: Option<bool>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

// =============================================================================
// Registrar Types
// =============================================================================

/// Postal address as published for a registrar
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Registrar metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registrar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrar_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrar_name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub registrar_type: Option<String>,
    /// Numeric on most backends, kept as sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iana_identifier: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icann_referral_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fax_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whois_server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_folder_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_tlds: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address_allow_list: Option<Vec<String>>,
    /// Currency code to billing account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_account_map: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_lock_allowed: Option<bool>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// WHOIS-published registrar fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoisRegistrarFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrar_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whois_server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fax_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

// =============================================================================
// Security Types
// =============================================================================

/// Registrar security configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address_allow_list: Option<Vec<String>>,
    /// PEM-encoded client certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_certificate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failover_client_certificate: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// EPP password update request
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EppPassword {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrar_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_password_repeat: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl EppPassword {
    /// Build an update where the repeat field matches the new password
    pub fn new(
        registrar_id: impl Into<String>,
        old_password: impl Into<String>,
        new_password: impl Into<String>,
    ) -> Self {
        let new_password = new_password.into();
        Self {
            registrar_id: Some(registrar_id.into()),
            old_password: Some(old_password.into()),
            new_password_repeat: Some(new_password.clone()),
            new_password: Some(new_password),
            extra: ExtraFields::new(),
        }
    }
}

// Passwords must not end up in tracing output.
impl fmt::Debug for EppPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: &Option<String>) -> &'static str {
            if value.is_some() {
                "<redacted>"
            } else {
                "<unset>"
            }
        }

        f.debug_struct("EppPassword")
            .field("registrar_id", &self.registrar_id)
            .field("old_password", &redact(&self.old_password))
            .field("new_password", &redact(&self.new_password))
            .field("new_password_repeat", &redact(&self.new_password_repeat))
            .finish_non_exhaustive()
    }
}

// =============================================================================
// User Types
// =============================================================================

/// Profile and session information of the signed-in user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    /// Registrar id to role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_roles: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_docs_url: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

// =============================================================================
// Domain List Types
// =============================================================================

/// A domain row in the registrar's domain list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_expiration_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// One page of the domain list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainListResult {
    #[serde(default)]
    pub domains: Vec<Domain>,
    /// Snapshot time to pass back when paging through the same listing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u64>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Parameters of a domain list request
///
/// Optional parameters are emitted in a fixed order and only when set to a
/// non-empty string or non-zero number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainListQuery {
    pub registrar_id: String,
    pub checkpoint_time: Option<String>,
    pub page_number: Option<u32>,
    pub results_per_page: Option<u32>,
    pub total_results: Option<u64>,
    pub search_term: Option<String>,
}

impl DomainListQuery {
    pub fn new(registrar_id: impl Into<String>) -> Self {
        Self {
            registrar_id: registrar_id.into(),
            ..Default::default()
        }
    }

    pub fn checkpoint_time(mut self, checkpoint_time: impl Into<String>) -> Self {
        self.checkpoint_time = Some(checkpoint_time.into());
        self
    }

    pub fn page_number(mut self, page_number: u32) -> Self {
        self.page_number = Some(page_number);
        self
    }

    pub fn results_per_page(mut self, results_per_page: u32) -> Self {
        self.results_per_page = Some(results_per_page);
        self
    }

    pub fn total_results(mut self, total_results: u64) -> Self {
        self.total_results = Some(total_results);
        self
    }

    pub fn search_term(mut self, search_term: impl Into<String>) -> Self {
        self.search_term = Some(search_term.into());
        self
    }

    /// Path and query relative to the API prefix
    ///
    /// Values are concatenated as-is; reserved characters are not escaped.
    pub fn to_path(&self) -> String {
        let mut path = format!("/domain-list?registrarId={}", self.registrar_id);

        if let Some(checkpoint_time) = self.checkpoint_time.as_deref().filter(|s| !s.is_empty()) {
            path.push_str(&format!("&checkpointTime={}", checkpoint_time));
        }
        if let Some(page_number) = self.page_number.filter(|n| *n != 0) {
            path.push_str(&format!("&pageNumber={}", page_number));
        }
        if let Some(results_per_page) = self.results_per_page.filter(|n| *n != 0) {
            path.push_str(&format!("&resultsPerPage={}", results_per_page));
        }
        if let Some(total_results) = self.total_results.filter(|n| *n != 0) {
            path.push_str(&format!("&totalResults={}", total_results));
        }
        if let Some(search_term) = self.search_term.as_deref().filter(|s| !s.is_empty()) {
            path.push_str(&format!("&searchTerm={}", search_term));
        }

        path
    }
}
