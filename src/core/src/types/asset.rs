//! Inventory asset types
//!
//! The asset-listing endpoint returns a loosely typed record with a free-form
//! `metadata` bag. [`AssetRecord`] mirrors that wire shape; [`Asset`] is the
//! typed form the rest of the workspace works with, where each subtype
//! carries exactly the fields scope matching needs.

use crate::error::{CoreError, Result};
use crate::AssetId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use tracing::warn;

/// Asset subtype discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Domain,
    Ip,
    Host,
    Project,
    Repository,
    Credential,
    CloudAccount,
    Other,
}

impl AssetType {
    /// Canonical lower-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Ip => "ip",
            Self::Host => "host",
            Self::Project => "project",
            Self::Repository => "repository",
            Self::Credential => "credential",
            Self::CloudAccount => "cloud_account",
            Self::Other => "other",
        }
    }

    /// Parse a backend type string, accepting the aliases the listing
    /// endpoint has used over time. Unknown strings map to `Other`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "domain" | "subdomain" | "fqdn" => Self::Domain,
            "ip" | "ip_address" | "ipaddress" => Self::Ip,
            "host" | "server" | "hostname" => Self::Host,
            "project" => Self::Project,
            "repository" | "repo" => Self::Repository,
            "credential" | "secret" => Self::Credential,
            "cloud_account" | "account" => Self::CloudAccount,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    #[default]
    Active,
    Inactive,
    Archived,
    Pending,
}

impl FromStr for AssetStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "archived" => Ok(Self::Archived),
            "pending" => Ok(Self::Pending),
            other => Err(CoreError::invalid(format!("unknown asset status '{}'", other))),
        }
    }
}

/// Project visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Internal,
    #[default]
    Private,
}

impl FromStr for Visibility {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "internal" => Ok(Self::Internal),
            "private" => Ok(Self::Private),
            other => Err(CoreError::invalid(format!("unknown visibility '{}'", other))),
        }
    }
}

/// Typed, subtype-specific asset fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssetKind {
    Domain {
        fqdn: String,
    },
    Ip {
        address: IpAddr,
    },
    Host {
        hostname: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        address: Option<IpAddr>,
    },
    Project {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        repository: Option<String>,
        #[serde(default)]
        visibility: Visibility,
    },
    Repository {
        url: String,
    },
    Credential {
        provider: String,
    },
    CloudAccount {
        provider: String,
        account_id: String,
    },
    Other {
        type_name: String,
    },
}

impl AssetKind {
    /// Discriminant of this kind
    pub fn asset_type(&self) -> AssetType {
        match self {
            Self::Domain { .. } => AssetType::Domain,
            Self::Ip { .. } => AssetType::Ip,
            Self::Host { .. } => AssetType::Host,
            Self::Project { .. } => AssetType::Project,
            Self::Repository { .. } => AssetType::Repository,
            Self::Credential { .. } => AssetType::Credential,
            Self::CloudAccount { .. } => AssetType::CloudAccount,
            Self::Other { .. } => AssetType::Other,
        }
    }
}

/// Inventory asset (read-only cache of the backend entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Backend identifier
    pub id: AssetId,

    /// Display name (domain, hostname, project slug, ...)
    pub name: String,

    #[serde(default)]
    pub status: AssetStatus,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,

    #[serde(default)]
    pub finding_count: u32,

    /// Subtype fields
    #[serde(flatten)]
    pub kind: AssetKind,
}

impl Asset {
    /// Create a new active asset
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: AssetStatus::Active,
            tags: Vec::new(),
            risk_score: None,
            finding_count: 0,
            kind,
        }
    }

    /// Domain asset whose fqdn is its name
    pub fn domain(id: impl Into<String>, fqdn: impl Into<String>) -> Self {
        let fqdn = fqdn.into();
        Self::new(id, fqdn.clone(), AssetKind::Domain { fqdn })
    }

    /// IP asset whose name is the rendered address
    pub fn ip(id: impl Into<String>, address: IpAddr) -> Self {
        Self::new(id, address.to_string(), AssetKind::Ip { address })
    }

    pub fn with_status(mut self, status: AssetStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_risk_score(mut self, score: f64) -> Self {
        self.risk_score = Some(score);
        self
    }

    pub fn asset_type(&self) -> AssetType {
        self.kind.asset_type()
    }

    /// Lower-cased textual values a scope pattern may be tested against.
    ///
    /// Always starts with the name; duplicates are dropped.
    pub fn text_candidates(&self) -> Vec<String> {
        let mut out = vec![self.name.trim().trim_end_matches('.').to_lowercase()];
        let extra: Vec<&str> = match &self.kind {
            AssetKind::Domain { fqdn } => vec![fqdn.as_str()],
            AssetKind::Host { hostname, .. } => vec![hostname.as_str()],
            AssetKind::Project { repository, .. } => {
                repository.iter().map(String::as_str).collect()
            }
            AssetKind::Repository { url } => vec![url.as_str()],
            AssetKind::CloudAccount { account_id, .. } => vec![account_id.as_str()],
            AssetKind::Ip { .. } | AssetKind::Credential { .. } | AssetKind::Other { .. } => vec![],
        };
        for value in extra {
            let value = value.trim().trim_end_matches('.').to_lowercase();
            if !value.is_empty() && !out.contains(&value) {
                out.push(value);
            }
        }
        if let Some(addr) = self.address() {
            let rendered = addr.to_string();
            if !out.contains(&rendered) {
                out.push(rendered);
            }
        }
        out
    }

    /// IP addresses carried by this asset, for CIDR matching
    pub fn address_candidates(&self) -> Vec<IpAddr> {
        let mut out = Vec::new();
        if let Some(addr) = self.address() {
            out.push(addr);
        }
        if let Ok(addr) = self.name.trim().parse::<IpAddr>() {
            if !out.contains(&addr) {
                out.push(addr);
            }
        }
        out
    }

    fn address(&self) -> Option<IpAddr> {
        match &self.kind {
            AssetKind::Ip { address } => Some(*address),
            AssetKind::Host { address, .. } => *address,
            _ => None,
        }
    }

    /// Provider string for credential and cloud-account assets
    pub fn provider(&self) -> Option<&str> {
        match &self.kind {
            AssetKind::Credential { provider } | AssetKind::CloudAccount { provider, .. } => {
                Some(provider)
            }
            _ => None,
        }
    }

    /// Visibility for project assets
    pub fn visibility(&self) -> Option<Visibility> {
        match &self.kind {
            AssetKind::Project { visibility, .. } => Some(*visibility),
            _ => None,
        }
    }
}

/// Raw asset as returned by the asset-listing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub id: String,

    #[serde(rename = "type")]
    pub asset_type: String,

    pub name: String,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub metadata: Map<String, Value>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub risk_score: Option<f64>,

    #[serde(default)]
    pub finding_count: Option<u32>,
}

fn meta_str<'a>(metadata: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| metadata.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
}

fn parse_addr(raw: &str, id: &str) -> Result<IpAddr> {
    raw.parse()
        .map_err(|_| CoreError::invalid(format!("asset '{}': '{}' is not an IP address", id, raw)))
}

/// Unknown enum values from the backend fall back to the default rather
/// than dropping the asset
fn parse_or_default<T>(raw: &str, id: &str) -> T
where
    T: FromStr<Err = CoreError> + Default,
{
    raw.parse().unwrap_or_else(|e| {
        warn!("Asset '{}': {}; using default", id, e);
        T::default()
    })
}

impl TryFrom<AssetRecord> for Asset {
    type Error = CoreError;

    fn try_from(record: AssetRecord) -> Result<Self> {
        if record.id.trim().is_empty() {
            return Err(CoreError::invalid("asset id cannot be empty"));
        }

        let meta = &record.metadata;
        let asset_type = AssetType::parse_lenient(&record.asset_type);
        let kind = match asset_type {
            AssetType::Domain => AssetKind::Domain {
                fqdn: meta_str(meta, &["fqdn", "domain"])
                    .unwrap_or(&record.name)
                    .to_string(),
            },
            AssetType::Ip => AssetKind::Ip {
                address: parse_addr(
                    meta_str(meta, &["ip", "address"]).unwrap_or(record.name.trim()),
                    &record.id,
                )?,
            },
            AssetType::Host => AssetKind::Host {
                hostname: meta_str(meta, &["hostname", "host"])
                    .unwrap_or(&record.name)
                    .to_string(),
                address: meta_str(meta, &["ip", "address"])
                    .map(|raw| parse_addr(raw, &record.id))
                    .transpose()?,
            },
            AssetType::Project => AssetKind::Project {
                repository: meta_str(meta, &["repository", "repositoryUrl", "url"])
                    .map(str::to_string),
                visibility: meta_str(meta, &["visibility"])
                    .map(|raw| parse_or_default(raw, &record.id))
                    .unwrap_or_default(),
            },
            AssetType::Repository => AssetKind::Repository {
                url: meta_str(meta, &["url", "repository"])
                    .unwrap_or(&record.name)
                    .to_string(),
            },
            AssetType::Credential => AssetKind::Credential {
                provider: meta_str(meta, &["provider"]).unwrap_or("unknown").to_string(),
            },
            AssetType::CloudAccount => AssetKind::CloudAccount {
                provider: meta_str(meta, &["provider"]).unwrap_or("unknown").to_string(),
                account_id: meta_str(meta, &["accountId", "account_id"])
                    .unwrap_or(&record.name)
                    .to_string(),
            },
            AssetType::Other => AssetKind::Other {
                type_name: record.asset_type.clone(),
            },
        };

        let status = record
            .status
            .as_deref()
            .map(|raw| parse_or_default(raw, &record.id))
            .unwrap_or_default();

        Ok(Self {
            id: record.id,
            name: record.name,
            status,
            tags: record.tags,
            risk_score: record.risk_score,
            finding_count: record.finding_count.unwrap_or(0),
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> AssetRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_domain_record_conversion() {
        let asset = Asset::try_from(record(json!({
            "id": "a-1",
            "type": "domain",
            "name": "App.Example.com",
            "status": "active",
            "riskScore": 7.5,
            "findingCount": 3
        })))
        .unwrap();

        assert_eq!(asset.asset_type(), AssetType::Domain);
        assert_eq!(asset.risk_score, Some(7.5));
        assert_eq!(asset.finding_count, 3);
        assert_eq!(asset.text_candidates(), vec!["app.example.com".to_string()]);
    }

    #[test]
    fn test_host_record_with_address() {
        let asset = Asset::try_from(record(json!({
            "id": "h-1",
            "type": "server",
            "name": "db01",
            "metadata": { "hostname": "db01.corp.example.com", "ip": "10.1.2.3" }
        })))
        .unwrap();

        assert_eq!(asset.asset_type(), AssetType::Host);
        assert_eq!(asset.address_candidates(), vec!["10.1.2.3".parse::<IpAddr>().unwrap()]);
        let text = asset.text_candidates();
        assert!(text.contains(&"db01.corp.example.com".to_string()));
        assert!(text.contains(&"10.1.2.3".to_string()));
    }

    #[test]
    fn test_ip_record_falls_back_to_name() {
        let asset = Asset::try_from(record(json!({
            "id": "i-1", "type": "ip_address", "name": "192.168.0.10"
        })))
        .unwrap();
        assert_eq!(asset.kind, AssetKind::Ip { address: "192.168.0.10".parse().unwrap() });
    }

    #[test]
    fn test_bad_ip_rejected() {
        let result = Asset::try_from(record(json!({
            "id": "i-2", "type": "ip", "name": "not-an-ip"
        })));
        assert!(matches!(result, Err(CoreError::Invalid(_))));
    }

    #[test]
    fn test_empty_id_rejected() {
        let result = Asset::try_from(record(json!({ "id": " ", "type": "domain", "name": "x" })));
        assert!(matches!(result, Err(CoreError::Invalid(_))));
    }

    #[test]
    fn test_project_visibility_and_unknown_type() {
        let project = Asset::try_from(record(json!({
            "id": "p-1", "type": "project", "name": "payments",
            "metadata": { "visibility": "public", "repository": "github.com/acme/payments" }
        })))
        .unwrap();
        assert_eq!(project.visibility(), Some(Visibility::Public));

        let other =
            Asset::try_from(record(json!({ "id": "o-1", "type": "bucket", "name": "logs" })))
                .unwrap();
        assert_eq!(other.kind, AssetKind::Other { type_name: "bucket".to_string() });
    }

    #[test]
    fn test_asset_json_shape() {
        let asset = Asset::domain("a-1", "example.com").with_tag("prod");
        let value = serde_json::to_value(&asset).unwrap();
        assert_eq!(value["type"], "domain");
        assert_eq!(value["fqdn"], "example.com");
        assert_eq!(value["findingCount"], 0);

        let back: Asset = serde_json::from_value(value).unwrap();
        assert_eq!(back, asset);
    }

    #[test]
    fn test_unknown_status_and_visibility_fall_back() {
        let asset = Asset::try_from(record(json!({
            "id": "d-9",
            "type": "domain",
            "name": "www.example.com",
            "status": "decommissioned"
        })))
        .unwrap();
        assert_eq!(asset.status, AssetStatus::Active);

        let project = Asset::try_from(record(json!({
            "id": "p-9",
            "type": "project",
            "name": "billing",
            "metadata": { "visibility": "restricted" }
        })))
        .unwrap();
        assert_eq!(project.visibility(), Some(Visibility::Private));
    }

    #[test]
    fn test_name_candidate_drops_trailing_dot() {
        let asset = Asset::new(
            "c-1",
            "Edge.Example.com.",
            AssetKind::Credential { provider: "github".to_string() },
        );
        assert_eq!(asset.text_candidates()[0], "edge.example.com");
    }
}
