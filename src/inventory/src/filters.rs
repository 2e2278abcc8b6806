//! Ready-made predicates for the asset, scan, and runner tables
//!
//! Every field is optional; unset fields accept everything and set fields
//! are combined with logical AND.

use crate::query::Predicate;
use posture_core::{
    Asset, AssetStatus, AssetType, Runner, RunnerStatus, Scan, ScanStatus, Visibility,
};

/// Case-insensitive substring match over any of `fields`
fn contains_text(needle: &Option<String>, fields: &[&str]) -> bool {
    match needle {
        None => true,
        Some(needle) => fields
            .iter()
            .any(|field| field.to_lowercase().contains(needle.as_str())),
    }
}

fn normalize(text: impl Into<String>) -> Option<String> {
    let text = text.into().trim().to_lowercase();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn eq_ignore_case(expected: &Option<String>, actual: Option<&str>) -> bool {
    match expected {
        None => true,
        Some(expected) => actual.is_some_and(|actual| actual.eq_ignore_ascii_case(expected)),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetFilter {
    pub status: Option<AssetStatus>,
    pub asset_type: Option<AssetType>,
    pub visibility: Option<Visibility>,
    pub provider: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
}

impl AssetFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: AssetStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn asset_type(mut self, asset_type: AssetType) -> Self {
        self.asset_type = Some(asset_type);
        self
    }

    /// Only assets that carry a visibility (projects) can match
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = normalize(provider);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = normalize(tag);
        self
    }

    /// Blank search text clears the search
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = normalize(text);
        self
    }
}

impl Predicate<Asset> for AssetFilter {
    fn matches(&self, asset: &Asset) -> bool {
        self.status.map_or(true, |status| asset.status == status)
            && self.asset_type.map_or(true, |t| asset.asset_type() == t)
            && self
                .visibility
                .map_or(true, |v| asset.visibility() == Some(v))
            && eq_ignore_case(&self.provider, asset.provider())
            && self.tag.as_ref().map_or(true, |tag| {
                asset.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
            })
            && contains_text(&self.search, &[&asset.name, &asset.id])
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanFilter {
    pub status: Option<ScanStatus>,
    pub runner_id: Option<String>,
    pub search: Option<String>,
}

impl ScanFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: ScanStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn runner_id(mut self, runner_id: impl Into<String>) -> Self {
        self.runner_id = Some(runner_id.into());
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = normalize(text);
        self
    }
}

impl Predicate<Scan> for ScanFilter {
    fn matches(&self, scan: &Scan) -> bool {
        self.status.map_or(true, |status| scan.status == status)
            && self
                .runner_id
                .as_ref()
                .map_or(true, |id| scan.runner_id.as_ref() == Some(id))
            && contains_text(&self.search, &[&scan.name, &scan.id])
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunnerFilter {
    pub status: Option<RunnerStatus>,
    pub provider: Option<String>,
    pub search: Option<String>,
}

impl RunnerFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: RunnerStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = normalize(provider);
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = normalize(text);
        self
    }
}

impl Predicate<Runner> for RunnerFilter {
    fn matches(&self, runner: &Runner) -> bool {
        self.status.map_or(true, |status| runner.status == status)
            && eq_ignore_case(&self.provider, Some(runner.provider.as_str()))
            && contains_text(&self.search, &[&runner.name, &runner.id])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posture_core::AssetKind;

    fn project(id: &str, name: &str, visibility: Visibility) -> Asset {
        Asset::new(
            id,
            name,
            AssetKind::Project {
                repository: None,
                visibility,
            },
        )
    }

    #[test]
    fn test_empty_filter_accepts_all() {
        let filter = AssetFilter::new();
        assert!(filter.matches(&Asset::domain("a-1", "example.com")));
        assert!(ScanFilter::new().matches(&Scan::new("nightly")));
        assert!(RunnerFilter::new().matches(&Runner::new(
            "r-1",
            "runner",
            RunnerStatus::Offline,
            "aws"
        )));
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_and_id() {
        let asset = Asset::domain("ASSET-42", "Api.Example.com");
        assert!(AssetFilter::new().search("EXAMPLE").matches(&asset));
        assert!(AssetFilter::new().search("asset-4").matches(&asset));
        assert!(!AssetFilter::new().search("shop").matches(&asset));
        assert!(AssetFilter::new().search("   ").matches(&asset));
    }

    #[test]
    fn test_asset_fields_combine_with_and() {
        let public = project("p-1", "web", Visibility::Public).with_tag("Prod");
        let private = project("p-2", "web-internal", Visibility::Private)
            .with_status(AssetStatus::Archived);

        let filter = AssetFilter::new()
            .asset_type(AssetType::Project)
            .visibility(Visibility::Public)
            .tag("prod");
        assert!(filter.matches(&public));
        assert!(!filter.matches(&private));

        let filter = AssetFilter::new().status(AssetStatus::Archived).search("web");
        assert!(!filter.matches(&public));
        assert!(filter.matches(&private));
    }

    #[test]
    fn test_visibility_requires_project() {
        let filter = AssetFilter::new().visibility(Visibility::Private);
        assert!(!filter.matches(&Asset::domain("d-1", "example.com")));
    }

    #[test]
    fn test_provider_filter() {
        let credential = Asset::new(
            "c-1",
            "deploy-key",
            AssetKind::Credential {
                provider: "GitHub".to_string(),
            },
        );
        assert!(AssetFilter::new().provider("github").matches(&credential));
        assert!(!AssetFilter::new().provider("gitlab").matches(&credential));
        assert!(!AssetFilter::new()
            .provider("github")
            .matches(&Asset::domain("d-1", "example.com")));

        let runner = Runner::new("r-1", "builder", RunnerStatus::Busy, "aws");
        assert!(RunnerFilter::new()
            .provider("AWS")
            .status(RunnerStatus::Busy)
            .matches(&runner));
        assert!(!RunnerFilter::new()
            .status(RunnerStatus::Online)
            .matches(&runner));
    }

    #[test]
    fn test_scan_filter() {
        let mut scan = Scan::new("Weekly perimeter").with_status(ScanStatus::Running);
        scan.runner_id = Some("r-7".to_string());

        assert!(ScanFilter::new().runner_id("r-7").matches(&scan));
        assert!(!ScanFilter::new().runner_id("r-8").matches(&scan));
        assert!(ScanFilter::new()
            .status(ScanStatus::Running)
            .search("perimeter")
            .matches(&scan));
        assert!(!ScanFilter::new()
            .status(ScanStatus::Completed)
            .matches(&scan));
    }
}
