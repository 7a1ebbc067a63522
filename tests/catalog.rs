mod helper;

use helper::{RegistryBuilder, VersionSpec, write_document};
use vellum_index::catalog::{self, PackageFilter};
use vellum_index::registry::{Device, LoadError, loader};
use vellum_index::version::OsRelease;

fn registry() -> RegistryBuilder {
    RegistryBuilder::new()
        .version(
            "koreader",
            "2024.11",
            VersionSpec::new()
                .categories(&["reading"])
                .devices(&["rm1", "rm2"])
                .os(Some("3.3"), Some("3.20")),
        )
        .version(
            "koreader",
            "2025.04",
            VersionSpec::new()
                .categories(&["reading"])
                .devices(&["rm1", "rm2", "rmpp"])
                .os(Some("3.10"), None),
        )
        .version(
            "koreader",
            "2025.04_rc1",
            VersionSpec::new().categories(&["reading"]),
        )
        .version(
            "xovi-extensions",
            "1.0",
            VersionSpec::new()
                .categories(&["system"])
                .auto_install_only(),
        )
        .version(
            "calendar",
            "0.4.2",
            VersionSpec::new()
                .categories(&["productivity", "utils"])
                .devices(&["rmppm"])
                .author("someone-else")
                .os(Some("3.5"), Some("3.22")),
        )
}

#[test]
fn listing_omits_auto_install_only_packages() {
    let catalog = catalog::aggregate(&registry().build());

    assert!(catalog.packages.iter().all(|p| p.name != "xovi-extensions"));
    assert!(!catalog.categories.contains(&"system".to_string()));
    assert_eq!(catalog.packages.len(), 4);
}

#[test]
fn latest_version_ignores_release_candidates() {
    let catalog = catalog::aggregate(&registry().build());

    let latest = catalog.latest("koreader").unwrap();

    assert_eq!(latest.version, "2025.04");
    assert!(
        catalog
            .versions_of("koreader")
            .iter()
            .all(|p| p.latest_version == "2025.04")
    );
}

#[test]
fn facets_cover_listable_versions() {
    let catalog = catalog::aggregate(&registry().build());

    assert_eq!(catalog.categories, vec!["productivity", "reading", "utils"]);
    assert_eq!(
        catalog.devices,
        vec![Device::Rm1, Device::Rm2, Device::Rmpp, Device::Rmppm]
    );
    assert_eq!(
        catalog.os_domain,
        Some((OsRelease::new(3, 3), OsRelease::new(3, 21)))
    );
    assert_eq!(catalog.os_releases.first().map(String::as_str), Some("3.21"));
    assert_eq!(catalog.os_releases.last().map(String::as_str), Some("3.03"));
    assert_eq!(catalog.os_releases.len(), 19);
}

#[test]
fn filter_then_newest_per_package() {
    let catalog = catalog::aggregate(&registry().build());

    let filter = PackageFilter::default().with_os_release(OsRelease::parse("3.5"));
    let records = catalog::newest_per_package(catalog.filter(&filter));

    let listed: Vec<(&str, &str)> = records
        .iter()
        .map(|p| (p.name.as_str(), p.version.as_str()))
        .collect();
    assert_eq!(
        listed,
        vec![
            ("calendar", "0.4.2"),
            ("koreader", "2025.04_rc1"),
        ]
    );
}

#[test]
fn filter_by_device_and_search() {
    let catalog = catalog::aggregate(&registry().build());

    let filter = PackageFilter::default()
        .with_device(Device::Rmpp)
        .with_search("KOREADER");
    let records = catalog.filter(&filter);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].version, "2025.04");
}

#[test]
fn by_author_lists_latest_records() {
    let catalog = catalog::aggregate(&registry().build());

    let records = catalog.by_author("someone-else");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "calendar");
}

#[test]
fn from_path_loads_written_document() {
    let builder = registry();
    let (_temp_dir, path) = write_document(&builder);

    let document = loader::from_path(&path).unwrap();

    assert_eq!(document.packages.len(), 3);
    assert_eq!(
        document.generated_at().map(|at| at.to_rfc3339()),
        Some("2025-01-15T10:30:00+00:00".to_string())
    );
}

#[test]
fn from_path_reports_missing_file() {
    let temp_dir = tempfile::TempDir::new().unwrap();

    let result = loader::from_path(&temp_dir.path().join("missing.json"));

    assert!(matches!(result, Err(LoadError::Io { .. })));
}
