//! Helpers for rendering a single package version

use std::sync::LazyLock;

use regex::Regex;

use crate::registry::types::{Dependency, PackageRegistry, PackageVersion};

/// `<email>` fragments in maintainer strings
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("email pattern is valid"));

/// Maintainer without the email address: "Jane Doe <jane@example.com>" → "Jane Doe"
pub fn maintainer_display_name(maintainer: &str) -> String {
    EMAIL_RE.replace_all(maintainer, "").trim().to_string()
}

/// Dependencies worth showing, skipping names in `hidden` (e.g. `/bin/sh`)
pub fn visible_dependencies<'a>(
    record: &'a PackageVersion,
    hidden: &[String],
) -> Vec<&'a Dependency> {
    record
        .depends
        .iter()
        .filter(|dep| !hidden.contains(&dep.name))
        .collect()
}

/// Qualified dependencies that no version in the registry satisfies
///
/// Unqualified entries and names outside the registry are never reported.
pub fn unmet_dependencies<'a>(
    record: &'a PackageVersion,
    registry: &PackageRegistry,
) -> Vec<&'a Dependency> {
    record
        .depends
        .iter()
        .filter(|dep| dep.constraint.is_some())
        .filter(|dep| {
            registry
                .versions(&dep.name)
                .is_some_and(|versions| !versions.keys().any(|v| dep.is_satisfied_by(v)))
        })
        .collect()
}

/// Human-readable OS bounds: ">= 3.5 < 3.20", ">= 3.5", "< 3.20" or "All versions"
pub fn os_compatibility_label(record: &PackageVersion) -> String {
    match (record.os_min.as_deref(), record.os_max.as_deref()) {
        (Some(min), Some(max)) => format!(">= {min} < {max}"),
        (Some(min), None) => format!(">= {min}"),
        (None, Some(max)) => format!("< {max}"),
        (None, None) => "All versions".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::testing::{registry, version};
    use rstest::rstest;

    #[rstest]
    #[case("Jane Doe <jane@example.com>", "Jane Doe")]
    #[case("<bot@example.com> Build Bot", "Build Bot")]
    #[case("Plain Name", "Plain Name")]
    #[case("", "")]
    fn maintainer_display_name_strips_email(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(maintainer_display_name(input), expected);
    }

    #[test]
    fn visible_dependencies_skips_hidden_names() {
        let record = PackageVersion {
            depends: vec![
                Dependency::parse("/bin/sh"),
                Dependency::parse("qtfb>=1.0"),
                Dependency::parse("xovi"),
            ],
            ..Default::default()
        };

        let visible: Vec<String> = visible_dependencies(&record, &["/bin/sh".to_string()])
            .iter()
            .map(|d| d.to_string())
            .collect();

        assert_eq!(visible, vec!["qtfb>=1.0", "xovi"]);
    }

    #[test]
    fn unmet_dependencies_reports_unsatisfiable_qualifiers() {
        let registry = registry(vec![
            ("qtfb", vec![("1.0", version(None, None, &[])), ("1.2", version(None, None, &[]))]),
            ("xovi", vec![("0.2.0", version(None, None, &[]))]),
        ]);
        let record = version(
            None,
            None,
            &["/bin/sh", "qtfb>=1.1", "xovi>=0.3", "xovi", "ghost>=9", "qtfb~1.2"],
        );

        let unmet: Vec<String> = unmet_dependencies(&record, &registry)
            .iter()
            .map(|d| d.to_string())
            .collect();

        assert_eq!(unmet, vec!["xovi>=0.3"]);
    }

    #[rstest]
    #[case(Some("3.5"), Some("3.20"), ">= 3.5 < 3.20")]
    #[case(Some("3.5"), None, ">= 3.5")]
    #[case(None, Some("3.20"), "< 3.20")]
    #[case(None, None, "All versions")]
    fn os_compatibility_label_returns_expected(
        #[case] os_min: Option<&str>,
        #[case] os_max: Option<&str>,
        #[case] expected: &str,
    ) {
        let record = PackageVersion {
            os_min: os_min.map(str::to_string),
            os_max: os_max.map(str::to_string),
            ..Default::default()
        };

        assert_eq!(os_compatibility_label(&record), expected);
    }
}
