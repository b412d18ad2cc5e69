//! Runtime version requirement handling for manifests

use semver::{Op, VersionReq};

/// Parse a manifest's runtime requirement (e.g. `>=3.11`, `^3.12`, `3.10`)
pub fn parse_requirement(requirement: &str) -> Option<VersionReq> {
    VersionReq::parse(requirement.trim()).ok()
}

/// Returns a warning message if the requirement cannot be understood
pub fn check_python_requirement(requirement: &str) -> Option<String> {
    if requirement.trim().is_empty() {
        return Some("python_version is empty".to_string());
    }

    match parse_requirement(requirement) {
        Some(_) => None,
        None => Some(format!(
            "python_version '{}' is not a valid version requirement",
            requirement
        )),
    }
}

/// Lowest `major.minor` allowed by the lower-bound comparators of a requirement
pub fn minimum_python(requirement: &str) -> Option<String> {
    let req = parse_requirement(requirement)?;

    req.comparators
        .iter()
        .filter(|c| {
            matches!(
                c.op,
                Op::Exact | Op::Greater | Op::GreaterEq | Op::Tilde | Op::Caret | Op::Wildcard
            )
        })
        .map(|c| (c.major, c.minor.unwrap_or(0)))
        .min()
        .map(|(major, minor)| format!("{}.{}", major, minor))
}
