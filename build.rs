use std::env;
use time::OffsetDateTime;

fn main() {
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");
    println!("cargo:rerun-if-env-changed=CARGO_PKG_VERSION");

    let build_year = env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|raw| raw.parse::<i64>().ok())
        .and_then(|epoch| OffsetDateTime::from_unix_timestamp(epoch).ok())
        .map(|dt| dt.year())
        .unwrap_or_else(|| OffsetDateTime::now_utc().year());

    let package_version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());
    let profile = env::var("PROFILE").unwrap_or_default();

    // Non-release builds carry a -dev suffix
    let display_version = if profile == "release" {
        package_version
    } else {
        format!("{package_version}-dev")
    };

    println!("cargo:rustc-env=LOCATOR_BUILD_YEAR={build_year}");
    println!("cargo:rustc-env=LOCATOR_VERSION_DISPLAY={display_version}");
}
