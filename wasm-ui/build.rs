//! Build script to bake store settings and build information into the app.
//!
//! Forwards, when set in the build environment:
//! - SUPABASE_URL, SUPABASE_ANON_KEY, USERS_TABLE: Record Store connection
//!
//! Always sets:
//! - BUILD_COMMIT: short git commit SHA
//! - BUILD_TIMESTAMP: ISO 8601 timestamp

use std::env;
use std::process::Command;

const STORE_VARS: [&str; 3] = ["SUPABASE_URL", "SUPABASE_ANON_KEY", "USERS_TABLE"];

fn main() {
    for var in STORE_VARS {
        println!("cargo:rerun-if-env-changed={}", var);
        if let Ok(value) = env::var(var) {
            println!("cargo:rustc-env={}={}", var, value);
        }
    }

    // Get git short SHA
    let commit = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    // Get ISO timestamp
    let timestamp = Command::new("date")
        .arg("-u")
        .arg("+%Y-%m-%dT%H:%M:%SZ")
        .output()
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=BUILD_COMMIT={}", commit);
    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", timestamp);

    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=build.rs");
}
