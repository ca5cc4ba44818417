// File: crates/stockchart-core/build.rs
// Summary: Links the Windows system libraries Skia/ICU need when building the chart engine.

fn main() {
    #[cfg(target_os = "windows")]
    {
        // Needed for RegOpenKeyExW, RegQueryInfoKeyW, etc.
        println!("cargo:rustc-link-lib=advapi32");
    }
}
