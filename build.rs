fn main() {
    // The storefront-web helper embeds WebView2 on Windows, which needs advapi32
    // at link time; some toolchains do not add it on their own.
    if cfg!(target_os = "windows") {
        println!("cargo:rustc-link-lib=advapi32");
    }
    println!("cargo:rerun-if-changed=assets/catalog.json");
}
