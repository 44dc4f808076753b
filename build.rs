fn main() {
    // Rerun when the interpreter fixtures change so rstest's #[files] picks up new cases
    println!("cargo:rerun-if-changed=tests/fixtures");

    let fixture_dir = std::path::Path::new("tests/fixtures");
    let Ok(entries) = std::fs::read_dir(fixture_dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            println!("cargo:rerun-if-changed={}", path.display());
        }
    }
}
