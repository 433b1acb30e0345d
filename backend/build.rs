use std::fs;
use std::path::Path;

/// Copies the trunk output of the membership frontend into `static/dist`,
/// where `include_dir!` embeds it into the server binary.
fn main() {
    let bundle = Path::new("../frontend/dist");
    let embed_root = Path::new("static");

    if bundle.exists() {
        let _ = fs::remove_dir_all(embed_root);
        fs::create_dir_all(embed_root).expect("create static dir");
        let options = fs_extra::dir::CopyOptions::new().overwrite(true).copy_inside(true);
        if let Err(e) = fs_extra::dir::copy(bundle, embed_root, &options) {
            panic!("copying frontend bundle failed: {}", e);
        }
    } else {
        println!("cargo:warning=frontend/dist not found; serving without the web client");
    }
    // include_dir! needs the directory even before the frontend is built.
    fs::create_dir_all(embed_root.join("dist")).expect("create static/dist");

    println!("cargo:rerun-if-changed=../frontend/dist");
    println!("cargo:rerun-if-changed=build.rs");
}
