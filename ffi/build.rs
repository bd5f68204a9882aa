use std::env;
use std::path::PathBuf;

fn main() {
    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo"));
    let out = crate_dir.join("include").join("users_ffi.h");

    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    match cbindgen::generate(&crate_dir) {
        Ok(bindings) => {
            if let Some(dir) = out.parent() {
                if let Err(e) = std::fs::create_dir_all(dir) {
                    println!("cargo:warning=cannot create {}: {e}", dir.display());
                    return;
                }
            }
            let mut header = Vec::new();
            bindings.write(&mut header);
            if let Err(e) = std::fs::write(&out, header) {
                println!("cargo:warning=cannot write {}: {e}", out.display());
            }
        }
        Err(e) => println!("cargo:warning=header generation skipped: {e}"),
    }
}
