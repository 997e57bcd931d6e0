// Generate GL glue.
// From gl_generator README.
extern crate gl_generator;

use gl_generator::{Api, Fallbacks, GlobalGenerator, Profile, Registry};
use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn main() {
    let dest = env::var("OUT_DIR").unwrap();
    let mut file = File::create(Path::new(&dest).join("gl_bindings.rs")).unwrap();

    println!("cargo:rerun-if-changed=build.rs");

    let mut data = Vec::new();

    // Desktop GL, since glCreateTextures and friends are 4.5+ and never made it into ES.
    // Only the constants and scalar types are used, nothing is ever loaded.
    Registry::new(Api::Gl, (4, 6), Profile::Core, Fallbacks::All, [])
        .write_bindings(GlobalGenerator, &mut std::io::Cursor::new(&mut data))
        .expect("failed to generate gl bindings");

    let data = String::from_utf8(data).expect("gl bindings are invalid utf8");

    file.write_all(data.as_bytes())
        .expect("failed to write gl bindings");
}
