//! Build script for detecting system dependencies and providing installation guidance.
//!
//! The `opencv` crate links against the system library found through
//! pkg-config. The landmark models are loaded at runtime, so their absence is
//! only reported.

use std::env;
use std::path::Path;
use std::process::Command;

const MODEL_FILES: [&str; 2] = ["assets/hand_landmarks.onnx", "assets/face_landmarks.onnx"];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=assets");

    if pkg_config_version(&["--version"]).is_none() {
        println!("cargo:warning=pkg-config not found. It is required to locate OpenCV.");
        print_hint("pkg-config", "pkg-config");
    }

    check_opencv();
    check_models();

    println!(
        "cargo:rustc-env=BUILD_TARGET={}",
        env::var("TARGET").unwrap_or_default()
    );
}

/// Run pkg-config and return trimmed stdout on success
fn pkg_config_version(args: &[&str]) -> Option<String> {
    let output = Command::new("pkg-config").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn check_opencv() {
    println!("cargo:rerun-if-env-changed=PKG_CONFIG_PATH");
    println!("cargo:rerun-if-env-changed=OPENCV_LINK_PATHS");
    println!("cargo:rerun-if-env-changed=OPENCV_INCLUDE_PATHS");

    let found = ["opencv4", "opencv"]
        .iter()
        .find_map(|name| pkg_config_version(&["--modversion", name]));

    match found {
        Some(version) => println!("cargo:warning=Found OpenCV version: {version}"),
        None => {
            println!("cargo:warning=OpenCV not found via pkg-config. Make sure OpenCV is installed.");
            print_hint("libopencv-dev", "opencv");
        }
    }
}

fn check_models() {
    for model in MODEL_FILES {
        if !Path::new(model).exists() {
            println!("cargo:warning={model} is missing; pass --hand-model/--face-model at runtime");
        }
    }
}

fn print_hint(apt: &str, brew: &str) {
    println!("cargo:warning=On Ubuntu: sudo apt-get install {apt}");
    println!("cargo:warning=On macOS: brew install {brew}");
}
