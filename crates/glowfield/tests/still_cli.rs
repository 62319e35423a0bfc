use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Width and height from the IHDR chunk.
fn png_dimensions(path: &Path) -> (u32, u32) {
    let bytes = fs::read(path).expect("read png");
    assert!(bytes.len() > 24, "png too short");
    assert_eq!(bytes[..8], PNG_SIGNATURE);
    assert_eq!(&bytes[12..16], b"IHDR");
    let width = u32::from_be_bytes(bytes[16..20].try_into().unwrap());
    let height = u32::from_be_bytes(bytes[20..24].try_into().unwrap());
    (width, height)
}

fn glowfield(config_dir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_glowfield"));
    command
        .env("GLOWFIELD_CONFIG_DIR", config_dir)
        .env_remove("GLOWFIELD_CONFIG")
        .env("RUST_LOG", "warn");
    command
}

#[test]
fn still_writes_png_of_requested_size() {
    let root = TempDir::new().unwrap();
    let output = root.path().join("frames").join("field.png");

    let status = glowfield(root.path())
        .args(["still", "--size", "64x48", "--time", "2.5", "--output"])
        .arg(&output)
        .status()
        .expect("failed to run glowfield still");

    assert!(status.success());
    assert_eq!(png_dimensions(&output), (64, 48));
}

#[test]
fn still_is_deterministic() {
    let root = TempDir::new().unwrap();
    let first = root.path().join("a.png");
    let second = root.path().join("b.png");

    for output in [&first, &second] {
        let status = glowfield(root.path())
            .args(["still", "--size", "32x32", "--time", "7", "--output"])
            .arg(output)
            .status()
            .expect("failed to run glowfield still");
        assert!(status.success());
    }

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn still_reads_default_config_file() {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join("config.toml"),
        "version = 1\n[still]\nsize = \"20x10\"\ntime = \"1s\"\n",
    )
    .unwrap();
    let output = root.path().join("configured.png");

    let status = glowfield(root.path())
        .args(["still", "--output"])
        .arg(&output)
        .status()
        .expect("failed to run glowfield still");

    assert!(status.success());
    assert_eq!(png_dimensions(&output), (20, 10));
}

#[test]
fn invalid_config_fails_with_message() {
    let root = TempDir::new().unwrap();
    let config = root.path().join("broken.toml");
    fs::write(&config, "version = 1\n[field]\noctaves = 0\n").unwrap();
    let output = root.path().join("never.png");

    let result = glowfield(root.path())
        .arg("--config")
        .arg(&config)
        .args(["still", "--output"])
        .arg(&output)
        .output()
        .expect("failed to run glowfield still");

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("octaves"), "stderr: {stderr}");
    assert!(!output.exists());
}
