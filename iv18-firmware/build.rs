//! Build script for iv18-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates display.toml at compile time
//! - Embeds the validated configuration as postcard bytes

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use iv18_core::config::{ConfigError, DisplayConfig, MAX_PAGES};
use iv18_core::display::MAX_DIGITS;

/// Page names with a writer built into the firmware
const BUILTIN_PAGES: &[&str] = &["uptime", "blank"];

/// Upper bound for the encoded configuration
const CONFIG_BLOB_MAX: usize = 1024;

fn main() {
    setup_linker();
    let config = validate_config();
    embed_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate display.toml configuration at compile time
fn validate_config() -> DisplayConfig {
    // Re-run if display.toml changes
    println!("cargo:rerun-if-changed=display.toml");

    let config_path = Path::new("display.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: display.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a display.toml configuration file.        ║\n\
            ║  Please create one in the iv18-firmware directory.               ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read display.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse into the firmware's own config type, so unknown shapes and
    // over-long strings are caught here rather than on the device
    let config: DisplayConfig = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid display.toml                                     ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();

    if let Err(e) = config.validate() {
        errors.push(describe(e));
    }

    if let Some(pages) = &config.pages {
        for page in pages {
            if page.text.is_none() && !BUILTIN_PAGES.contains(&page.name.as_str()) {
                errors.push(format!(
                    "[[pages]] '{}' has no text and no built-in writer",
                    page.name
                ));
            }
        }
    }

    report("Invalid display configuration", &errors);

    println!("cargo:warning=display.toml validated successfully");
    config
}

/// Write the postcard blob and the digit count into OUT_DIR
fn embed_config(config: &DisplayConfig) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let mut buf = [0u8; CONFIG_BLOB_MAX];
    let bytes = match config.to_postcard(&mut buf) {
        Ok(bytes) => bytes,
        Err(_) => {
            report(
                "Configuration too large",
                &[format!("encoded display.toml exceeds {} bytes", CONFIG_BLOB_MAX)],
            );
            return;
        }
    };
    fs::write(out_dir.join("display_config.bin"), bytes).unwrap();

    fs::write(
        out_dir.join("display_digits.rs"),
        format!(
            "/// Digit count from display.toml\npub const DIGITS: usize = {};\n",
            config.digits
        ),
    )
    .unwrap();
}

/// Human-readable text for a validation failure
fn describe(error: ConfigError) -> String {
    match error {
        ConfigError::DuplicatePin(pin) => {
            format!("[hardware] GPIO{} is assigned to more than one line", pin)
        }
        ConfigError::DigitCount(n) => format!("digits = {} (must be 1-{})", n, MAX_DIGITS),
        ConfigError::IntensityOutOfRange(n) => format!("intensity = {} (must be 0-15)", n),
        ConfigError::ZeroUpdateInterval => "update_interval_ms must be greater than 0".into(),
        ConfigError::StepTooShort(us) => format!("multiplex_step_us = {} is too short", us),
        ConfigError::FlickerRate(us) => format!(
            "digits x multiplex_step_us = {}us, refresh below 60 Hz",
            us
        ),
        ConfigError::GuardTooLong(us) => {
            format!("blank_guard_us = {} must be shorter than a step", us)
        }
        ConfigError::EmptyPageList => "pages is present but empty".into(),
        ConfigError::EmptyPageName => "every page needs a name".into(),
        ConfigError::DuplicatePage => "two pages share a name".into(),
        ConfigError::TooManyPages => format!("at most {} pages", MAX_PAGES),
        ConfigError::InvalidLayout => "word layout does not fit the register".into(),
        ConfigError::Decode => "configuration could not be decoded".into(),
    }
}

/// Panic with a boxed list of errors, if there are any
fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
