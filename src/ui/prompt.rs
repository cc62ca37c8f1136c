//! Interactive prompts for wizard mode.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow, ensure};
use cryptingtool::capability::{self, Algorithm, Mode, mode_description};
use cryptingtool::file::FileInfo;
use cryptingtool::types::Operation;
use inquire::validator::Validation;
use inquire::{Confirm, CustomUserError, Password, PasswordDisplayMode, Select};

pub struct Prompt {
    password_min_length: usize,
}

impl Prompt {
    pub fn new(password_min_length: usize) -> Self {
        Self { password_min_length }
    }

    pub fn select_operation(&self) -> Result<Operation> {
        Select::new("Select operation", Operation::ALL.to_vec()).prompt().map_err(|e| anyhow!("operation selection failed: {e}"))
    }

    pub fn select_file(&self, files: &[FileInfo]) -> Result<PathBuf> {
        ensure!(!files.is_empty(), "no files available for selection");

        let names: Vec<String> = files.iter().map(|file| format!("{} ({})", file.name(), file.formatted_size())).collect();
        let choice = Select::new("Select file", names).raw_prompt().map_err(|e| anyhow!("file selection failed: {e}"))?;

        Ok(files[choice.index].path().to_path_buf())
    }

    /// Offers `available` algorithms, described by name and strength.
    pub fn select_algorithm(&self, available: &[Algorithm]) -> Result<Algorithm> {
        ensure!(!available.is_empty(), "the engine supports no algorithms");

        let labels: Vec<String> = available
            .iter()
            .map(|&algorithm| {
                let info = capability::info(algorithm);
                format!("{:<14} {}", info.name, info.description)
            })
            .collect();
        let choice = Select::new("Select algorithm", labels).with_page_size(12).raw_prompt().map_err(|e| anyhow!("algorithm selection failed: {e}"))?;

        Ok(available[choice.index])
    }

    /// Asks for a key size only when `algorithm` has more than one.
    pub fn select_key_size(&self, algorithm: Algorithm) -> Result<u32> {
        match capability::supported_key_sizes(algorithm) {
            [only] => Ok(*only),
            sizes => Select::new("Select key size (bits)", sizes.to_vec()).prompt().map_err(|e| anyhow!("key size selection failed: {e}")),
        }
    }

    /// Asks for a mode only when `algorithm` has more than one.
    pub fn select_mode(&self, algorithm: Algorithm) -> Result<Mode> {
        let modes = capability::supported_modes(algorithm);
        if let [only] = modes {
            return Ok(*only);
        }

        let labels: Vec<String> = modes.iter().map(|&mode| format!("{mode:<4} {}", mode_description(mode))).collect();
        let choice = Select::new("Select mode", labels).raw_prompt().map_err(|e| anyhow!("mode selection failed: {e}"))?;

        Ok(modes[choice.index])
    }

    /// Encryption asks twice; decryption once.
    pub fn password(&self, operation: Operation) -> Result<String> {
        let min_length = self.password_min_length;
        let validator = move |input: &str| -> Result<Validation, CustomUserError> {
            if input.trim().is_empty() {
                return Ok(Validation::Invalid("password cannot be empty or whitespace only".into()));
            }
            if input.chars().count() < min_length {
                return Ok(Validation::Invalid(format!("password must be at least {min_length} characters long").into()));
            }
            Ok(Validation::Valid)
        };

        let prompt = Password::new(match operation {
            Operation::Encrypt => "Enter encryption password",
            Operation::Decrypt => "Enter decryption password",
        })
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_validator(validator);

        let prompt = match operation {
            Operation::Encrypt => prompt.with_custom_confirmation_message("Confirm password").with_custom_confirmation_error_message("passwords do not match"),
            Operation::Decrypt => prompt.without_confirmation(),
        };

        prompt.prompt().map_err(|e| anyhow!("password input failed: {e}"))
    }

    pub fn confirm_overwrite(&self, path: &Path) -> Result<bool> {
        let name = path.file_name().map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
        Confirm::new(&format!("Output file {name} already exists. Overwrite?")).with_default(false).prompt().map_err(|e| anyhow!("confirmation failed: {e}"))
    }
}
