//! Office suite deployment through the vendor setup tool and an XML answer
//! file.
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::{Handler, SettingOutcome, SettingStatus, expand_home, optional_str, required_str};
use crate::config::Settings;
use crate::engine::Context;
use crate::error::SettingError;
use crate::resources::installer::{InstallerResource, absolute};
use crate::resources::{Resource, ResourceChange, ResourceState};

const STEP: &str = "install";

/// Runs `setup /configure <configurationFile>` once per run.
#[derive(Debug)]
pub struct OfficeHandler;

/// The registered instance.
pub static OFFICE: OfficeHandler = OfficeHandler;

impl Handler for OfficeHandler {
    fn name(&self) -> &'static str {
        "office"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["microsoft-office"]
    }

    fn apply(&self, settings: &Settings, ctx: &Context) -> Result<Vec<SettingOutcome>> {
        let answer_file = expand_home(required_str(settings, "configurationFile")?, &ctx.home);
        if !answer_file.is_file() {
            return Err(SettingError::Precondition(format!(
                "configuration file {} does not exist",
                answer_file.display()
            ))
            .into());
        }
        let answer_file = absolute(&answer_file)?;
        let setup = optional_str(settings, "setupPath")?
            .map_or_else(|| default_setup(&answer_file), |p| expand_home(p, &ctx.home));

        let installer = InstallerResource::new(setup, answer_file, &*ctx.executor);
        if let ResourceState::Invalid { reason } = installer.current_state()? {
            return Err(SettingError::Precondition(reason).into());
        }

        if ctx.is_dry_run() {
            ctx.log
                .dry_run(&format!("would run {}", installer.description()));
            return Ok(vec![SettingOutcome::new(STEP, SettingStatus::Applied)]);
        }

        ctx.log.info(&format!("running {}", installer.description()));
        let status = match installer.apply()? {
            ResourceChange::Applied => SettingStatus::Applied,
            ResourceChange::AlreadyCorrect => SettingStatus::Skipped,
            ResourceChange::Skipped { reason } => {
                return Err(SettingError::Apply {
                    key: STEP.to_string(),
                    reason,
                }
                .into());
            }
        };
        Ok(vec![SettingOutcome::new(STEP, status)])
    }
}

fn default_setup(answer_file: &Path) -> PathBuf {
    answer_file
        .parent()
        .map_or_else(|| PathBuf::from("setup.exe"), |dir| dir.join("setup.exe"))
}
