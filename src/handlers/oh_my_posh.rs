//! Prompt theme engine: font, shell profile hook and terminal font face.
use anyhow::Result;
use serde_json::Value;

use super::{Handler, SettingOutcome, converge, expand_home, optional_str, required_str};
use crate::config::Settings;
use crate::engine::Context;
use crate::resources::font::FontResource;
use crate::resources::json_property::JsonPropertyResource;
use crate::resources::profile_line::ProfileLineResource;

/// Key path of the default font face in Windows Terminal settings.
const TERMINAL_FONT_KEY: &str = "profiles.defaults.font.face";

/// Installs a font, hooks the prompt into the shell profile and points the
/// terminal at the font.
#[derive(Debug)]
pub struct OhMyPoshHandler;

/// The registered instance.
pub static OH_MY_POSH: OhMyPoshHandler = OhMyPoshHandler;

impl Handler for OhMyPoshHandler {
    fn name(&self) -> &'static str {
        "oh-my-posh"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["ohmyposh", "posh"]
    }

    fn apply(&self, settings: &Settings, ctx: &Context) -> Result<Vec<SettingOutcome>> {
        let font_name = required_str(settings, "fontName")?;
        let font_face = optional_str(settings, "fontFace")?.unwrap_or(font_name);
        let profile_path = optional_str(settings, "profilePath")?.map_or_else(
            || ctx.platform.default_profile_path(&ctx.home),
            |p| expand_home(p, &ctx.home),
        );
        let init_line = optional_str(settings, "initLine")?
            .unwrap_or_else(|| ctx.platform.default_prompt_init_line());
        let terminal_path = optional_str(settings, "terminalSettingsPath")?.map_or_else(
            || ctx.platform.default_terminal_settings_path(&ctx.home),
            |p| expand_home(p, &ctx.home),
        );

        let font = FontResource::new(
            font_name.to_string(),
            ctx.platform.font_source(),
            &*ctx.executor,
        );
        let profile = ProfileLineResource::new(profile_path, init_line.to_string());
        let terminal = JsonPropertyResource::new(
            terminal_path,
            TERMINAL_FONT_KEY,
            Value::String(font_face.to_string()),
        );

        Ok(vec![
            converge(ctx, "font", &font),
            converge(ctx, "profile", &profile),
            converge(ctx, "terminal", &terminal),
        ])
    }
}
