//! `set` / `unset` for display settings and `config` for config.toml.

use std::error::Error;

use crate::cli::ConfigCommands;
use crate::core::config::data::CONFIG_KEYS;
use crate::core::config::Config;
use crate::core::settings::{Settings, SETTING_KEYS};
use crate::core::store::Repository;

pub fn set(repository: &Repository, key: Option<&str>, value: &str) -> Result<(), Box<dyn Error>> {
    let mut settings = repository.load_settings();
    let Some(key) = key else {
        settings.print_all();
        return Ok(());
    };
    if value.trim().is_empty() {
        return Err(format!("A value is required for '{key}'").into());
    }

    apply(&mut settings, |s| s.set(key, value))?;
    save(repository, &settings)?;
    println!("✅ Set {key} to: {}", value.trim());
    Ok(())
}

pub fn unset(repository: &Repository, key: &str) -> Result<(), Box<dyn Error>> {
    let mut settings = repository.load_settings();
    apply(&mut settings, |s| s.unset(key))?;
    save(repository, &settings)?;
    println!("✅ Reset {key}");
    Ok(())
}

fn apply<F>(settings: &mut Settings, change: F) -> Result<(), String>
where
    F: FnOnce(&mut Settings) -> Result<(), String>,
{
    change(settings).map_err(|err| format!("{err}\nAvailable settings: {}", SETTING_KEYS.join(", ")))
}

fn save(repository: &Repository, settings: &Settings) -> Result<(), Box<dyn Error>> {
    if repository.save_settings(settings) {
        Ok(())
    } else {
        Err("Failed to save settings".into())
    }
}

pub fn config(mut config: Config, command: Option<ConfigCommands>) -> Result<(), Box<dyn Error>> {
    match command {
        None => {
            config.print_all();
            println!();
            println!("Keys: {}", CONFIG_KEYS.join(", "));
        }
        Some(ConfigCommands::Set { key, value }) => {
            config.set_value(&key, &value)?;
            config.save()?;
            println!("✅ Set {key} to: {}", value.trim());
        }
        Some(ConfigCommands::Unset { key }) => {
            config.unset_value(&key)?;
            config.save()?;
            println!("✅ Unset {key}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::Theme;
    use crate::core::store::MemoryStore;

    fn repository() -> Repository {
        Repository::new(Box::new(MemoryStore::new()))
    }

    #[test]
    fn set_and_unset_round_trip_through_store() {
        let repo = repository();
        set(&repo, Some("theme"), "dark").unwrap();
        set(&repo, Some("show-timestamps"), "off").unwrap();

        let settings = repo.load_settings();
        assert_eq!(settings.theme, Theme::Dark);
        assert!(!settings.show_timestamps);

        unset(&repo, "theme").unwrap();
        assert_eq!(repo.load_settings().theme, Theme::Light);
        assert!(!repo.load_settings().show_timestamps);
    }

    #[test]
    fn invalid_input_is_reported_and_not_saved() {
        let repo = repository();
        let err = set(&repo, Some("colour"), "blue").unwrap_err();
        assert!(err.to_string().contains("Available settings: theme"));
        assert!(set(&repo, Some("auto-scroll"), "maybe").is_err());
        assert!(set(&repo, Some("language"), " ").is_err());
        assert_eq!(repo.load_settings(), Settings::default());
    }
}
