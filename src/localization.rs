//! # Localization Module
//!
//! Fluent-based reply texts. Resources are compiled into the binary from
//! `locales/<lang>/main.ftl`; Russian is the default language.

use std::collections::HashMap;
use std::sync::OnceLock;

use anyhow::{anyhow, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use tracing::{error, warn};
use unic_langid::LanguageIdentifier;

use crate::config::DEFAULT_LANGUAGE;

/// Languages with a bundled resource file
pub const SUPPORTED_LANGUAGES: &[&str] = &["ru", "en"];

const RESOURCES: &[(&str, &str)] = &[
    ("ru", include_str!("../locales/ru/main.ftl")),
    ("en", include_str!("../locales/en/main.ftl")),
];

/// Localization manager for the cookbook bot
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
    default_language: String,
}

impl LocalizationManager {
    /// Create a manager with the bundled default language
    pub fn new() -> Result<Self> {
        Self::with_default(DEFAULT_LANGUAGE)
    }

    /// Create a manager falling back to `default_language`.
    ///
    /// Unsupported defaults resolve to the bundled default.
    pub fn with_default(default_language: &str) -> Result<Self> {
        let mut bundles = HashMap::new();
        for (lang, source) in RESOURCES {
            let locale: LanguageIdentifier = lang.parse()?;
            bundles.insert(lang.to_string(), Self::create_bundle(locale, source)?);
        }

        let default_language = if bundles.contains_key(default_language) {
            default_language.to_string()
        } else {
            warn!(language = default_language, "Unsupported default language, using {DEFAULT_LANGUAGE}");
            DEFAULT_LANGUAGE.to_string()
        };

        Ok(Self {
            bundles,
            default_language,
        })
    }

    fn create_bundle(locale: LanguageIdentifier, source: &str) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // Keep replies free of Unicode isolation marks around arguments
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("invalid {locale} resource: {errors:?}"))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("conflicting {locale} messages: {errors:?}"))?;
        Ok(bundle)
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn is_language_supported(&self, language: &str) -> bool {
        self.bundles.contains_key(language)
    }

    /// Map a Telegram language code (`en`, `en-US`, `ru`...) to a supported language
    pub fn detect_language(&self, language_code: Option<&str>) -> &str {
        language_code
            .and_then(|code| code.split(['-', '_']).next())
            .map(str::to_lowercase)
            .and_then(|primary| {
                self.bundles
                    .get_key_value(primary.as_str())
                    .map(|(lang, _)| lang.as_str())
            })
            .unwrap_or(self.default_language.as_str())
    }

    /// Get a localized message in a specific language, falling back to the default
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let bundle = match self
            .bundles
            .get(language)
            .or_else(|| self.bundles.get(&self.default_language))
        {
            Some(bundle) => bundle,
            None => return format!("Missing translation: {key}"),
        };

        let pattern = match bundle.get_message(key).and_then(|msg| msg.value()) {
            Some(pattern) => pattern,
            None => return format!("Missing translation: {key}"),
        };

        let fluent_args = args.map(|args| {
            let mut fluent_args = FluentArgs::new();
            for (name, value) in args {
                fluent_args.set(*name, FluentValue::from(*value));
            }
            fluent_args
        });

        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            warn!(key, ?errors, "Errors while formatting message");
        }
        value.into_owned()
    }

    /// Get a localized message in the default language
    pub fn get_message(&self, key: &str, args: Option<&HashMap<&str, &str>>) -> String {
        self.get_message_in_language(key, &self.default_language, args)
    }

    /// Every supported translation of `key`
    pub fn all_translations(&self, key: &str) -> Vec<String> {
        SUPPORTED_LANGUAGES
            .iter()
            .map(|lang| self.get_message_in_language(key, lang, None))
            .collect()
    }
}

static LOCALIZATION_MANAGER: OnceLock<LocalizationManager> = OnceLock::new();

/// Initialize the global localization manager with `default_language`.
///
/// Later calls keep the first manager.
pub fn init_localization(default_language: &str) -> Result<()> {
    let manager = LocalizationManager::with_default(default_language)?;
    let _ = LOCALIZATION_MANAGER.set(manager);
    Ok(())
}

/// Get the global localization manager, initializing it with defaults if needed
pub fn get_localization_manager() -> &'static LocalizationManager {
    LOCALIZATION_MANAGER.get_or_init(|| {
        LocalizationManager::new().unwrap_or_else(|e| {
            error!(error = %e, "Failed to load bundled translations");
            LocalizationManager {
                bundles: HashMap::new(),
                default_language: DEFAULT_LANGUAGE.to_string(),
            }
        })
    })
}

/// Convenience function to get a localized message for a Telegram language code
pub fn t_lang(key: &str, language_code: Option<&str>) -> String {
    let manager = get_localization_manager();
    manager.get_message_in_language(key, manager.detect_language(language_code), None)
}

/// Convenience function to get a localized message with arguments
pub fn t_args_lang(key: &str, args: &[(&str, &str)], language_code: Option<&str>) -> String {
    let manager = get_localization_manager();
    let args: HashMap<&str, &str> = args.iter().copied().collect();
    manager.get_message_in_language(key, manager.detect_language(language_code), Some(&args))
}
