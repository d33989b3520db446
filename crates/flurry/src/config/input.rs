//! Supporting user-defined keybindings.

/// The user config for defining keybindings.
#[derive(serde::Serialize, serde::Deserialize, PartialEq, Eq, Debug, Clone)]
pub(crate) struct KeybindingConfigRaw {
    /// The modifier keys, like `CTRL`, `SHIFT`, etc.
    pub mods: Option<String>,
    /// The actual key, like a 'x' or `PageUp`.
    pub key: String,
}

/// All the possible actions a user can trigger in Flurry
#[derive(serde::Serialize, serde::Deserialize, PartialEq, Eq, Debug, Clone, Copy, Hash)]
#[serde(rename_all = "snake_case")]
pub(crate) enum KeybindingAction {
    /// Pause and hide every field, or bring them back.
    ToggleEnabled,
    /// Scatter every field's particles afresh.
    Reinitialise,
    /// Add particles to every field.
    MoreParticles,
    /// Remove particles from every field.
    FewerParticles,
    /// Exit Flurry.
    Quit,
}

/// All the active user-configured keybindings.
pub(crate) type KeybindingsRaw = std::collections::HashMap<KeybindingAction, KeybindingConfigRaw>;

/// The user keybindings converted to native `termwiz::input::KeyEvent`s.
pub(crate) type KeybindingsAsEvents =
    std::collections::HashMap<KeybindingAction, termwiz::input::KeyEvent>;

/// Find the action, if any, that a key press is bound to.
#[expect(clippy::iter_over_hash_type, reason = "Bindings are unique, so order doesn't matter")]
pub(crate) fn action_for(
    keybindings: &KeybindingsAsEvents,
    event: &termwiz::input::KeyEvent,
) -> Option<KeybindingAction> {
    for (action, binding) in keybindings {
        if binding == event {
            return Some(*action);
        }
    }
    None
}

impl TryFrom<KeybindingConfigRaw> for termwiz::input::KeyEvent {
    type Error = std::io::Error;

    /// `termwiz::input::KeyEvent` has no `impl From<String>`, but it does derive
    /// `serde::Deserialize`, so a `toml` value gets us from our config syntax to a real key event
    /// without mapping every keycode and modifier by hand.
    fn try_from(binding: KeybindingConfigRaw) -> std::result::Result<Self, Self::Error> {
        let key = if binding.key.chars().count() == 1 {
            let mut character = toml::Table::new();
            character.insert("Char".to_owned(), toml::Value::String(binding.key.clone()));
            toml::Value::Table(character)
        } else {
            toml::Value::String(binding.key.clone())
        };

        let mut modifiers = toml::Table::new();
        modifiers.insert("bits".to_owned(), toml::Value::Integer(0));
        let mut event = toml::Table::new();
        event.insert("modifiers".to_owned(), toml::Value::Table(modifiers));
        event.insert("key".to_owned(), key);

        let mut key_event: Self = toml::Value::Table(event).try_into().map_err(|error| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Couldn't parse keybinding ({binding:?}): {}", error.message()),
            )
        })?;

        if let Some(modifiers) = binding.mods {
            key_event.modifiers = modifiers.try_into().map_err(|error| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("Couldn't parse keybinding modifier: {error:?}"),
                )
            })?;
        }

        Ok(key_event)
    }
}
