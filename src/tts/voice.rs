#[cfg(windows)]
use std::path::Path;

#[cfg(windows)]
use log::debug;

/// Identity of an installed voice.
#[derive(Debug, Hash, PartialEq, Eq, Clone)]
pub struct VoiceInfo {
    /// Engine identifier. For OneCore voices this is the path of the voice's registry key.
    pub id: String,
    /// Human-readable name.
    pub display_name: String,
    /// BCP-47 language tag, e.g. `en-US`.
    pub language: String,
}

impl VoiceInfo {
    /// The `id:displayName` form used when voices are listed across the flat ABI.
    pub fn to_abi_entry(&self) -> String {
        format!("{}:{}", self.id, self.display_name)
    }
}

/// Checks that the voice's registry key exists and that the data files it points to are present.
/// Voices whose data was removed still show up in the engine's list, but fail to speak.
#[cfg(windows)]
pub fn is_voice_valid(id: &str) -> bool {
    let Some((lang_data, voice)) = voice_data_paths(id) else {
        return false;
    };
    let lang_data = expand_env_vars(&lang_data);
    if !Path::new(&lang_data).is_file() {
        debug!("Missing language data file: {}", lang_data);
        return false;
    }
    let voice = format!("{}.apm", expand_env_vars(&voice));
    if !Path::new(&voice).is_file() {
        debug!("Missing voice file: {}", voice);
        return false;
    }
    true
}

/// There is no registry to consult here, so every voice is considered valid.
#[cfg(not(windows))]
pub fn is_voice_valid(_id: &str) -> bool {
    true
}

/// Splits a registry path like `HKEY_LOCAL_MACHINE\SOFTWARE\...` into its root key name and
/// subkey.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn split_registry_path(id: &str) -> Option<(&str, &str)> {
    let (root, subkey) = id.split_once('\\')?;
    if root.is_empty() || subkey.is_empty() {
        return None;
    }
    Some((root, subkey))
}

/// Expands `%NAME%` references to environment variables. Unknown variables are left intact.
pub fn expand_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find('%') {
        result.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(end) => {
                let name = &after[..end];
                match std::env::var(name) {
                    Ok(value) if !name.is_empty() => result.push_str(&value),
                    _ => {
                        result.push('%');
                        result.push_str(name);
                        result.push('%');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);
    result
}

#[cfg(windows)]
fn voice_data_paths(id: &str) -> Option<(String, String)> {
    use winreg::enums::{
        HKEY_CLASSES_ROOT, HKEY_CURRENT_CONFIG, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, HKEY_USERS,
    };
    use winreg::RegKey;

    let (root, subkey) = split_registry_path(id)?;
    let root = match root {
        "HKEY_LOCAL_MACHINE" => HKEY_LOCAL_MACHINE,
        "HKEY_CURRENT_USER" => HKEY_CURRENT_USER,
        "HKEY_CLASSES_ROOT" => HKEY_CLASSES_ROOT,
        "HKEY_USERS" => HKEY_USERS,
        "HKEY_CURRENT_CONFIG" => HKEY_CURRENT_CONFIG,
        other => {
            debug!("Unknown registry root {} in voice id {}", other, id);
            return None;
        }
    };
    let key = match RegKey::predef(root).open_subkey(subkey) {
        Ok(key) => key,
        Err(err) => {
            debug!("Could not open registry key {}: {}", id, err);
            return None;
        }
    };
    let read = |name: &str| match key.get_value::<String, _>(name) {
        Ok(value) if !value.is_empty() => Some(value),
        Ok(_) => {
            debug!("Empty registry value {} for voice {}", name, id);
            None
        }
        Err(err) => {
            debug!("Could not read registry value {} for voice {}: {}", name, id, err);
            None
        }
    };
    Some((read("langDataPath")?, read("voicePath")?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_path_splits_at_first_separator() {
        let id = r"HKEY_LOCAL_MACHINE\SOFTWARE\Microsoft\Speech_OneCore\Voices\Tokens\X";
        assert_eq!(
            Some(("HKEY_LOCAL_MACHINE", r"SOFTWARE\Microsoft\Speech_OneCore\Voices\Tokens\X")),
            split_registry_path(id)
        );
        assert_eq!(None, split_registry_path("HKEY_LOCAL_MACHINE"));
        assert_eq!(None, split_registry_path(r"\SOFTWARE"));
    }

    #[test]
    fn env_vars_expand_and_unknown_ones_stay() {
        std::env::set_var("ONECORE_SPEECH_TEST_ROOT", r"C:\Windows");
        assert_eq!(
            r"C:\Windows\Speech_OneCore\Engines\TTS\en-US\M1033Zira",
            expand_env_vars(r"%ONECORE_SPEECH_TEST_ROOT%\Speech_OneCore\Engines\TTS\en-US\M1033Zira")
        );
        assert_eq!("%NO_SUCH_VAR_HOPEFULLY%\\x", expand_env_vars("%NO_SUCH_VAR_HOPEFULLY%\\x"));
        assert_eq!("50% done", expand_env_vars("50% done"));
        assert_eq!("%%", expand_env_vars("%%"));
    }
}
