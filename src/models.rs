use crate::error::{FsapiError, Result};
use crate::fsapi_xml::ListItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayState {
    Stopped,
    Loading,
    Playing,
    Paused,
}

impl PlayState {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(PlayState::Stopped),
            1 => Some(PlayState::Loading),
            2 => Some(PlayState::Playing),
            3 => Some(PlayState::Paused),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayState::Stopped => write!(f, "stopped"),
            PlayState::Loading => write!(f, "loading"),
            PlayState::Playing => write!(f, "playing"),
            PlayState::Paused => write!(f, "paused"),
        }
    }
}

/// Values of `netRemote.play.control`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayControl {
    Play = 1,
    Pause = 2,
    /// Next item of the playlist, or the next station on a higher frequency.
    Next = 3,
    /// Previous item of the playlist, or the next station on a lower frequency.
    Prev = 4,
}

/// A source the device can play from (Internet radio, DAB, Spotify, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerMode {
    pub key: String,
    pub id: String,
    pub label: String,
    pub selectable: Option<bool>,
    pub streamable: Option<bool>,
    pub modetype: Option<i64>,
}

impl From<ListItem> for PlayerMode {
    fn from(item: ListItem) -> Self {
        PlayerMode {
            id: item.text("id").unwrap_or_default().to_string(),
            label: item.text("label").unwrap_or_default().to_string(),
            selectable: item.int("selectable").map(|v| v != 0),
            streamable: item.int("streamable").map(|v| v != 0),
            modetype: item.int("modetype"),
            key: item.key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equaliser {
    pub key: String,
    pub label: String,
}

impl From<ListItem> for Equaliser {
    fn from(item: ListItem) -> Self {
        Equaliser {
            label: item.text("label").unwrap_or_default().to_string(),
            key: item.key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub key: u32,
    pub kind: Option<String>,
    pub name: String,
}

impl Preset {
    /// Returns `None` for empty preset slots.
    pub fn from_list_item(item: &ListItem) -> Result<Option<Self>> {
        let name = match item.text("name").map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Ok(None),
        };
        let key = item.key.parse::<u32>().map_err(|_| {
            FsapiError::ProtocolError(format!("preset key {:?} is not a number", item.key))
        })?;
        Ok(Some(Preset {
            key,
            kind: item.fields.get("type").map(|kind| kind.to_string()),
            name,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsapi_xml::DataItem;

    fn item(key: &str, fields: &[(&str, DataItem)]) -> ListItem {
        ListItem {
            key: key.to_string(),
            fields: fields
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        }
    }

    #[test]
    fn player_mode_from_item() {
        let mode = PlayerMode::from(item(
            "3",
            &[
                ("id", "Spotify".into()),
                ("label", "Spotify Connect".into()),
                ("selectable", 1u8.into()),
            ],
        ));
        assert_eq!(mode.key, "3");
        assert_eq!(mode.label, "Spotify Connect");
        assert_eq!(mode.selectable, Some(true));
        assert_eq!(mode.streamable, None);
    }

    #[test]
    fn presets_are_trimmed_and_empty_slots_skipped() {
        let preset = Preset::from_list_item(&item("2", &[("name", "  Radio Paradise ".into()), ("type", "IR".into())]))
            .unwrap()
            .unwrap();
        assert_eq!(preset.key, 2);
        assert_eq!(preset.name, "Radio Paradise");
        assert_eq!(preset.kind.as_deref(), Some("IR"));

        assert_eq!(Preset::from_list_item(&item("3", &[("name", "".into())])).unwrap(), None);
        assert_eq!(Preset::from_list_item(&item("4", &[])).unwrap(), None);
    }

    #[test]
    fn play_state_values() {
        assert_eq!(PlayState::from_u8(0), Some(PlayState::Stopped));
        assert_eq!(PlayState::from_u8(3), Some(PlayState::Paused));
        assert_eq!(PlayState::from_u8(9), None);
    }
}
