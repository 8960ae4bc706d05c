//! Named device operations on top of [`FsapiClient::call`].

use crate::api::{Node, Transport};
use crate::client::{lock, FsapiClient};
use crate::config::Cooldown;
use crate::error::{FsapiError, Result};
use crate::fsapi_xml::{encode_bool, ListItem};
use crate::list::ListReader;
use crate::models::{Equaliser, PlayControl, PlayState, PlayerMode, Preset};
use crate::nav::{NavPath, NavStep};

/// Navigate value selecting the parent folder.
const NAV_PARENT: &str = "0xffffffff";

fn check_range(what: &str, value: i32, min: i32, max: i32) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(FsapiError::InvalidArgument(format!(
            "{} must be within [{}, {}], got {}",
            what, min, max, value
        )))
    }
}

impl<T: Transport> FsapiClient<T> {
    // sys

    pub fn friendly_name(&self) -> Result<Option<String>> {
        self.handle_text(Node::FriendlyName)
    }

    pub fn set_friendly_name(&self, value: &str) -> Result<bool> {
        self.handle_set(Node::FriendlyName, value, Cooldown::Write)
    }

    pub fn version(&self) -> Result<Option<String>> {
        self.handle_text(Node::Version)
    }

    pub fn radio_id(&self) -> Result<Option<String>> {
        self.handle_text(Node::RadioId)
    }

    pub fn power(&self) -> Result<Option<bool>> {
        self.handle_bool(Node::Power)
    }

    pub fn set_power(&self, on: bool) -> Result<bool> {
        self.handle_set(Node::Power, encode_bool(on), Cooldown::SlowWrite)
    }

    /// Seconds until the device goes to standby, 0 if no sleep timer is set.
    pub fn sleep(&self) -> Result<Option<u32>> {
        self.handle_long(Node::Sleep)
    }

    pub fn set_sleep(&self, seconds: u32) -> Result<bool> {
        self.handle_set(Node::Sleep, seconds, Cooldown::Write)
    }

    // volume

    /// Number of volume steps, the maximum volume is one less. Cached.
    pub fn volume_steps(&self) -> Result<Option<u8>> {
        self.volume_steps
            .get_or_fetch(|| self.handle_int(Node::VolumeSteps))
    }

    pub fn volume(&self) -> Result<Option<u8>> {
        self.handle_int(Node::Volume)
    }

    pub fn set_volume(&self, value: u8) -> Result<bool> {
        self.handle_set(Node::Volume, value, Cooldown::Write)
    }

    pub fn mute(&self) -> Result<Option<bool>> {
        self.handle_bool(Node::Mute)
    }

    pub fn set_mute(&self, muted: bool) -> Result<bool> {
        self.handle_set(Node::Mute, encode_bool(muted), Cooldown::Write)
    }

    // play

    pub fn play_status(&self) -> Result<Option<PlayState>> {
        Ok(self.handle_int(Node::PlayStatus)?.and_then(PlayState::from_u8))
    }

    pub fn play_name(&self) -> Result<Option<String>> {
        self.handle_text(Node::PlayName)
    }

    pub fn play_text(&self) -> Result<Option<String>> {
        self.handle_text(Node::PlayText)
    }

    pub fn play_artist(&self) -> Result<Option<String>> {
        self.handle_text(Node::PlayArtist)
    }

    pub fn play_album(&self) -> Result<Option<String>> {
        self.handle_text(Node::PlayAlbum)
    }

    pub fn play_graphic(&self) -> Result<Option<String>> {
        self.handle_text(Node::PlayGraphicUri)
    }

    /// Duration of the current track in milliseconds.
    pub fn play_duration(&self) -> Result<Option<u32>> {
        self.handle_long(Node::PlayDuration)
    }

    /// Position within the current track. The upper bound is
    /// [`FsapiClient::play_duration`].
    pub fn play_position(&self) -> Result<Option<u32>> {
        self.handle_long(Node::Position)
    }

    pub fn set_play_position(&self, value: u32) -> Result<bool> {
        self.handle_set(Node::Position, value, Cooldown::Write)
    }

    /// Negative values rewind, 0 pauses, 1 is normal speed, above fast forwards.
    pub fn play_rate(&self) -> Result<Option<i32>> {
        self.handle_signed_long(Node::Rate)
    }

    pub fn set_play_rate(&self, value: i32) -> Result<bool> {
        check_range("play rate", value, -127, 127)?;
        self.handle_set(Node::Rate, value, Cooldown::Write)
    }

    pub fn play_shuffle(&self) -> Result<Option<bool>> {
        Ok(self.handle_int(Node::Shuffle)?.map(|v| v == 1))
    }

    pub fn set_play_shuffle(&self, value: bool) -> Result<bool> {
        self.handle_set(Node::Shuffle, encode_bool(value), Cooldown::Write)
    }

    pub fn play_repeat(&self) -> Result<Option<bool>> {
        Ok(self.handle_int(Node::Repeat)?.map(|v| v == 1))
    }

    pub fn set_play_repeat(&self, value: bool) -> Result<bool> {
        self.handle_set(Node::Repeat, encode_bool(value), Cooldown::Write)
    }

    pub fn play_control(&self, control: PlayControl) -> Result<bool> {
        self.handle_set(Node::PlayControl, control as u8, Cooldown::Write)
    }

    pub fn play(&self) -> Result<bool> {
        self.play_control(PlayControl::Play)
    }

    pub fn pause(&self) -> Result<bool> {
        self.play_control(PlayControl::Pause)
    }

    pub fn forward(&self) -> Result<bool> {
        self.play_control(PlayControl::Next)
    }

    pub fn rewind(&self) -> Result<bool> {
        self.play_control(PlayControl::Prev)
    }

    // modes

    /// Modes supported by the device. Fetched once, they never change.
    pub fn modes(&self) -> Result<Vec<PlayerMode>> {
        let modes = self.modes.get_or_fetch(|| {
            let modes = self
                .handle_list(Node::ValidModes)
                .map(|item| item.map(PlayerMode::from))
                .collect::<Result<Vec<_>>>()?;
            Ok(Some(modes))
        })?;
        Ok(modes.unwrap_or_default())
    }

    pub fn mode(&self) -> Result<Option<PlayerMode>> {
        let key = match self.handle_long(Node::Mode)? {
            None => return Ok(None),
            Some(key) => key.to_string(),
        };
        self.modes()?
            .into_iter()
            .find(|mode| mode.key == key)
            .map(Some)
            .ok_or_else(|| FsapiError::ProtocolError(format!("could not find mode {} in modes list", key)))
    }

    /// Switches to the mode with the given key. The device leaves any folder
    /// it was browsing, so the navigation path starts over.
    pub fn set_mode(&self, key: &str) -> Result<bool> {
        let mut nav = lock(&self.nav);
        let accepted = self.handle_set(Node::Mode, key, Cooldown::SlowWrite)?;
        nav.reset();
        Ok(accepted)
    }

    // equaliser

    /// Equaliser presets of the device. Fetched once, they never change.
    pub fn equalisers(&self) -> Result<Vec<Equaliser>> {
        let equalisers = self.equalisers.get_or_fetch(|| {
            let equalisers = self
                .handle_list(Node::EqPresets)
                .map(|item| item.map(Equaliser::from))
                .collect::<Result<Vec<_>>>()?;
            Ok(Some(equalisers))
        })?;
        Ok(equalisers.unwrap_or_default())
    }

    pub fn eq_preset(&self) -> Result<Option<Equaliser>> {
        let key = match self.handle_int(Node::EqPreset)? {
            None => return Ok(None),
            Some(key) => key.to_string(),
        };
        self.equalisers()?
            .into_iter()
            .find(|eq| eq.key == key)
            .map(Some)
            .ok_or_else(|| {
                FsapiError::ProtocolError(format!("could not find equaliser {} in equaliser list", key))
            })
    }

    pub fn set_eq_preset(&self, key: &str) -> Result<bool> {
        self.handle_set(Node::EqPreset, key, Cooldown::Write)
    }

    /// Only has an effect with the "My EQ" preset.
    pub fn eq_loudness(&self) -> Result<Option<bool>> {
        self.handle_bool(Node::EqLoudness)
    }

    pub fn set_eq_loudness(&self, value: bool) -> Result<bool> {
        self.handle_set(Node::EqLoudness, encode_bool(value), Cooldown::Write)
    }

    pub fn bass(&self) -> Result<Option<i32>> {
        self.handle_signed_long(Node::Bass)
    }

    pub fn set_bass(&self, value: i32) -> Result<bool> {
        check_range("bass", value, -14, 14)?;
        self.handle_set(Node::Bass, value, Cooldown::Write)
    }

    pub fn treble(&self) -> Result<Option<i32>> {
        self.handle_signed_long(Node::Treble)
    }

    pub fn set_treble(&self, value: i32) -> Result<bool> {
        check_range("treble", value, -14, 14)?;
        self.handle_set(Node::Treble, value, Cooldown::Write)
    }

    // -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-
    // folder navigation

    /// Turns on the navigation mode unless the device already is in it.
    /// Turning it on moves the device to the root folder.
    fn enable_nav_if_necessary(&self, nav: &mut NavPath) -> Result<()> {
        if self.handle_int(Node::NavState)? != Some(1) {
            // switching into navigation can be very slow
            self.handle_set(Node::NavState, 1u8, Cooldown::SlowWrite)?;
            nav.reset();
        }
        Ok(())
    }

    fn nav_step(&self, nav: &mut NavPath, step: NavStep) -> Result<bool> {
        let result = match step {
            NavStep::Child(key) => self.handle_set(Node::Navigate, key, Cooldown::SlowWrite)?,
            NavStep::Parent => self.handle_set(Node::Navigate, NAV_PARENT, Cooldown::SlowWrite)?,
        };
        nav.apply(step);
        Ok(result)
    }

    pub fn nav_numitems(&self) -> Result<Option<i32>> {
        let mut nav = lock(&self.nav);
        self.enable_nav_if_necessary(&mut nav)?;
        self.handle_signed_long(Node::NavNumItems)
    }

    /// Entries of the current folder.
    pub fn nav_list(&self) -> Result<ListReader<'_, T>> {
        self.enable_nav_if_necessary(&mut lock(&self.nav))?;
        Ok(self.handle_list(Node::NavList))
    }

    pub fn nav_select_folder(&self, key: u32) -> Result<bool> {
        let mut nav = lock(&self.nav);
        self.enable_nav_if_necessary(&mut nav)?;
        self.nav_step(&mut nav, NavStep::Child(key))
    }

    pub fn nav_select_parent_folder(&self) -> Result<bool> {
        let mut nav = lock(&self.nav);
        self.enable_nav_if_necessary(&mut nav)?;
        self.nav_step(&mut nav, NavStep::Parent)
    }

    pub fn nav_select_item(&self, key: u32) -> Result<bool> {
        let mut nav = lock(&self.nav);
        self.enable_nav_if_necessary(&mut nav)?;
        self.handle_set(Node::SelectItem, key, Cooldown::SlowWrite)
    }

    /// Leaves the navigation mode.
    pub fn nav_reset(&self) -> Result<bool> {
        let mut nav = lock(&self.nav);
        let accepted = self.handle_set(Node::NavState, 0u8, Cooldown::Write)?;
        nav.reset();
        Ok(accepted)
    }

    /// Navigates from the current folder to `path` in as few steps as possible.
    /// Returns the result of the last step, `None` if already there.
    pub fn nav_select_folder_via_path(&self, path: &[u32]) -> Result<Option<bool>> {
        let mut nav = lock(&self.nav);
        self.enable_nav_if_necessary(&mut nav)?;
        self.reconcile(&mut nav, path)
    }

    fn reconcile(&self, nav: &mut NavPath, path: &[u32]) -> Result<Option<bool>> {
        tracing::debug!("navigating to {:?}, currently in {:?}", path, nav.as_slice());
        let mut result = None;
        for step in nav.plan(path) {
            result = Some(self.nav_step(nav, step)?);
        }
        Ok(result)
    }

    /// Selects the item at the end of `path`, navigating to its folder first.
    pub fn nav_select_item_via_path(&self, path: &[u32]) -> Result<bool> {
        let (item, folder) = path
            .split_last()
            .ok_or_else(|| FsapiError::InvalidArgument("item path must not be empty".to_string()))?;
        let mut nav = lock(&self.nav);
        self.enable_nav_if_necessary(&mut nav)?;
        self.reconcile(&mut nav, folder)?;
        self.handle_set(Node::SelectItem, *item, Cooldown::SlowWrite)
    }

    // presets

    /// Stored presets of the current mode. Not cached, they differ per mode.
    pub fn presets(&self) -> Result<Vec<Preset>> {
        let mut nav = lock(&self.nav);
        self.enable_nav_if_necessary(&mut nav)?;
        let mut presets = Vec::new();
        for item in self.handle_list(Node::Presets) {
            let item: ListItem = item?;
            if let Some(preset) = Preset::from_list_item(&item)? {
                presets.push(preset);
            }
        }
        Ok(presets)
    }

    pub fn select_preset(&self, key: u32) -> Result<bool> {
        let mut nav = lock(&self.nav);
        self.enable_nav_if_necessary(&mut nav)?;
        self.handle_set(Node::SelectPreset, key, Cooldown::SlowWrite)
    }
}
