// # Conference Provider
//
// Renders `conference.conf`:
//
// ```xml
// <advertise>
//   <room name="3001@$${domain}" status="switchconf"/>
// </advertise>
// <caller-controls>
//   <group name="default">
//     <control action="mute" digits="0"/>
//     ...
//   </group>
// </caller-controls>
// <profiles>
//   <profile name="default">
//     <param name="domain" value="$${domain}"/>
//     ...
//   </profile>
// </profiles>
// ```

use crate::document::Element;
use crate::error::{Error, Result};
use crate::providers::Param;
use crate::traits::ConfigProvider;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Section key served by this provider
pub const CONFERENCE_KEY: &str = "conference.conf";

/// Stock caller controls: (action, digits)
const DEFAULT_CONTROLS: &[(&str, &str)] = &[
    ("mute", "0"),
    ("deaf mute", "*"),
    ("energy up", "9"),
    ("energy equ", "8"),
    ("vol talk up", "3"),
    ("vol talk zero", "2"),
    ("vol talk dn", "1"),
    ("vol listen up", "6"),
    ("vol listen zero", "5"),
    ("vol listen dn", "4"),
    ("hangup", "#"),
];

/// Stock profiles: (name, sample rate)
const DEFAULT_PROFILES: &[(&str, u32)] = &[
    ("default", 8000),
    ("wideband", 16000),
    ("ultrawideband", 32000),
    ("cdquality", 48000),
];

/// A conference room announced to presence subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvertisedRoom {
    /// Room address, e.g. "3001@$${domain}"
    pub name: String,
    /// Presence status text
    pub status: String,
}

/// A DTMF binding inside a caller-control group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerControl {
    /// Conference action (e.g. "mute", "vol talk up")
    pub action: String,
    /// Digits that trigger it
    pub digits: String,
}

/// A named group of caller controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerControlGroup {
    /// Group name referenced by profiles
    pub name: String,
    /// Bindings in declaration order
    #[serde(default)]
    pub controls: Vec<CallerControl>,
}

impl CallerControlGroup {
    /// The stock `default` group
    pub fn default_group() -> Self {
        Self {
            name: "default".to_string(),
            controls: DEFAULT_CONTROLS
                .iter()
                .map(|(action, digits)| CallerControl {
                    action: action.to_string(),
                    digits: digits.to_string(),
                })
                .collect(),
        }
    }
}

/// A conference profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConferenceProfile {
    /// Profile name referenced by conference rooms
    pub name: String,
    /// SIP domain of the conference
    pub domain: String,
    /// Sample rate in Hz
    pub rate: u32,
    /// Packetization interval in milliseconds
    pub interval: u32,
    /// Minimum energy before audio is treated as speech
    pub energy_level: u32,
    /// Caller-control group used by members
    pub caller_controls: String,
    /// Directory prepended to relative sound paths
    pub sound_prefix: String,
    /// Played when a member is muted
    pub muted_sound: String,
    /// Played when a member is unmuted
    pub unmuted_sound: String,
    /// Played to the only member in the room
    pub alone_sound: String,
    /// Music on hold while alone
    pub moh_sound: String,
    /// Played when a member joins
    pub enter_sound: String,
    /// Played when a member leaves
    pub exit_sound: String,
    /// Played to a kicked member
    pub kicked_sound: String,
    /// Played when the room is locked on entry
    pub locked_sound: String,
    /// Played when the room becomes locked
    pub is_locked_sound: String,
    /// Played when the room becomes unlocked
    pub is_unlocked_sound: String,
    /// Prompt for the room PIN
    pub pin_sound: String,
    /// Played after a wrong PIN
    pub bad_pin_sound: String,
    /// Caller ID name for outbound calls
    pub caller_id_name: String,
    /// Caller ID number for outbound calls
    pub caller_id_number: String,
    /// Generate comfort noise during silence
    pub comfort_noise: bool,
    /// Text-to-speech engine
    pub tts_engine: String,
    /// Text-to-speech voice
    pub tts_voice: String,
}

impl Default for ConferenceProfile {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            domain: "$${domain}".to_string(),
            rate: 8000,
            interval: 20,
            energy_level: 300,
            caller_controls: "default".to_string(),
            sound_prefix: "$${sounds_dir}/en/us/callie".to_string(),
            muted_sound: "conference/conf-muted.wav".to_string(),
            unmuted_sound: "conference/conf-unmuted.wav".to_string(),
            alone_sound: "conference/conf-alone.wav".to_string(),
            moh_sound: "$${hold_music}".to_string(),
            enter_sound: "tone_stream://%(200,0,500,600,700)".to_string(),
            exit_sound: "tone_stream://%(500,0,300,200,100,50,25)".to_string(),
            kicked_sound: "conference/conf-kicked.wav".to_string(),
            locked_sound: "conference/conf-locked.wav".to_string(),
            is_locked_sound: "conference/conf-is-locked.wav".to_string(),
            is_unlocked_sound: "conference/conf-is-unlocked.wav".to_string(),
            pin_sound: "conference/conf-pin.wav".to_string(),
            bad_pin_sound: "conference/conf-bad-pin.wav".to_string(),
            caller_id_name: "$${outbound_caller_name}".to_string(),
            caller_id_number: "$${outbound_caller_id}".to_string(),
            comfort_noise: true,
            tts_engine: "flite".to_string(),
            tts_voice: "kal16".to_string(),
        }
    }
}

impl ConferenceProfile {
    /// Create a profile with stock values for the given name and rate
    pub fn new(name: impl Into<String>, rate: u32) -> Self {
        Self {
            name: name.into(),
            rate,
            ..Self::default()
        }
    }

    /// Profile fields as host parameters, in a stable order
    pub fn params(&self) -> Vec<Param> {
        vec![
            Param::new("domain", &self.domain),
            Param::new("rate", self.rate),
            Param::new("interval", self.interval),
            Param::new("energy-level", self.energy_level),
            Param::new("caller-controls", &self.caller_controls),
            Param::new("sound-prefix", &self.sound_prefix),
            Param::new("muted-sound", &self.muted_sound),
            Param::new("unmuted-sound", &self.unmuted_sound),
            Param::new("alone-sound", &self.alone_sound),
            Param::new("moh-sound", &self.moh_sound),
            Param::new("enter-sound", &self.enter_sound),
            Param::new("exit-sound", &self.exit_sound),
            Param::new("kicked-sound", &self.kicked_sound),
            Param::new("locked-sound", &self.locked_sound),
            Param::new("is-locked-sound", &self.is_locked_sound),
            Param::new("is-unlocked-sound", &self.is_unlocked_sound),
            Param::new("pin-sound", &self.pin_sound),
            Param::new("bad-pin-sound", &self.bad_pin_sound),
            Param::new("caller-id-name", &self.caller_id_name),
            Param::new("caller-id-number", &self.caller_id_number),
            Param::new("comfort-noise", self.comfort_noise),
            Param::new("tts-engine", &self.tts_engine),
            Param::new("tts-voice", &self.tts_voice),
        ]
    }
}

/// Everything `conference.conf` carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConferenceSettings {
    /// Rooms announced via presence
    pub advertise: Vec<AdvertisedRoom>,
    /// DTMF control groups
    pub caller_controls: Vec<CallerControlGroup>,
    /// Conference profiles
    pub profiles: Vec<ConferenceProfile>,
}

impl Default for ConferenceSettings {
    fn default() -> Self {
        Self {
            advertise: vec![AdvertisedRoom {
                name: "3001@$${domain}".to_string(),
                status: "switchconf".to_string(),
            }],
            caller_controls: vec![CallerControlGroup::default_group()],
            profiles: DEFAULT_PROFILES
                .iter()
                .map(|(name, rate)| ConferenceProfile::new(*name, *rate))
                .collect(),
        }
    }
}

impl ConferenceSettings {
    /// Reject empty or duplicated profile and group names
    pub fn validate(&self) -> Result<()> {
        let mut profiles = std::collections::HashSet::new();
        for profile in &self.profiles {
            if profile.name.trim().is_empty() {
                return Err(Error::config("Conference profile name cannot be empty"));
            }
            if !profiles.insert(profile.name.as_str()) {
                return Err(Error::config(format!(
                    "Duplicate conference profile: {}",
                    profile.name
                )));
            }
        }

        let mut groups = std::collections::HashSet::new();
        for group in &self.caller_controls {
            if !groups.insert(group.name.as_str()) {
                return Err(Error::config(format!(
                    "Duplicate caller-control group: {}",
                    group.name
                )));
            }
        }
        Ok(())
    }
}

/// Provider for `conference.conf`
#[derive(Debug, Clone, Default)]
pub struct ConferenceProvider {
    settings: ConferenceSettings,
}

impl ConferenceProvider {
    /// Create a provider from explicit settings
    pub fn new(settings: ConferenceSettings) -> Self {
        Self { settings }
    }

    /// Current settings
    pub fn settings(&self) -> &ConferenceSettings {
        &self.settings
    }
}

impl ConfigProvider for ConferenceProvider {
    fn key(&self) -> &'static str {
        CONFERENCE_KEY
    }

    fn generate_defaults(&mut self) {
        self.settings = ConferenceSettings::default();
    }

    fn render(&self, parent: &mut Element) -> Result<()> {
        let advertise = parent.push(Element::new("advertise"));
        for room in &self.settings.advertise {
            advertise.push(
                Element::new("room")
                    .attr("name", &room.name)
                    .attr("status", &room.status),
            );
        }

        let controls = parent.push(Element::new("caller-controls"));
        for group in &self.settings.caller_controls {
            let group_element = controls.push(Element::new("group").attr("name", &group.name));
            for control in &group.controls {
                group_element.push(
                    Element::new("control")
                        .attr("action", &control.action)
                        .attr("digits", &control.digits),
                );
            }
        }

        let profiles = parent.push(Element::new("profiles"));
        for profile in &self.settings.profiles {
            let profile_element = profiles.push(Element::new("profile").attr("name", &profile.name));
            for param in profile.params() {
                profile_element.push(param.to_element());
            }
        }

        debug!(
            "Rendered {} conference profile(s)",
            self.settings.profiles.len()
        );
        Ok(())
    }
}
