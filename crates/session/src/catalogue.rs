//! Native event catalogue.
//!
//! The engine emits a closed set of event names. Each one maps to the list
//! of external names it is re-emitted under: always a lowercase legacy
//! name, usually a camelCase name, and for a few events additional
//! semantic aliases.

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

/// Non-event work attached to a native event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    None,
    /// Tear down the remote participant's render target and unsubscribe
    /// from their stream. The uid is the argument at `uid_arg`.
    ReleaseRemoteStream { uid_arg: usize },
}

/// One native event and the names it is re-emitted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogueEntry {
    pub native: &'static str,
    pub aliases: &'static [&'static str],
    pub effect: SideEffect,
}

const fn entry(native: &'static str, aliases: &'static [&'static str]) -> CatalogueEntry {
    CatalogueEntry {
        native,
        aliases,
        effect: SideEffect::None,
    }
}

const fn with_effect(
    native: &'static str,
    aliases: &'static [&'static str],
    effect: SideEffect,
) -> CatalogueEntry {
    CatalogueEntry {
        native,
        aliases,
        effect,
    }
}

static CATALOGUE: &[CatalogueEntry] = &[
    // Engine diagnostics
    entry("apierror", &["apierror", "apiError"]),
    entry("warning", &["warning"]),
    entry("error", &["error"]),
    // Channel lifecycle
    entry("joinchannel", &["joinedchannel", "joinedChannel"]),
    entry("rejoinchannel", &["rejoinedchannel", "rejoinedChannel"]),
    entry("leavechannel", &["leavechannel", "leaveChannel"]),
    entry("clientrolechanged", &["clientrolechanged", "clientRoleChanged"]),
    entry("connectionstatechanged", &["connectionstatechanged", "connectionStateChanged"]),
    entry("connectionlost", &["connectionlost", "connectionLost"]),
    entry("connectioninterrupted", &["connectioninterrupted", "connectionInterrupted"]),
    entry("connectionbanned", &["connectionbanned", "connectionBanned"]),
    entry("requesttoken", &["requesttoken", "requestToken"]),
    entry("tokenprivilegewillexpire", &["tokenprivilegewillexpire", "tokenPrivilegeWillExpire"]),
    entry("localuserregistered", &["localuserregistered", "localUserRegistered"]),
    entry("userinfoupdated", &["userinfoupdated", "userInfoUpdated"]),
    // Participants
    entry("userjoined", &["userjoined", "userJoined"]),
    with_effect(
        "useroffline",
        &["removestream", "removeStream", "userOffline"],
        SideEffect::ReleaseRemoteStream { uid_arg: 0 },
    ),
    entry("usermuteaudio", &["usermuteaudio", "userMuteAudio"]),
    entry("usermutevideo", &["usermutevideo", "userMuteVideo"]),
    entry("userenablevideo", &["userenablevideo", "userEnableVideo"]),
    entry("userenablelocalvideo", &["userenablelocalvideo", "userEnableLocalVideo"]),
    entry("activespeaker", &["activespeaker", "activeSpeaker"]),
    entry("audiovolumeindication", &["audiovolumeindication", "audioVolumeIndication"]),
    // First-frame notifications
    entry("firstlocalaudioframe", &["firstlocalaudioframe", "firstLocalAudioFrame"]),
    entry("firstremoteaudioframe", &["firstremoteaudioframe", "firstRemoteAudioFrame"]),
    entry("firstremoteaudiodecoded", &["firstremoteaudiodecoded", "firstRemoteAudioDecoded"]),
    entry("firstlocalvideoframe", &["firstlocalvideoframe", "firstLocalVideoFrame"]),
    entry(
        "firstremotevideodecoded",
        &["addstream", "firstremotevideodecoded", "firstRemoteVideoDecoded"],
    ),
    entry("firstremotevideoframe", &["firstremotevideoframe", "firstRemoteVideoFrame"]),
    entry("videosizechanged", &["videosizechanged", "videoSizeChanged"]),
    // Statistics
    entry("rtcstats", &["rtcstats", "rtcStats"]),
    entry("localvideostats", &["localvideostats", "localVideoStats"]),
    entry("localaudiostats", &["localaudiostats", "localAudioStats"]),
    entry("remotevideostats", &["remotevideostats", "remoteVideoStats"]),
    entry("remoteaudiostats", &["remoteaudiostats", "remoteAudioStats"]),
    entry("remotevideotransportstats", &["remotevideotransportstats", "remoteVideoTransportStats"]),
    entry("remoteaudiotransportstats", &["remoteaudiotransportstats", "remoteAudioTransportStats"]),
    entry("networkquality", &["networkquality", "networkQuality"]),
    entry("lastmilequality", &["lastmilequality", "lastMileQuality"]),
    entry("lastmileprobetestresult", &["lastmileprobetestresult", "lastmileProbeResult"]),
    // Media state
    entry("localvideostatechanged", &["localvideostatechanged", "localVideoStateChanged"]),
    entry("localaudiostatechanged", &["localaudiostatechanged", "localAudioStateChanged"]),
    entry("remotevideostatechanged", &["remotevideostatechanged", "remoteVideoStateChanged"]),
    entry("remoteaudiostatechanged", &["remoteaudiostatechanged", "remoteAudioStateChanged"]),
    entry(
        "localpublishfallbacktoaudioonly",
        &["localpublishfallbacktoaudioonly", "localPublishFallbackToAudioOnly"],
    ),
    entry(
        "remotesubscribefallbacktoaudioonly",
        &["remotesubscribefallbacktoaudioonly", "remoteSubscribeFallbackToAudioOnly"],
    ),
    // Devices
    entry("audiodevicestatechanged", &["audiodevicestatechanged", "audioDeviceStateChanged"]),
    entry("videodevicestatechanged", &["videodevicestatechanged", "videoDeviceStateChanged"]),
    entry("audiodevicevolumechanged", &["audiodevicevolumechanged", "audioDeviceVolumeChanged"]),
    entry("cameraready", &["cameraready", "cameraReady"]),
    entry("videostopped", &["videostopped", "videoStopped"]),
    entry("cameraexposureareachanged", &["cameraexposureareachanged", "cameraExposureAreaChanged"]),
    entry("camerafocusareachanged", &["camerafocusareachanged", "cameraFocusAreaChanged"]),
    entry("microphoneenabled", &["microphoneenabled"]),
    entry("audioroutechanged", &["audioroutechanged"]),
    // Audio mixing and effects
    entry("audiomixingfinished", &["audiomixingfinished", "audioMixingFinished"]),
    entry("audiomixingstatechanged", &["audiomixingstatechanged", "audioMixingStateChanged"]),
    entry("remoteaudiomixingbegin", &["remoteaudiomixingbegin", "remoteAudioMixingBegin"]),
    entry("remoteaudiomixingend", &["remoteaudiomixingend", "remoteAudioMixingEnd"]),
    entry("audioeffectfinished", &["audioeffectfinished", "audioEffectFinished"]),
    // Data streams
    entry("streammessage", &["streammessage", "streamMessage"]),
    entry("streammessageerror", &["streammessageerror", "streamMessageError"]),
    // Publishing and relay
    entry("streampublished", &["streampublished", "streamPublished"]),
    entry("streamunpublished", &["streamunpublished", "streamUnpublished"]),
    entry("transcodingupdated", &["transcodingupdated", "transcodingUpdated"]),
    entry("streaminjectstatus", &["streaminjectstatus", "streamInjectStatus"]),
    entry("rtmpstreamingstatechanged", &["rtmpstreamingstatechanged", "rtmpStreamingStateChanged"]),
    entry("channelmediarelaystate", &["channelmediarelaystate", "channelMediaRelayState"]),
    entry("channelmediarelayevent", &["channelmediarelayevent", "channelMediaRelayEvent"]),
    // Secondary video source
    entry("videosourcejoinsuccess", &["videosourcejoinedsuccess", "videoSourceJoinedSuccess"]),
    entry(
        "videosourcerequestnewtoken",
        &["videosourcerequestnewtoken", "videoSourceRequestNewToken"],
    ),
    entry("videosourceleavechannel", &["videosourceleavechannel", "videoSourceLeaveChannel"]),
];

/// Every catalogued native event, in subscription order.
pub fn entries() -> &'static [CatalogueEntry] {
    CATALOGUE
}

/// Look up a native event by name.
pub fn lookup(native: &str) -> Option<&'static CatalogueEntry> {
    static INDEX: OnceLock<HashMap<&'static str, &'static CatalogueEntry>> = OnceLock::new();
    INDEX
        .get_or_init(|| CATALOGUE.iter().map(|e| (e.native, e)).collect())
        .get(native)
        .copied()
}

/// All external names any native event may be re-emitted under.
pub fn all_aliases() -> BTreeSet<&'static str> {
    CATALOGUE.iter().flat_map(|e| e.aliases.iter().copied()).collect()
}

/// Whether `name` is an external event name produced by the bridge.
pub fn is_known_alias(name: &str) -> bool {
    CATALOGUE.iter().any(|e| e.aliases.contains(&name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn native_names_are_unique() {
        let mut seen = HashSet::new();
        for entry in entries() {
            assert!(seen.insert(entry.native), "duplicate native {}", entry.native);
        }
    }

    #[test]
    fn aliases_are_owned_by_one_native_event() {
        let total: usize = entries().iter().map(|e| e.aliases.len()).sum();
        assert_eq!(all_aliases().len(), total);
    }

    #[test]
    fn every_event_has_lowercase_legacy_alias() {
        for entry in entries() {
            assert!(
                entry
                    .aliases
                    .iter()
                    .any(|a| a.chars().all(|c| !c.is_ascii_uppercase())),
                "{} has no lowercase alias",
                entry.native
            );
        }
    }

    #[test]
    fn most_events_have_camel_case_alias() {
        let with_camel = entries()
            .iter()
            .filter(|e| e.aliases.iter().any(|a| a.chars().any(|c| c.is_ascii_uppercase())))
            .count();
        assert!(with_camel * 10 > entries().len() * 9);
    }

    #[test]
    fn first_remote_video_decoded_fans_out() {
        let entry = lookup("firstremotevideodecoded").unwrap();
        assert_eq!(
            entry.aliases,
            &["addstream", "firstremotevideodecoded", "firstRemoteVideoDecoded"]
        );
    }

    #[test]
    fn only_user_offline_has_side_effects() {
        let effects: Vec<&str> = entries()
            .iter()
            .filter(|e| e.effect != SideEffect::None)
            .map(|e| e.native)
            .collect();
        assert_eq!(effects, vec!["useroffline"]);
        assert!(lookup("useroffline").unwrap().aliases.contains(&"removeStream"));
    }

    #[test]
    fn lookup_unknown_is_none() {
        assert!(lookup("definitelynotanevent").is_none());
        assert!(is_known_alias("userJoined"));
        assert!(!is_known_alias("useroffline"));
    }
}
