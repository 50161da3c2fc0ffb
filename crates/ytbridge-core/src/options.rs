//! Tech configuration
//!
//! `TechOptions` is what the host hands the tech at construction time.
//! `WidgetConfig` and `PlayerVars` are what the tech hands the widget factory.

use crate::{media_id::extract_media_id, Error, Result, YOUTUBE_MIME_TYPE};
use serde::{Deserialize, Serialize};

/// Source descriptor as provided by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Source URL
    pub src: String,
    /// MIME-like type string
    #[serde(rename = "type", default)]
    pub mime_type: String,
}

impl SourceDescriptor {
    pub fn new(src: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Convenience constructor for a `video/youtube` source
    pub fn youtube(src: impl Into<String>) -> Self {
        Self::new(src, YOUTUBE_MIME_TYPE)
    }

    /// True iff the type is exactly `video/youtube`
    pub fn is_youtube(&self) -> bool {
        self.mime_type == YOUTUBE_MIME_TYPE
    }

    /// Media id carried by the source URL
    pub fn media_id(&self) -> Result<String> {
        extract_media_id(&self.src).ok_or_else(|| Error::UnrecognizedSource {
            url: self.src.clone(),
        })
    }
}

/// Options recognized by the tech
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechOptions {
    /// Use the widget's own controls instead of the host's chrome
    pub native_controls: bool,
    /// Start playing as soon as the widget loads
    pub autoplay: bool,
    /// Restart at the end
    #[serde(rename = "loop")]
    pub loop_playback: bool,
    /// Source to play
    pub source: SourceDescriptor,
}

impl TechOptions {
    pub fn new(source: SourceDescriptor) -> Self {
        Self {
            source,
            ..Default::default()
        }
    }

    /// Parse options from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reject options the tech cannot play
    pub fn validate(&self) -> Result<()> {
        if !self.source.is_youtube() {
            return Err(Error::UnsupportedSourceType(self.source.mime_type.clone()));
        }
        Ok(())
    }
}

/// `playerVars` block passed to the widget at creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerVars {
    pub iv_load_policy: u8,
    pub playerapiid: String,
    pub controls: u8,
    pub showinfo: u8,
    pub modestbranding: u8,
    pub rel: u8,
    pub autoplay: u8,
    #[serde(rename = "loop")]
    pub loop_playback: u8,
}

impl PlayerVars {
    pub fn from_options(options: &TechOptions, player_api_id: &str) -> Self {
        Self {
            // annotations off
            iv_load_policy: 3,
            playerapiid: player_api_id.to_string(),
            controls: options.native_controls as u8,
            showinfo: 0,
            modestbranding: 1,
            rel: 0,
            autoplay: options.autoplay as u8,
            loop_playback: options.loop_playback as u8,
        }
    }
}

/// Everything the widget factory needs to create an instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Id of the placeholder element the widget mounts into
    #[serde(skip)]
    pub element_id: String,
    pub video_id: String,
    pub player_vars: PlayerVars,
}

impl WidgetConfig {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_json() {
        let options = TechOptions::from_json(
            r#"{"nativeControls":true,"loop":true,"source":{"src":"https://youtu.be/dQw4w9WgXcQ","type":"video/youtube"}}"#,
        )
        .unwrap();
        assert!(options.native_controls);
        assert!(options.loop_playback);
        assert!(!options.autoplay);
        assert!(options.validate().is_ok());
        assert_eq!(options.source.media_id().unwrap(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_options_defaults() {
        let options = TechOptions::from_json("{}").unwrap();
        assert_eq!(options, TechOptions::default());
        assert!(matches!(options.validate(), Err(Error::UnsupportedSourceType(_))));
    }

    #[test]
    fn test_source_type_is_exact() {
        assert!(SourceDescriptor::youtube("x").is_youtube());
        assert!(!SourceDescriptor::new("x", "video/YouTube").is_youtube());
        assert!(!SourceDescriptor::new("x", "video/mp4").is_youtube());
    }

    #[test]
    fn test_player_vars() {
        let options = TechOptions {
            native_controls: true,
            autoplay: true,
            ..TechOptions::new(SourceDescriptor::youtube("https://youtu.be/dQw4w9WgXcQ"))
        };
        let vars = PlayerVars::from_options(&options, "player_1");
        assert_eq!(vars.controls, 1);
        assert_eq!(vars.autoplay, 1);
        assert_eq!(vars.loop_playback, 0);
        assert_eq!(vars.iv_load_policy, 3);

        let config = WidgetConfig {
            element_id: "player_1_youtube_api".into(),
            video_id: "dQw4w9WgXcQ".into(),
            player_vars: vars,
        };
        let json: serde_json::Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(json["videoId"], "dQw4w9WgXcQ");
        assert_eq!(json["playerVars"]["loop"], 0);
        assert_eq!(json["playerVars"]["modestbranding"], 1);
        assert!(json.get("elementId").is_none());
    }
}
