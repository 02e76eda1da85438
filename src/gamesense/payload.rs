//! Request bodies for the GameSense HTTP API.

use serde::Serialize;

use crate::core::frame::Frame;

/// `POST /bind_game_event` — registers a two-line screen handler.
#[derive(Serialize)]
pub struct BindEventPayload {
    pub game: String,
    pub event: String,
    pub icon_id: u32,
    pub value_optional: bool,
    pub handlers: Vec<ScreenHandler>,
}

#[derive(Serialize)]
pub struct ScreenHandler {
    #[serde(rename = "device-type")]
    pub device_type: String,
    pub zone: String,
    pub mode: String,
    pub datas: Vec<ScreenData>,
}

#[derive(Serialize)]
pub struct ScreenData {
    pub lines: Vec<ScreenLine>,
    #[serde(rename = "icon-id")]
    pub icon_id: u32,
}

#[derive(Serialize)]
pub struct ScreenLine {
    #[serde(rename = "has-text")]
    pub has_text: bool,
    #[serde(rename = "context-frame-key")]
    pub context_frame_key: String,
}

impl BindEventPayload {
    /// The standard two-line OLED handler bound to frame keys
    /// `line1`/`line2`.
    pub fn two_line_screen(game: &str, event: &str, icon_id: u32) -> Self {
        let lines = ["line1", "line2"]
            .iter()
            .map(|key| ScreenLine {
                has_text: true,
                context_frame_key: key.to_string(),
            })
            .collect();
        Self {
            game: game.to_string(),
            event: event.to_string(),
            icon_id,
            value_optional: true,
            handlers: vec![ScreenHandler {
                device_type: "screened".to_string(),
                zone: "one".to_string(),
                mode: "screen".to_string(),
                datas: vec![ScreenData { lines, icon_id }],
            }],
        }
    }
}

/// `POST /game_metadata` — integration identity.
#[derive(Serialize)]
pub struct MetadataPayload {
    pub game: String,
    pub game_display_name: String,
    pub developer: String,
}

/// `POST /game_event` — one display frame. `value` is required by the wire
/// format but carries no meaning for screen handlers.
#[derive(Serialize)]
pub struct EventPayload {
    pub game: String,
    pub event: String,
    pub data: EventData,
}

#[derive(Serialize)]
pub struct EventData {
    pub frame: FramePayload,
    pub value: i64,
}

#[derive(Serialize)]
pub struct FramePayload {
    pub line1: String,
    pub line2: String,
}

impl EventPayload {
    pub fn new(game: &str, event: &str, frame: &Frame) -> Self {
        Self {
            game: game.to_string(),
            event: event.to_string(),
            data: EventData {
                frame: FramePayload {
                    line1: frame.line1.clone(),
                    line2: frame.line2.clone(),
                },
                value: 0,
            },
        }
    }
}

/// `POST /game_heartbeat` — keep-alive.
#[derive(Serialize)]
pub struct HeartbeatPayload {
    pub game: String,
}
