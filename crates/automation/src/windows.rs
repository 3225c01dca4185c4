//! QQ window enumeration over System Events.

use super::applescript::{run_applescript, validate_script_text};
use super::{OsResult, QQ_APP_NAME};
use serde::{Deserialize, Serialize};
use tokio::time::{sleep, Duration};

/// Window names that are never chat windows: the main panel and the
/// global-search window.
pub const NON_CHAT_WINDOWS: &[&str] = &["QQ", "全网搜索"];

/// One QQ window as reported by System Events. QQ windows carry no stable
/// OS identifier, so the title doubles as the identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowDescriptor {
    pub title: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl WindowDescriptor {
    /// Center of the message input area, which sits in the bottom band of a
    /// chat window.
    pub fn input_point(&self) -> (i32, i32) {
        (
            self.x + self.width / 2,
            self.y + (f64::from(self.height) * 0.85) as i32,
        )
    }

    pub fn is_chat(&self) -> bool {
        !self.title.is_empty() && !NON_CHAT_WINDOWS.contains(&self.title.as_str())
    }
}

const LIST_WINDOWS_SCRIPT: &str = r#"
tell application "System Events"
    tell process "QQ"
        set winInfo to {}
        repeat with w in every window
            set wName to name of w
            set wPos to position of w
            set wSize to size of w
            set x to item 1 of wPos as integer
            set y to item 2 of wPos as integer
            set ww to item 1 of wSize as integer
            set hh to item 2 of wSize as integer
            set end of winInfo to wName & ":" & (x as text) & "|" & (y as text) & "|" & (ww as text) & "|" & (hh as text)
        end repeat
        set AppleScript's text item delimiters to ";;;"
        return winInfo as text
    end tell
end tell
"#;

/// List every QQ window with its position and size.
pub async fn list_windows() -> OsResult<Vec<WindowDescriptor>> {
    let raw = run_applescript(LIST_WINDOWS_SCRIPT).await?;
    Ok(parse_window_list(&raw))
}

/// Parse the `name:x|y|w|h;;;...` serialization produced by the list script.
fn parse_window_list(raw: &str) -> Vec<WindowDescriptor> {
    let mut windows = Vec::new();
    for item in raw.split(";;;") {
        let item = item.trim();
        let Some((name, coords)) = item.split_once(':') else {
            continue;
        };
        let parts: Vec<&str> = coords.split('|').collect();
        if parts.len() != 4 {
            continue;
        }
        let values: Vec<i32> = parts.iter().filter_map(|p| p.trim().parse().ok()).collect();
        if values.len() != 4 {
            continue;
        }
        windows.push(WindowDescriptor {
            title: name.trim().to_string(),
            x: values[0],
            y: values[1],
            width: values[2],
            height: values[3],
        });
    }
    windows
}

/// Raise a window to the front by exact title.
pub async fn raise_window(title: &str) -> OsResult<()> {
    validate_script_text(title, "window title")?;
    run_applescript(&format!(
        "tell application \"System Events\"\n    tell process \"{QQ_APP_NAME}\"\n        perform action \"AXRaise\" of window \"{title}\"\n    end tell\nend tell"
    ))
    .await?;
    sleep(Duration::from_millis(300)).await;
    Ok(())
}

/// First open chat window, if any.
pub async fn find_chat_window() -> OsResult<Option<WindowDescriptor>> {
    let windows = list_windows().await?;
    Ok(windows.into_iter().find(WindowDescriptor::is_chat))
}

/// Bounds of the QQ main panel, falling back to the front window.
pub async fn main_window() -> OsResult<Option<WindowDescriptor>> {
    let windows = list_windows().await?;
    Ok(windows
        .iter()
        .find(|w| w.title == QQ_APP_NAME)
        .or_else(|| windows.first())
        .cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_window_list_wire_format() {
        let raw = "QQ:0|25|320|600;;;张三:400|100|720|560;;;全网搜索:10|10|500|400";
        let windows = parse_window_list(raw);
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[1].title, "张三");
        assert_eq!(windows[1].x, 400);
        assert_eq!(windows[1].height, 560);
    }

    #[test]
    fn skips_malformed_entries() {
        let raw = "broken;;;ok:1|2|3|4;;;short:1|2";
        let windows = parse_window_list(raw);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].title, "ok");
    }

    #[test]
    fn empty_output_yields_no_windows() {
        assert!(parse_window_list("").is_empty());
    }

    #[test]
    fn chat_window_classification() {
        let chat = WindowDescriptor {
            title: "张三".into(),
            x: 0,
            y: 0,
            width: 720,
            height: 560,
        };
        let panel = WindowDescriptor {
            title: "QQ".into(),
            ..chat.clone()
        };
        let search = WindowDescriptor {
            title: "全网搜索".into(),
            ..chat.clone()
        };
        assert!(chat.is_chat());
        assert!(!panel.is_chat());
        assert!(!search.is_chat());
    }

    #[test]
    fn input_point_sits_in_bottom_band() {
        let win = WindowDescriptor {
            title: "张三".into(),
            x: 100,
            y: 50,
            width: 720,
            height: 600,
        };
        assert_eq!(win.input_point(), (460, 560));
    }
}
