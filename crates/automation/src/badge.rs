//! Dock badge reading - the QQ unread counter.

use super::applescript::run_applescript;
use super::OsResult;

const DOCK_BADGE_SCRIPT: &str = r#"
tell application "System Events"
    tell process "Dock"
        try
            set dockItems to every UI element of list 1
            repeat with dockItem in dockItems
                if name of dockItem is "QQ" then
                    try
                        set badgeText to value of attribute "AXStatusLabel" of dockItem
                        if badgeText is not "" and badgeText is not missing value then
                            return badgeText
                        end if
                    end try
                    return "0"
                end if
            end repeat
        end try
        return "0"
    end tell
end tell
"#;

/// Current unread count from the QQ Dock icon badge. A missing or
/// non-numeric badge reads as zero.
pub async fn read_badge() -> OsResult<u32> {
    let raw = run_applescript(DOCK_BADGE_SCRIPT).await?;
    Ok(parse_badge(&raw))
}

fn parse_badge(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_badge_parses() {
        assert_eq!(parse_badge("3"), 3);
        assert_eq!(parse_badge(" 12 "), 12);
    }

    #[test]
    fn missing_or_odd_badge_reads_zero() {
        assert_eq!(parse_badge(""), 0);
        assert_eq!(parse_badge("0"), 0);
        assert_eq!(parse_badge("99+"), 0);
    }
}
