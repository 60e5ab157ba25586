//! Presets command for listing the preset catch-up windows.

use std::io::Write;

use anyhow::Result;
use bt_core::WindowPreset;
use chrono::{DateTime, Utc};

use super::util::format_time;
use crate::Config;

pub fn run<W: Write>(writer: &mut W, config: &Config, now: DateTime<Utc>) -> Result<()> {
    for preset in WindowPreset::ALL {
        let window = preset.window_ending_at(now);
        let marker = if preset == config.default_preset {
            " (default)"
        } else {
            ""
        };
        writeln!(
            writer,
            "{:<4} {:<14} {} to {}{marker}",
            preset.as_str(),
            preset.label(),
            format_time(window.start_time),
            format_time(window.end_time)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use insta::assert_snapshot;

    #[test]
    fn lists_presets_with_default_marked() {
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 13, 0, 0).unwrap();
        let mut output = Vec::new();
        run(&mut output, &Config::default(), now).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        1h   Last hour      2025-01-15 12:00 to 2025-01-15 13:00
        2h   Last 2 hours   2025-01-15 11:00 to 2025-01-15 13:00
        4h   Last 4 hours   2025-01-15 09:00 to 2025-01-15 13:00 (default)
        8h   Last 8 hours   2025-01-15 05:00 to 2025-01-15 13:00
        12h  Last 12 hours  2025-01-15 01:00 to 2025-01-15 13:00
        24h  Last 24 hours  2025-01-14 13:00 to 2025-01-15 13:00
        ");
    }
}
