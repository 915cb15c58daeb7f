use crate::constants::UNKNOWN_LOGIN;
use crate::error::Result;
use crate::types::BanRecord;
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

const XLSX_HEADERS: [&str; 5] = ["Login", "SteamID", "Game bans", "Community ban", "VAC ban"];

/// Writes one identifier per line, with a trailing newline.
pub fn write_id_list(steam_ids: &[String], path: &Path) -> Result<()> {
    let mut contents = steam_ids.join("\n");
    contents.push('\n');
    fs::write(path, contents)?;
    info!("saved identifier list to {}", path.display());
    Ok(())
}

/// Pretty-printed JSON document for either the raw aggregate or the
/// filtered rows.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let contents = serde_json::to_string_pretty(value)?;
    fs::write(path, contents)?;
    info!("saved JSON report to {}", path.display());
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Spreadsheet with one row per fetched record (unfiltered).
pub fn write_xlsx(
    records: &[BanRecord],
    logins: &HashMap<String, String>,
    path: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Bans")?;

    for (col, header) in XLSX_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = index as u32 + 1;
        let login = logins
            .get(&record.steam_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LOGIN);
        worksheet.write_string(row, 0, login)?;
        worksheet.write_string(row, 1, &record.steam_id)?;
        worksheet.write_number(row, 2, f64::from(record.game_bans))?;
        worksheet.write_string(row, 3, yes_no(record.community_banned))?;
        worksheet.write_string(row, 4, yes_no(record.vac_banned))?;
    }

    worksheet.set_column_width(0, 24)?;
    worksheet.set_column_width(1, 20)?;
    worksheet.set_column_width(2, 12)?;
    worksheet.set_column_width(3, 14)?;
    worksheet.set_column_width(4, 10)?;

    workbook.save(path)?;
    info!("saved spreadsheet report to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn id_list_is_one_identifier_per_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ids.txt");

        write_id_list(&["1".to_string(), "2".to_string()], &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "1\n2\n");
    }

    #[test]
    fn json_report_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        let records = vec![BanRecord {
            steam_id: "1".to_string(),
            vac_banned: true,
            days_since_last_ban: Some(3),
            ..BanRecord::default()
        }];

        write_json(&records, &path).unwrap();

        let restored: Vec<BanRecord> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(restored, records);
    }

    #[test]
    fn xlsx_report_is_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        let mut logins = HashMap::new();
        logins.insert("1".to_string(), "alice".to_string());
        let records = vec![
            BanRecord {
                steam_id: "1".to_string(),
                game_bans: 2,
                ..BanRecord::default()
            },
            BanRecord {
                steam_id: "2".to_string(),
                community_banned: true,
                ..BanRecord::default()
            },
        ];

        write_xlsx(&records, &logins, &path).unwrap();

        let metadata = fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }
}
