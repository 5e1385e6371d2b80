//! CSV output: `Host,Port,JARM,ScanTime`, one row per scanned target.

use std::io::Write;

use chrono::Utc;

use crate::error::Result;

/// One completed scan, ready to render as a CSV row.
pub struct ScanRecord {
    pub host: String,
    pub port: u16,
    pub jarm: String,
}

/// Writes the header row followed by one row per record, each stamped with
/// the current UTC time in ISO-8601.
pub fn write_csv<W: Write>(mut out: W, records: &[ScanRecord]) -> Result<()> {
    writeln!(out, "Host,Port,JARM,ScanTime")?;
    for record in records {
        let timestamp = Utc::now().to_rfc3339();
        writeln!(out, "{},{},{},{}", record.host, record.port, record.jarm, timestamp)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_one_row_per_record() {
        let records = vec![
            ScanRecord { host: "google.com".to_string(), port: 443, jarm: "0".repeat(62) },
            ScanRecord { host: "example.com".to_string(), port: 8443, jarm: "1".repeat(62) },
        ];
        let mut buf = Vec::new();
        write_csv(&mut buf, &records).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "Host,Port,JARM,ScanTime");
        assert!(lines.next().unwrap().starts_with("google.com,443,"));
        assert!(lines.next().unwrap().starts_with("example.com,8443,"));
        assert!(lines.next().is_none());
    }
}
