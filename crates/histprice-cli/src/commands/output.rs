//! 명령 결과 출력 형식.

use anyhow::{Context, Result};
use histprice_core::{LastTradedPrice, PriceRecord, SymbolInfo};
use serde::Serialize;

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(anyhow::anyhow!(
                "Invalid format: {}. Use: table, csv, json",
                s
            )),
        }
    }
}

/// 표 형식으로 출력할 수 있는 행.
pub trait TableRow: Serialize {
    /// 열 이름
    fn headers() -> Vec<&'static str>;
    /// 열 값
    fn cells(&self) -> Vec<String>;
}

impl TableRow for PriceRecord {
    fn headers() -> Vec<&'static str> {
        vec!["SYMBOL", "DATE", "OPEN", "HIGH", "LOW", "CLOSE", "VOLUME"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.symbol.clone(),
            self.store_date(),
            self.open.to_string(),
            self.high.to_string(),
            self.low.to_string(),
            self.close.to_string(),
            self.volume.to_string(),
        ]
    }
}

impl TableRow for SymbolInfo {
    fn headers() -> Vec<&'static str> {
        vec!["SYMBOL", "NAME", "DATE", "ENABLED"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.symbol.clone(),
            truncate(&self.name, 40),
            self.date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
            if self.is_enabled { "✓" } else { "✗" }.to_string(),
        ]
    }
}

impl TableRow for LastTradedPrice {
    fn headers() -> Vec<&'static str> {
        vec!["SYMBOL", "PRICE", "SIZE", "TIME"]
    }

    fn cells(&self) -> Vec<String> {
        let time = chrono::DateTime::from_timestamp_millis(self.time)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| self.time.to_string());
        vec![
            self.symbol.clone(),
            self.price.to_string(),
            self.size.to_string(),
            time,
        ]
    }
}

/// 행 목록을 지정 형식 문자열로 변환합니다.
pub fn render<T: TableRow>(rows: &[T], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(format_table(rows)),
        OutputFormat::Csv => Ok(format_csv(rows)),
        OutputFormat::Json => serde_json::to_string_pretty(rows).context("Failed to serialize to JSON"),
    }
}

/// 테이블 형식 출력.
fn format_table<T: TableRow>(rows: &[T]) -> String {
    let headers = T::headers();
    let cells: Vec<Vec<String>> = rows.iter().map(TableRow::cells).collect();

    // 열 너비 = 헤더와 값 중 최대 문자 수
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut output = String::new();
    output.push_str(&join_padded(headers.iter().map(|h| h.to_string()), &widths));
    output.push('\n');
    output.push_str(&"-".repeat(widths.iter().sum::<usize>() + widths.len().saturating_sub(1)));
    output.push('\n');

    for row in cells {
        output.push_str(&join_padded(row.into_iter(), &widths));
        output.push('\n');
    }

    output.push('\n');
    output.push_str(&format!("Total: {} rows", rows.len()));
    output
}

fn join_padded(values: impl Iterator<Item = String>, widths: &[usize]) -> String {
    values
        .zip(widths)
        .map(|(v, w)| format!("{:<width$}", v, width = *w))
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end()
        .to_string()
}

/// CSV 형식 출력.
fn format_csv<T: TableRow>(rows: &[T]) -> String {
    let mut output = T::headers()
        .iter()
        .map(|h| h.to_lowercase())
        .collect::<Vec<_>>()
        .join(",");
    output.push('\n');

    for row in rows {
        let line: Vec<String> = row.cells().iter().map(|c| escape_csv(c)).collect();
        output.push_str(&line.join(","));
        output.push('\n');
    }

    output
}

/// 문자열 자르기 (UTF-8 안전).
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// CSV 이스케이프 (콤마나 따옴표 포함 시 따옴표로 감싸기).
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample() -> Vec<PriceRecord> {
        vec![PriceRecord::new(
            "AAPL",
            NaiveDate::from_ymd_opt(2022, 2, 4).unwrap(),
            dec!(171.68),
            dec!(174.10),
            dec!(170.68),
            dec!(172.39),
            82465396,
        )]
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("TABLE").unwrap(), OutputFormat::Table);
        assert_eq!(OutputFormat::parse("json").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::parse("xml").is_err());
    }

    #[test]
    fn test_table_output() {
        let table = render(&sample(), OutputFormat::Table).unwrap();
        assert!(table.starts_with("SYMBOL"));
        assert!(table.contains("2022-02-04"));
        assert!(table.contains("172.39"));
        assert!(table.ends_with("Total: 1 rows"));
    }

    #[test]
    fn test_csv_output() {
        let csv = render(&sample(), OutputFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("symbol,date,open,high,low,close,volume"));
        assert_eq!(
            lines.next(),
            Some("AAPL,2022-02-04,171.68,174.10,170.68,172.39,82465396")
        );
    }

    #[test]
    fn test_json_output() {
        let json = render(&sample(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["date"], "2022-02-04");
    }

    #[test]
    fn test_escape_and_truncate() {
        assert_eq!(escape_csv("Apple, Inc."), "\"Apple, Inc.\"");
        assert_eq!(truncate("가나다라마바", 5), "가나...");
        assert_eq!(truncate("short", 10), "short");
    }
}
