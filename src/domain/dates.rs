//! 日付文字列の解析
//!
//! ロケールに依存しない固定の書式リストを順に試し、最初に成功したものを採用する。

use chrono::NaiveDate;

use super::MalformedDate;

/// ISO形式（yyyy-MM-dd）。ファイルへの書き出しは常にこの形式。
pub const ISO_FORMAT: &str = "%Y-%m-%d";

/// 日/月/年形式（dd/MM/yyyy）
pub const DAY_FIRST_FORMAT: &str = "%d/%m/%Y";

/// 貸出ログからの取り込みで試す書式（この順で試す）
pub const LENIENT_FORMATS: [&str; 2] = [DAY_FIRST_FORMAT, ISO_FORMAT];

/// 書式リストを順に試して日付を解析する
///
/// # エラー
/// どの書式にも一致しない場合は`MalformedDate`
pub fn parse_with(input: &str, formats: &[&str]) -> Result<NaiveDate, MalformedDate> {
    let trimmed = input.trim();
    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| MalformedDate {
            input: input.to_string(),
        })
}

/// dd/MM/yyyy、次にyyyy-MM-ddを試す
pub fn parse_lenient(input: &str) -> Result<NaiveDate, MalformedDate> {
    parse_with(input, &LENIENT_FORMATS)
}

/// yyyy-MM-ddのみ受け付ける
pub fn parse_iso(input: &str) -> Result<NaiveDate, MalformedDate> {
    parse_with(input, &[ISO_FORMAT])
}

/// 省略可能なISO日付
///
/// 空文字列と`null`（大文字小文字を問わない）は「未設定」として扱う。
pub fn parse_optional_iso(input: &str) -> Result<Option<NaiveDate>, MalformedDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    parse_iso(trimmed).map(Some)
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}
