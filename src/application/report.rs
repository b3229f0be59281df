use std::collections::HashMap;
use std::fmt::Write;
use std::hash::Hash;
use std::path::Path;

use crate::adapters::csv::loan_log;
use crate::domain::{LoanReturn, UserId, penalties_by_user};

/// 貸出ログの集計結果
///
/// 件数は降順、同数の場合はキーの昇順に並ぶ。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoanStatistics {
    pub total_loans: usize,
    pub by_title: Vec<(String, usize)>,
    pub by_user: Vec<(UserId, usize)>,
}

impl LoanStatistics {
    pub fn distinct_users(&self) -> usize {
        self.by_user.len()
    }
}

/// 保存済みの貸出ログを集計する（読み取り専用）
///
/// ストアのメモリ上の状態ではなくファイルを直接読むため、
/// 未保存の変更は反映されない。
/// ファイルを開けない場合はログに記録して空の集計を返す。
/// 利用者IDが整数でない記録は集計から除外する。
pub fn loan_statistics(path: &Path) -> LoanStatistics {
    let rows = match loan_log::read(path) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to read loan log {} for report: {}", path.display(), e);
            return LoanStatistics::default();
        }
    };

    let mut titles: HashMap<String, usize> = HashMap::new();
    let mut users: HashMap<UserId, usize> = HashMap::new();
    let mut total_loans = 0;

    for row in rows {
        let user_id = match row.parsed_user_id() {
            Ok(user_id) => user_id,
            Err(e) => {
                tracing::warn!("Excluding record from report: {}", e);
                continue;
            }
        };

        total_loans += 1;
        *titles.entry(row.title).or_default() += 1;
        *users.entry(user_id).or_default() += 1;
    }

    LoanStatistics {
        total_loans,
        by_title: ranked(titles),
        by_user: ranked(users),
    }
}

fn ranked<K: Ord + Hash>(counts: HashMap<K, usize>) -> Vec<(K, usize)> {
    let mut entries: Vec<(K, usize)> = counts.into_iter().collect();
    entries.sort_by(|(a_key, a_count), (b_key, b_count)| {
        b_count.cmp(a_count).then_with(|| a_key.cmp(b_key))
    });
    entries
}

/// 書名ごとの貸出件数
pub fn most_borrowed_titles(path: &Path) -> String {
    render_titles(&loan_statistics(path))
}

/// 利用者ごとの貸出件数
pub fn most_active_users(path: &Path) -> String {
    render_users(&loan_statistics(path))
}

/// 書名別と利用者別の集計をまとめたレポート
pub fn general_report(path: &Path) -> String {
    let statistics = loan_statistics(path);
    format!(
        "General report:\n{}\n{}",
        render_titles(&statistics),
        render_users(&statistics)
    )
}

fn render_titles(statistics: &LoanStatistics) -> String {
    let mut out = String::from("Most borrowed titles:\n");
    for (title, count) in &statistics.by_title {
        let _ = writeln!(out, "{}: {} loan(s)", title, count);
    }
    out
}

fn render_users(statistics: &LoanStatistics) -> String {
    let mut out = String::from("Most active users:\n");
    for (user_id, count) in &statistics.by_user {
        let _ = writeln!(out, "User {}: {} loan(s)", user_id, count);
    }
    out
}

/// 延滞金のレポート
///
/// 延滞金が発生している利用者のみを利用者IDの昇順に並べ、最後に合計を出す。
pub fn penalty_report(returns: &[LoanReturn]) -> String {
    let by_user = penalties_by_user(returns);

    let mut out = String::from("Penalties:\n");
    for (user_id, amount) in &by_user {
        let _ = writeln!(out, "User {}: {}", user_id, amount);
    }
    let _ = writeln!(out, "Total: {}", by_user.values().sum::<u64>());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LoanId;
    use chrono::NaiveDate;
    use std::fs;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn write_log(dir: &tempfile::TempDir, lines: &[&str]) -> std::path::PathBuf {
        let path = dir.path().join("emprunts.csv");
        let mut content = String::from("Id;IdUtilisateur;TitreLivre;DateEmprunt;DateRetour\n");
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_loan_statistics_counts_and_orders() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(
            &dir,
            &[
                "1;7;Dune;2024-03-01;2024-03-15",
                "2;8;Hyperion;2024-03-02;2024-03-16",
                "3;7;Dune;2024-03-03;2024-03-17",
                "4;9;Anathem;2024-03-04;2024-03-18",
                "5;x;Dune;2024-03-05;2024-03-19",
                "6;short",
            ],
        );

        let statistics = loan_statistics(&path);
        assert_eq!(statistics.total_loans, 4);
        assert_eq!(statistics.distinct_users(), 3);
        assert_eq!(
            statistics.by_title,
            vec![
                ("Dune".to_string(), 2),
                ("Anathem".to_string(), 1),
                ("Hyperion".to_string(), 1),
            ]
        );
        assert_eq!(
            statistics.by_user,
            vec![(UserId::new(7), 2), (UserId::new(8), 1), (UserId::new(9), 1)]
        );
    }

    #[test]
    fn test_general_report_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(
            &dir,
            &[
                "1;7;Dune;2024-03-01;2024-03-15",
                "2;7;Dune;2024-03-02;2024-03-16",
                "3;8;Hyperion;2024-03-03;2024-03-17",
            ],
        );

        assert_eq!(
            most_borrowed_titles(&path),
            "Most borrowed titles:\nDune: 2 loan(s)\nHyperion: 1 loan(s)\n"
        );
        assert_eq!(
            most_active_users(&path),
            "Most active users:\nUser 7: 2 loan(s)\nUser 8: 1 loan(s)\n"
        );
        assert_eq!(
            general_report(&path),
            "General report:\n\
             Most borrowed titles:\nDune: 2 loan(s)\nHyperion: 1 loan(s)\n\
             \n\
             Most active users:\nUser 7: 2 loan(s)\nUser 8: 1 loan(s)\n"
        );
    }

    #[test]
    fn test_missing_log_yields_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");

        assert_eq!(loan_statistics(&path), LoanStatistics::default());
        assert_eq!(most_borrowed_titles(&path), "Most borrowed titles:\n");
    }

    #[test]
    fn test_penalty_report() {
        let late = |id: u32, user: u32, returned_on: Option<NaiveDate>| LoanReturn {
            loan_id: LoanId::new(id),
            user_id: UserId::new(user),
            title: "Dune".to_string(),
            loan_date: date(2024, 3, 1),
            due_date: date(2024, 3, 15),
            returned_on,
        };
        let returns = vec![
            late(1, 8, Some(date(2024, 3, 18))),
            late(2, 7, Some(date(2024, 3, 16))),
            late(3, 7, Some(date(2024, 3, 10))),
            late(4, 9, None),
            late(5, 7, Some(date(2024, 3, 17))),
        ];

        assert_eq!(
            penalty_report(&returns),
            "Penalties:\nUser 7: 150\nUser 8: 150\nTotal: 300\n"
        );
        assert_eq!(penalty_report(&[]), "Penalties:\nTotal: 0\n");
    }
}
