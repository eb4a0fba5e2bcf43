use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};

use crate::probe::{Classification, Outcome};
use crate::report::summary::RunSummary;

/// 把 Outcome 序列渲染为人类可读输出
///
/// 纯展示层：只消费数据，不做任何网络或分类逻辑
pub struct ProbeReporter {
    verbose: bool,
}

impl ProbeReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn print_header(&self, source: &str, total: usize) {
        println!("\nProbing {} endpoints from {}...\n", total, source.bold());
    }

    /// 打印单个探测结果
    pub fn print_outcome(&self, outcome: &Outcome) {
        let symbol = if outcome.is_success() { "✓" } else { "✗" };
        let color = if outcome.is_success() { "green" } else { "red" };

        let status_part = match outcome.status {
            Some(code) => format!("{}", code),
            None => outcome.classification.to_string(),
        };

        println!(
            " {} {} - {} {} ({}, {}ms)",
            symbol.color(color),
            outcome.name,
            outcome.method.cyan(),
            outcome.url,
            status_part,
            outcome.elapsed.as_millis()
        );

        // 重定向落点和请求 URL 不一致时总是值得展示
        if let Some(final_url) = &outcome.final_url
            && *final_url != outcome.url
        {
            println!("   {} {}", "→".dimmed(), final_url.dimmed());
        }

        if let Some(error) = &outcome.error {
            println!("   {}: {}", "Error".red().bold(), error);
        }

        // verbose 模式或失败时展示 body 摘录
        if (self.verbose || !outcome.is_success()) && !outcome.body_excerpt.is_empty() {
            let marker = if outcome.json_parsed {
                "Body (json)"
            } else {
                "Body"
            };
            println!("   {}: {}", marker.blue(), outcome.body_excerpt);
        }
    }

    /// 打印全部结果的汇总表格
    pub fn print_table(&self, outcomes: &[Outcome]) {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["Name", "Method", "URL", "Class", "Status", "Time"]);

        for outcome in outcomes {
            let class_color = match outcome.classification {
                Classification::Success => Color::Green,
                Classification::ClientError | Classification::ServerError => Color::Yellow,
                _ => Color::Red,
            };

            table.add_row(vec![
                Cell::new(&outcome.name),
                Cell::new(&outcome.method),
                Cell::new(&outcome.url).add_attribute(Attribute::Dim),
                Cell::new(outcome.classification.as_str()).fg(class_color),
                Cell::new(
                    outcome
                        .status
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::new(format!("{}ms", outcome.elapsed.as_millis())),
            ]);
        }

        println!("{}", table);
    }

    /// 打印汇总统计
    ///
    /// 三类结论分开展示：没打通的、打通但被拒的、成功的，
    /// 调用方一眼能区分 "不可达" 和 "可达但出错"
    pub fn print_summary(&self, summary: &RunSummary) {
        println!("\n{}", "━".repeat(50));
        println!("{}", "Summary".bold());
        println!("{}", "━".repeat(50));

        println!(
            "  {}: {} succeeded, {} rejected, {} unreachable, {} total",
            "Probes".bold(),
            summary.success.to_string().green(),
            summary.rejected().to_string().yellow(),
            summary.unreachable().to_string().red(),
            summary.total
        );

        if summary.timeout > 0 {
            println!("  {}: {}", "Timeouts".bold(), summary.timeout);
        }

        println!(
            "  {}: {:.3}s",
            "Duration".bold(),
            summary.total_duration.as_secs_f64()
        );
        println!();
    }
}

impl Default for ProbeReporter {
    fn default() -> Self {
        Self::new(false)
    }
}
