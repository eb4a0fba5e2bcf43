use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use ruprobe::plan::PlanLoader;
use ruprobe::probe::ProbeRunner;
use ruprobe::report::{ProbeReporter, RunSummary};
use ruprobe::sink::{DiscoveredSink, record_discovered};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 探测计划文件路径，缺省时向上查找 ruprobe.toml
    pub plan: Option<PathBuf>,

    /// 额外展示每个响应的 body 摘录
    #[arg(short, long)]
    pub verbose: bool,

    /// 命中第一个 success 之后停止批次
    #[arg(long)]
    pub first_success: bool,

    /// 把发现的数据写入该目录 (discovered.jsonl + discovered.txt)
    #[arg(long)]
    pub sink_dir: Option<PathBuf>,
}

pub async fn run(cli: Cli) -> Result<()> {
    // 定位并解析计划文件
    let (plan_path, plan) = match &cli.plan {
        Some(path) => {
            let plan = PlanLoader::load_from_path(path)
                .with_context(|| format!("loading plan {}", path.display()))?;
            (path.clone(), plan)
        }
        None => match PlanLoader::find_and_load() {
            Some(found) => found,
            None => bail!("no ruprobe.toml found; pass a plan file path"),
        },
    };

    if plan.probes.is_empty() {
        bail!("plan {} declares no probes", plan_path.display());
    }

    let base_dir = plan_path.parent().unwrap_or_else(|| std::path::Path::new("."));
    let session = plan.build_session(base_dir)?;
    let descriptors = plan.descriptors()?;

    let reporter = ProbeReporter::new(cli.verbose);
    reporter.print_header(&plan_path.display().to_string(), descriptors.len());

    let runner = ProbeRunner::new(session);
    let outcomes = if cli.first_success {
        runner.run_until_success(&descriptors).await
    } else {
        runner.run(&descriptors).await
    };

    for outcome in &outcomes {
        reporter.print_outcome(outcome);
    }
    reporter.print_table(&outcomes);
    reporter.print_summary(&RunSummary::from_outcomes(&outcomes));

    if let Some(dir) = &cli.sink_dir {
        record_discovered(&DiscoveredSink::new(dir), &outcomes);
    }

    Ok(())
}
