use std::fs;
use std::path::{Path, PathBuf};

use crate::plan::types::ProbePlan;
use crate::{Result, RuprobeError};

/// 计划文件加载器
pub struct PlanLoader;

impl PlanLoader {
    /// 计划文件名
    const PLAN_FILE: &'static str = "ruprobe.toml";

    /// 从指定路径加载计划文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<ProbePlan> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| RuprobeError::PlanError(format!("Failed to read plan file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| RuprobeError::PlanError(format!("Failed to parse plan file: {}", e)))
    }

    /// 查找并加载计划文件
    /// 查找顺序：
    /// 1. 当前目录
    /// 2. 父目录递归查找
    /// 3. 用户配置目录 ~/.config/ruprobe/
    pub fn find_and_load() -> Option<(PathBuf, ProbePlan)> {
        if let Some(found) = Self::try_load_from_current_dir() {
            return Some(found);
        }

        Self::try_load_from_user_dir()
    }

    /// 尝试从当前目录及其父目录加载
    fn try_load_from_current_dir() -> Option<(PathBuf, ProbePlan)> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let plan_path = current.join(Self::PLAN_FILE);
            if plan_path.exists() {
                let plan = Self::load_from_path(&plan_path).ok()?;
                return Some((plan_path, plan));
            }

            // 尝试父目录
            if !current.pop() {
                break;
            }
        }

        None
    }

    /// 尝试从用户配置目录加载
    fn try_load_from_user_dir() -> Option<(PathBuf, ProbePlan)> {
        let home = dirs::home_dir()?;
        let plan_path = home.join(".config").join("ruprobe").join(Self::PLAN_FILE);

        if plan_path.exists() {
            let plan = Self::load_from_path(&plan_path).ok()?;
            Some((plan_path, plan))
        } else {
            None
        }
    }
}
