//! 重启频率闸门
//!
//! 基于每服务的滑动窗口限制单位时间内的重启次数

use crate::config::ServiceSpec;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// 滑动窗口长度（秒）
const WINDOW_SECONDS: i64 = 3600;

/// 重启频率闸门
///
/// 记录每个服务的历史重启时刻，查询时惰性剔除窗口外的
/// 记录。上限为0或服务未注册时一律拒绝。
pub struct RestartGate {
    /// 每个服务的每小时重启上限
    caps: HashMap<String, u32>,
    /// 每个服务的重启时刻记录
    records: Mutex<HashMap<String, Vec<DateTime<Utc>>>>,
}

impl RestartGate {
    /// 根据服务声明创建闸门
    ///
    /// # 参数
    /// * `services` - 服务声明列表
    ///
    /// # 返回
    /// * `Self` - 闸门实例
    pub fn new(services: &[ServiceSpec]) -> Self {
        let caps = services
            .iter()
            .map(|s| (s.name.clone(), s.max_restarts_per_hour))
            .collect();

        Self {
            caps,
            records: Mutex::new(HashMap::new()),
        }
    }

    /// 查询当前时刻是否允许重启
    ///
    /// 只读查询，不消耗额度。是否消耗额度由调用方通过
    /// [`RestartGate::record`]显式记录。
    ///
    /// # 参数
    /// * `name` - 服务名称
    /// * `now` - 当前时刻
    ///
    /// # 返回
    /// * `bool` - 是否允许重启
    pub fn allow(&self, name: &str, now: DateTime<Utc>) -> bool {
        let cap = match self.caps.get(name) {
            Some(cap) => *cap,
            None => return false,
        };
        if cap == 0 {
            return false;
        }

        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        match records.get_mut(name) {
            Some(times) => {
                times.retain(|ts| within_window(*ts, now));
                times.len() < cap as usize
            }
            None => true,
        }
    }

    /// 记录一次重启尝试
    ///
    /// 发起重启即记录，与重启命令是否成功无关。
    ///
    /// # 参数
    /// * `name` - 服务名称
    /// * `now` - 重启发起时刻
    pub fn record(&self, name: &str, now: DateTime<Utc>) {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.entry(name.to_string()).or_default().push(now);
    }

    /// 查询窗口内已使用的重启次数
    ///
    /// # 参数
    /// * `name` - 服务名称
    /// * `now` - 当前时刻
    ///
    /// # 返回
    /// * `usize` - 窗口内的重启次数
    pub fn used(&self, name: &str, now: DateTime<Utc>) -> usize {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records
            .get(name)
            .map(|times| times.iter().filter(|ts| within_window(**ts, now)).count())
            .unwrap_or(0)
    }

    /// 查询服务的每小时重启上限
    pub fn cap(&self, name: &str) -> u32 {
        self.caps.get(name).copied().unwrap_or(0)
    }
}

/// 判断记录是否落在当前时刻的滑动窗口内
///
/// 取时间差的绝对值比较，系统时钟回拨产生的"未来"记录
/// 同样计入窗口，不会造成下溢或额度重置。恰好等于窗口
/// 长度的记录视为窗口外。
fn within_window(ts: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(ts).abs() < Duration::seconds(WINDOW_SECONDS)
}
