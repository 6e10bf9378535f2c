//! 余额换算：最小单位（wei）→ 展示单位（ether）

use ethers::types::U256;
use serde::{Deserialize, Serialize};

/// 1 ether = 10^18 wei
pub const ETHER_DECIMALS: usize = 18;

/// 以 ether 表示的十进制余额字符串，每次请求新建，不缓存
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceResult(String);

impl BalanceResult {
    pub fn from_wei(wei: U256) -> Self {
        Self(format_ether(wei))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for BalanceResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn format_ether(wei: U256) -> String {
    format_units(wei, ETHER_DECIMALS)
}

/// 整数部分 + "." + 去掉末尾0的小数部分，小数部分至少保留一位
///
/// `1000000000000000000` (18位) → `"1.0"`，`1` → `"0.000000000000000001"`
pub fn format_units(amount: U256, decimals: usize) -> String {
    let digits = amount.to_string();

    let (integer, fraction) = if digits.len() > decimals {
        let split = digits.len() - decimals;
        (digits[..split].to_string(), digits[split..].to_string())
    } else {
        ("0".to_string(), format!("{:0>width$}", digits, width = decimals))
    };

    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{}.0", integer)
    } else {
        format!("{}.{}", integer, fraction)
    }
}
