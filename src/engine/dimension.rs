// ==========================================
// 钢结构材料清单转录 - 尺寸解析
// ==========================================
// 职责: 尺寸记号 → 毫米
// 支持: 小数点 / 小数逗号、英寸分数（如 1.1/2"）
// 红线: 任何格式错误都返回 0.0，不向上抛错
// ==========================================

use tracing::debug;

/// 1 英寸 = 25.4 毫米
pub const MM_PER_INCH: f64 = 25.4;

/// 解析尺寸记号为毫米
///
/// # 规则
/// - 带 `"`：去掉英寸记号，按 `.` 分为整数英寸与分数英寸两段，
///   第一段可为整数或 `分子/分母`，第二段仅在为分数时计入，合计 × 25.4
/// - 不带 `"`：按毫米直接解析
/// - 解析失败或分母为 0 时返回 0.0
pub fn parse_dimension_mm(token: &str) -> f64 {
    let normalized = token.trim().replace(',', ".");
    match try_parse_dimension_mm(&normalized) {
        Some(mm) => mm,
        None => {
            debug!(token = %token, "尺寸解析失败，按 0 处理");
            0.0
        }
    }
}

fn try_parse_dimension_mm(token: &str) -> Option<f64> {
    if !token.contains('"') {
        return token.parse::<f64>().ok();
    }

    let stripped = token.replace('"', "");
    let mut parts = stripped.split('.');
    let mut inches = 0.0;

    if let Some(whole) = parts.next().filter(|part| !part.is_empty()) {
        inches += if whole.contains('/') {
            parse_fraction(whole)?
        } else {
            whole.parse::<f64>().ok()?
        };
    }

    if let Some(fraction) = parts.next().filter(|part| part.contains('/')) {
        inches += parse_fraction(fraction)?;
    }

    Some(inches * MM_PER_INCH)
}

/// `分子/分母` → 数值；分母为 0 返回 None
fn parse_fraction(value: &str) -> Option<f64> {
    let mut pieces = value.split('/');
    let numerator = pieces.next()?.parse::<f64>().ok()?;
    let denominator = pieces.next()?.parse::<f64>().ok()?;
    if pieces.next().is_some() || denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}
