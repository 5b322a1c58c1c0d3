// ==========================================
// 钢结构材料清单转录 - 单元格引用
// ==========================================
// A1 引用与 (行, 列) 互转，行列从 1 开始
// ==========================================

/// 列号 → 列字母（1 → A, 27 → AA）
pub fn column_letters(mut col: u32) -> String {
    let mut letters = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push(b'A' + rem as u8);
        col = (col - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// (行, 列) → A1 引用
pub fn cell_reference(row: u32, col: u32) -> String {
    format!("{}{}", column_letters(col), row)
}

/// A1 引用 → (行, 列)；格式不合法返回 None
pub fn parse_cell_reference(reference: &str) -> Option<(u32, u32)> {
    let split = reference
        .find(|c: char| c.is_ascii_digit())
        .filter(|idx| *idx > 0)?;
    let (letters, digits) = reference.split_at(split);

    let mut col: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let value = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        col = col.checked_mul(26)?.checked_add(value)?;
    }

    let row = digits.parse::<u32>().ok().filter(|row| *row > 0)?;
    Some((row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(10), "J");
        assert_eq!(column_letters(17), "Q");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(703), "AAA");
    }

    #[test]
    fn test_parse_cell_reference() {
        assert_eq!(parse_cell_reference("J5"), Some((5, 10)));
        assert_eq!(parse_cell_reference("q12"), Some((12, 17)));
        assert_eq!(parse_cell_reference("AA100"), Some((100, 27)));
        assert_eq!(parse_cell_reference("5"), None);
        assert_eq!(parse_cell_reference("J"), None);
        assert_eq!(parse_cell_reference("J0"), None);
        assert_eq!(parse_cell_reference("$J$5"), None);
    }

    #[test]
    fn test_cell_reference() {
        assert_eq!(cell_reference(4, 1), "A4");
        assert_eq!(cell_reference(4, 17), "Q4");
    }
}
